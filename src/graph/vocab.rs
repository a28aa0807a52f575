//! Namespaces and the predicate/type vocabulary of the output graph.

use serde::Deserialize;

use super::Node;
use crate::entity::{EntityKind, EntityRef, RelationClass};

pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";

/// Node namespaces, one per entity kind, plus the shared vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Namespaces {
    #[serde(default = "default_accounts")]
    pub accounts: String,
    #[serde(default = "default_organizations")]
    pub organizations: String,
    #[serde(default = "default_repositories")]
    pub repositories: String,
    #[serde(default = "default_vocabulary")]
    pub vocabulary: String,
}

impl Default for Namespaces {
    fn default() -> Self {
        Self {
            accounts: default_accounts(),
            organizations: default_organizations(),
            repositories: default_repositories(),
            vocabulary: default_vocabulary(),
        }
    }
}

fn default_accounts() -> String {
    "http://github2foaf.org/users#".to_string()
}

fn default_organizations() -> String {
    "http://github2foaf.org/orgs#".to_string()
}

fn default_repositories() -> String {
    "http://github2foaf.org/repos#".to_string()
}

fn default_vocabulary() -> String {
    "http://schema.org/".to_string()
}

/// Semantic kind of a literal attribute; selects its datatype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Text,
    Url,
    Identifier,
}

/// Pre-minted predicate, type and datatype nodes for one crawl run.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    namespaces: Namespaces,

    pub rdf_type: Node,

    pub person: Node,
    pub organization: Node,
    pub software_source_code: Node,

    pub name: Node,
    pub alternate_name: Node,
    pub image: Node,
    pub location: Node,
    pub email: Node,
    pub url: Node,
    pub main_entity_of_page: Node,
    pub description: Node,
    pub code_repository: Node,
    pub programming_language: Node,

    pub follows: Node,
    pub creator: Node,
    pub member_of: Node,
    pub contributor: Node,

    text: Node,
    url_type: Node,
    xsd_string: Node,
}

impl Vocabulary {
    pub fn new(namespaces: Namespaces) -> Self {
        let v = |local: &str| Node::new(format!("{}{}", namespaces.vocabulary, local));
        Self {
            rdf_type: Node::new(format!("{}type", RDF_NS)),
            person: v("Person"),
            organization: v("Organization"),
            software_source_code: v("SoftwareSourceCode"),
            name: v("name"),
            alternate_name: v("alternateName"),
            image: v("image"),
            location: v("location"),
            email: v("email"),
            url: v("url"),
            main_entity_of_page: v("mainEntityOfPage"),
            description: v("description"),
            code_repository: v("codeRepository"),
            programming_language: v("programmingLanguage"),
            follows: v("follows"),
            creator: v("creator"),
            member_of: v("memberOf"),
            contributor: v("contributor"),
            text: v("Text"),
            url_type: v("URL"),
            xsd_string: Node::new(format!("{}string", XSD_NS)),
            namespaces,
        }
    }

    pub fn namespaces(&self) -> &Namespaces {
        &self.namespaces
    }

    /// Mint a fresh node for an entity reference.
    pub fn mint(&self, entity: &EntityRef) -> Node {
        let ns = match entity.kind {
            EntityKind::Account => &self.namespaces.accounts,
            EntityKind::Organization => &self.namespaces.organizations,
            EntityKind::Repository => &self.namespaces.repositories,
        };
        Node::new(format!("{}{}", ns, entity.canonical_id()))
    }

    pub fn class_of(&self, kind: EntityKind) -> &Node {
        match kind {
            EntityKind::Account => &self.person,
            EntityKind::Organization => &self.organization,
            EntityKind::Repository => &self.software_source_code,
        }
    }

    pub fn datatype(&self, kind: LiteralKind) -> &Node {
        match kind {
            LiteralKind::Text => &self.text,
            LiteralKind::Url => &self.url_type,
            LiteralKind::Identifier => &self.xsd_string,
        }
    }

    /// Orient an edge from `source` (the expanded entity) to `target` (the
    /// listed entity) as a `(subject, predicate, object)` statement.
    pub fn edge<'a>(
        &'a self,
        class: RelationClass,
        source: &'a Node,
        target: &'a Node,
    ) -> (&'a Node, &'a Node, &'a Node) {
        match class {
            RelationClass::Following => (source, &self.follows, target),
            RelationClass::OwnedRepositories => (target, &self.creator, source),
            RelationClass::Memberships => (source, &self.member_of, target),
            RelationClass::Members => (target, &self.member_of, source),
            RelationClass::Contributors => (source, &self.contributor, target),
            RelationClass::Owner => (source, &self.creator, target),
        }
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new(Namespaces::default())
    }
}
