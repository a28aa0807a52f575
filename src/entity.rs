//! Platform entities: accounts, organizations and repositories.
//!
//! Traversal works on [`EntityRef`]s (kind + platform key); the full
//! [`Entity`] is fetched from the platform when a reference is dequeued.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The three entity variants the crawler understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Account,
    Organization,
    Repository,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Account => "account",
            EntityKind::Organization => "organization",
            EntityKind::Repository => "repository",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "account" | "user" => Ok(EntityKind::Account),
            "organization" | "org" => Ok(EntityKind::Organization),
            "repository" | "repo" => Ok(EntityKind::Repository),
            other => Err(format!(
                "unknown entity kind '{}' (expected account, organization or repository)",
                other
            )),
        }
    }
}

/// Reference to an entity: its kind and platform key
/// (`login` for accounts/organizations, `owner/name` for repositories).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub key: String,
}

impl EntityRef {
    pub fn new(kind: EntityKind, key: impl Into<String>) -> Self {
        Self {
            kind,
            key: key.into(),
        }
    }

    pub fn account(login: impl Into<String>) -> Self {
        Self::new(EntityKind::Account, login)
    }

    pub fn organization(login: impl Into<String>) -> Self {
        Self::new(EntityKind::Organization, login)
    }

    pub fn repository(full_name: impl Into<String>) -> Self {
        Self::new(EntityKind::Repository, full_name)
    }

    /// Same reference with the key ASCII-lowercased. GitHub resolves logins
    /// and `owner/name` case-insensitively, so this is the dedup key.
    pub fn normalized(&self) -> Self {
        Self {
            kind: self.kind,
            key: self.key.to_ascii_lowercase(),
        }
    }

    /// Canonical identifier: the node's local name within its kind's namespace.
    ///
    /// Repository full names have their path separator replaced by `:`, which
    /// cannot occur in either half of a GitHub `owner/name`.
    pub fn canonical_id(&self) -> String {
        match self.kind {
            EntityKind::Repository => self.key.replace('/', ":"),
            EntityKind::Account | EntityKind::Organization => self.key.clone(),
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.key)
    }
}

/// A GitHub user (or bot) account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Account {
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub blog: Option<String>,
    pub html_url: Option<String>,
}

/// A GitHub organization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Organization {
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub blog: Option<String>,
    pub html_url: Option<String>,
}

/// A GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub full_name: String,
    pub name: String,
    pub description: Option<String>,
    pub html_url: Option<String>,
    /// Language name -> bytes of code
    pub languages: BTreeMap<String, u64>,
    pub owner: EntityRef,
}

/// A fully fetched platform entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    Account(Account),
    Organization(Organization),
    Repository(Repository),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Account(_) => EntityKind::Account,
            Entity::Organization(_) => EntityKind::Organization,
            Entity::Repository(_) => EntityKind::Repository,
        }
    }

    pub fn key(&self) -> EntityRef {
        match self {
            Entity::Account(a) => EntityRef::account(&a.login),
            Entity::Organization(o) => EntityRef::organization(&o.login),
            Entity::Repository(r) => EntityRef::repository(&r.full_name),
        }
    }

    /// Relation classes followed out of this entity, in traversal order.
    pub fn relation_classes(&self) -> &'static [RelationClass] {
        self.kind().relation_classes()
    }
}

impl EntityKind {
    pub fn relation_classes(&self) -> &'static [RelationClass] {
        match self {
            EntityKind::Account => &[
                RelationClass::Following,
                RelationClass::OwnedRepositories,
                RelationClass::Memberships,
            ],
            EntityKind::Organization => &[RelationClass::Members, RelationClass::OwnedRepositories],
            EntityKind::Repository => &[RelationClass::Contributors, RelationClass::Owner],
        }
    }
}

/// A class of relation between entities, each backed by one paged listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationClass {
    /// Accounts an account follows
    Following,
    /// Repositories owned by an account or organization
    OwnedRepositories,
    /// Organizations an account belongs to
    Memberships,
    /// Members of an organization
    Members,
    /// Contributors of a repository
    Contributors,
    /// Owner of a repository
    Owner,
}

impl RelationClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationClass::Following => "following",
            RelationClass::OwnedRepositories => "repos",
            RelationClass::Memberships => "orgs",
            RelationClass::Members => "members",
            RelationClass::Contributors => "contributors",
            RelationClass::Owner => "owner",
        }
    }
}

impl fmt::Display for RelationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
