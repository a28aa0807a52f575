//! Entity describer: maps one fetched entity to its type and attribute triples.

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use super::{Graph, LiteralKind, Node, Vocabulary};
use crate::entity::{Account, Entity, Organization, Repository};

/// Emit the type triple and every present, valid scalar attribute of `entity`
/// under `node`. Absent, empty or invalid attributes emit nothing.
pub fn describe(graph: &mut Graph, vocab: &Vocabulary, entity: &Entity, node: &Node) {
    graph.add_node(node, &vocab.rdf_type, vocab.class_of(entity.kind()));

    match entity {
        Entity::Account(account) => describe_account(graph, vocab, account, node),
        Entity::Organization(org) => describe_organization(graph, vocab, org, node),
        Entity::Repository(repo) => describe_repository(graph, vocab, repo, node),
    }
}

fn describe_account(graph: &mut Graph, vocab: &Vocabulary, account: &Account, node: &Node) {
    let mut out = Emitter { graph, vocab, node };
    out.literal(&vocab.alternate_name, Some(account.login.as_str()), LiteralKind::Identifier);
    out.literal(&vocab.name, account.name.as_deref(), LiteralKind::Text);
    out.url(&vocab.image, account.avatar_url.as_deref());
    out.literal(&vocab.location, account.location.as_deref(), LiteralKind::Text);
    out.email(account.email.as_deref());
    out.url(&vocab.url, account.blog.as_deref());
    out.url(&vocab.main_entity_of_page, account.html_url.as_deref());
}

fn describe_organization(graph: &mut Graph, vocab: &Vocabulary, org: &Organization, node: &Node) {
    let mut out = Emitter { graph, vocab, node };
    out.literal(&vocab.alternate_name, Some(org.login.as_str()), LiteralKind::Identifier);
    out.literal(&vocab.name, org.name.as_deref(), LiteralKind::Text);
    out.url(&vocab.image, org.avatar_url.as_deref());
    out.literal(&vocab.location, org.location.as_deref(), LiteralKind::Text);
    out.email(org.email.as_deref());
    out.url(&vocab.url, org.blog.as_deref());
    out.url(&vocab.main_entity_of_page, org.html_url.as_deref());
}

fn describe_repository(graph: &mut Graph, vocab: &Vocabulary, repo: &Repository, node: &Node) {
    let mut out = Emitter { graph, vocab, node };
    out.literal(&vocab.name, Some(repo.name.as_str()), LiteralKind::Text);
    out.literal(&vocab.alternate_name, Some(repo.full_name.as_str()), LiteralKind::Identifier);
    out.literal(&vocab.description, repo.description.as_deref(), LiteralKind::Text);
    out.url(&vocab.code_repository, repo.html_url.as_deref());
    // Byte counts are not kept, only the language names.
    for language in repo.languages.keys() {
        out.literal(&vocab.programming_language, Some(language.as_str()), LiteralKind::Text);
    }
}

struct Emitter<'a> {
    graph: &'a mut Graph,
    vocab: &'a Vocabulary,
    node: &'a Node,
}

impl Emitter<'_> {
    fn literal(&mut self, predicate: &Node, value: Option<&str>, kind: LiteralKind) {
        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return;
        };
        self.graph
            .add_literal(self.node, predicate, value, self.vocab.datatype(kind));
    }

    fn url(&mut self, predicate: &Node, value: Option<&str>) {
        match value.and_then(sanitize_url) {
            Some(url) => self.literal(predicate, Some(url.as_str()), LiteralKind::Url),
            None => {
                if let Some(raw) = value.filter(|v| !v.trim().is_empty()) {
                    log::debug!("Dropping invalid URL for {}: {:?}", self.node, raw);
                }
            }
        }
    }

    fn email(&mut self, value: Option<&str>) {
        match value.and_then(sanitize_email) {
            Some(mailbox) => {
                let mailbox = Node::new(mailbox);
                self.graph.add_node(self.node, &self.vocab.email, &mailbox);
            }
            None => {
                if let Some(raw) = value.filter(|v| !v.trim().is_empty()) {
                    log::debug!("Dropping invalid email for {}: {:?}", self.node, raw);
                }
            }
        }
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$")
            .expect("Invalid email regex")
    })
}

/// Strip whitespace and any `mailto:` prefix, validate, and return the
/// normalized `mailto:` IRI.
pub fn sanitize_email(raw: &str) -> Option<String> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let address = match compact.get(..7) {
        Some(prefix) if prefix.eq_ignore_ascii_case("mailto:") => &compact[7..],
        _ => compact.as_str(),
    };
    if email_regex().is_match(address) {
        Some(format!("mailto:{}", address))
    } else {
        None
    }
}

/// Strip whitespace and validate as an absolute http(s) URL. Values without
/// a scheme (common for profile blog fields) are retried as `http://`.
pub fn sanitize_url(raw: &str) -> Option<String> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }
    let parsed = match Url::parse(&compact) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(&format!("http://{}", compact)).ok()?
        }
        Err(_) => return None,
    };
    let web = matches!(parsed.scheme(), "http" | "https");
    let has_host = parsed.host_str().is_some_and(|h| h.contains('.') || h == "localhost");
    if web && has_host {
        Some(parsed.to_string())
    } else {
        None
    }
}
