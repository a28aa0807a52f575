//! Typed triple graph: nodes, literals and the append-only output graph.
//!
//! The graph has set semantics; adding a statement twice keeps one copy.

mod describe;
mod ntriples;
mod rdfxml;
mod vocab;

pub use describe::{describe, sanitize_email, sanitize_url};
pub use ntriples::write_ntriples;
pub use rdfxml::write_rdfxml;
pub use vocab::{LiteralKind, Namespaces, Vocabulary, RDF_NS, XSD_NS};

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// An IRI-identified graph node. Cloning shares the underlying string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Node(Arc<str>);

impl Node {
    pub fn new(iri: impl Into<Arc<str>>) -> Self {
        Self(iri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when both handles were minted from the same allocation.
    pub fn same_handle(&self, other: &Node) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A typed literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    pub lexical: String,
    pub datatype: Node,
}

/// Object position of a triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    Node(Node),
    Literal(Literal),
}

impl Term {
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Term::Node(n) => Some(n),
            Term::Literal(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triple {
    pub subject: Node,
    pub predicate: Node,
    pub object: Term,
}

/// Append-only set of triples, iterated in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    triples: BTreeSet<Triple>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a statement. Returns false when it was already present.
    pub fn add(&mut self, subject: &Node, predicate: &Node, object: Term) -> bool {
        self.triples.insert(Triple {
            subject: subject.clone(),
            predicate: predicate.clone(),
            object,
        })
    }

    pub fn add_node(&mut self, subject: &Node, predicate: &Node, object: &Node) -> bool {
        self.add(subject, predicate, Term::Node(object.clone()))
    }

    pub fn add_literal(&mut self, subject: &Node, predicate: &Node, lexical: &str, datatype: &Node) -> bool {
        self.add(
            subject,
            predicate,
            Term::Literal(Literal {
                lexical: lexical.to_string(),
                datatype: datatype.clone(),
            }),
        )
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    pub fn contains(&self, subject: &Node, predicate: &Node, object: &Term) -> bool {
        self.triples.iter().any(|t| {
            &t.subject == subject && &t.predicate == predicate && &t.object == object
        })
    }

    /// All statements about `subject`.
    pub fn about<'a>(&'a self, subject: &'a Node) -> impl Iterator<Item = &'a Triple> + 'a {
        self.triples.iter().filter(move |t| &t.subject == subject)
    }

    /// Objects of `(subject, predicate, ?)`.
    pub fn objects<'a>(
        &'a self,
        subject: &'a Node,
        predicate: &'a Node,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.about(subject)
            .filter(move |t| &t.predicate == predicate)
            .map(|t| &t.object)
    }

    /// Distinct subjects, sorted.
    pub fn subjects(&self) -> BTreeSet<&Node> {
        self.triples.iter().map(|t| &t.subject).collect()
    }
}
