//! N-Triples serialization.

use std::io::Write;

use super::{Graph, Term};
use crate::error::Result;

/// Write the graph as N-Triples, one statement per line in sorted order.
pub fn write_ntriples<W: Write>(graph: &Graph, out: &mut W) -> Result<()> {
    for triple in graph.iter() {
        write!(out, "<{}> <{}> ", escape_iri(triple.subject.as_str()), escape_iri(triple.predicate.as_str()))?;
        match &triple.object {
            Term::Node(node) => write!(out, "<{}>", escape_iri(node.as_str()))?,
            Term::Literal(lit) => write!(
                out,
                "\"{}\"^^<{}>",
                escape_literal(&lit.lexical),
                escape_iri(lit.datatype.as_str())
            )?,
        }
        writeln!(out, " .")?;
    }
    out.flush()?;
    Ok(())
}

fn escape_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if c.is_control() => escaped.push_str(&format!("\\u{:04X}", c as u32)),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Characters an IRIREF may not contain, even as `\u` escapes, are
/// percent-encoded.
fn escape_iri(iri: &str) -> String {
    let mut escaped = String::with_capacity(iri.len());
    for c in iri.chars() {
        if matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\') || c <= ' ' {
            escaped.push_str(&format!("%{:02X}", c as u32));
        } else {
            escaped.push(c);
        }
    }
    escaped
}
