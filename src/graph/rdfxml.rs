//! RDF/XML serialization, one `rdf:Description` per subject.

use std::collections::BTreeMap;
use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::{Graph, Term, RDF_NS};
use crate::error::{FoafhubError, Result};

/// Write the graph as RDF/XML.
///
/// Every predicate IRI must split into a namespace and an XML local name
/// (e.g. `http://schema.org/` + `name`); otherwise serialization fails.
pub fn write_rdfxml<W: Write>(graph: &Graph, out: W) -> Result<()> {
    let prefixes = assign_prefixes(graph)?;

    let mut writer = Writer::new_with_indent(out, b' ', 2);
    emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("rdf:RDF");
    let declarations: Vec<(String, String)> = prefixes
        .iter()
        .map(|(ns, prefix)| (format!("xmlns:{}", prefix), ns.clone()))
        .collect();
    for (attr, ns) in &declarations {
        root.push_attribute((attr.as_str(), ns.as_str()));
    }
    emit(&mut writer, Event::Start(root))?;

    let mut current: Option<&str> = None;
    for triple in graph.iter() {
        let subject = triple.subject.as_str();
        if current != Some(subject) {
            if current.is_some() {
                emit(&mut writer, Event::End(BytesEnd::new("rdf:Description")))?;
            }
            let mut description = BytesStart::new("rdf:Description");
            description.push_attribute(("rdf:about", subject));
            emit(&mut writer, Event::Start(description))?;
            current = Some(subject);
        }

        let (ns, local) = split_iri(triple.predicate.as_str()).ok_or_else(|| {
            FoafhubError::Serialization(format!("predicate has no XML local name: {}", triple.predicate))
        })?;
        let qname = format!("{}:{}", prefixes[ns], local);

        match &triple.object {
            Term::Node(node) => {
                let mut property = BytesStart::new(qname.as_str());
                property.push_attribute(("rdf:resource", node.as_str()));
                emit(&mut writer, Event::Empty(property))?;
            }
            Term::Literal(lit) => {
                let mut property = BytesStart::new(qname.as_str());
                property.push_attribute(("rdf:datatype", lit.datatype.as_str()));
                emit(&mut writer, Event::Start(property))?;
                emit(&mut writer, Event::Text(BytesText::new(&lit.lexical)))?;
                emit(&mut writer, Event::End(BytesEnd::new(qname.as_str())))?;
            }
        }
    }
    if current.is_some() {
        emit(&mut writer, Event::End(BytesEnd::new("rdf:Description")))?;
    }

    emit(&mut writer, Event::End(BytesEnd::new("rdf:RDF")))?;
    writer.get_mut().flush()?;
    Ok(())
}

fn emit<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| FoafhubError::Serialization(e.to_string()))
}

/// Namespace IRI -> prefix. `rdf` is always declared; the rest are numbered
/// in namespace order so output is stable.
fn assign_prefixes(graph: &Graph) -> Result<BTreeMap<String, String>> {
    let mut prefixes = BTreeMap::new();
    prefixes.insert(RDF_NS.to_string(), "rdf".to_string());

    let mut namespaces: Vec<&str> = Vec::new();
    for triple in graph.iter() {
        let (ns, _) = split_iri(triple.predicate.as_str()).ok_or_else(|| {
            FoafhubError::Serialization(format!("predicate has no XML local name: {}", triple.predicate))
        })?;
        if ns != RDF_NS && !namespaces.contains(&ns) {
            namespaces.push(ns);
        }
    }
    namespaces.sort_unstable();
    for (i, ns) in namespaces.into_iter().enumerate() {
        prefixes.insert(ns.to_string(), format!("ns{}", i + 1));
    }
    Ok(prefixes)
}

/// Split after the last `#` or `/`, provided the remainder is a usable local name.
fn split_iri(iri: &str) -> Option<(&str, &str)> {
    let cut = iri.rfind(['#', '/'])? + 1;
    let (ns, local) = iri.split_at(cut);
    let mut chars = local.chars();
    let first = chars.next()?;
    let valid = (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    valid.then_some((ns, local))
}
