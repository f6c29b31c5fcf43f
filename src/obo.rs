// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! OBO-style hierarchy text format
//!
//! A file is an optional header frame of `tag: value` lines followed by
//! stanzas. A stanza opens with a bracketed header such as `[Term]` and runs
//! until a blank line, the next stanza header, or the end of input. Only
//! `[Term]` stanzas are read; within them the `id`, `name`, `def`
//! (alias `definition`) and `is_a` tags are understood and everything else
//! is ignored.
//!
//! Serialization is canonical: terms ascending by id, parents ascending by
//! id, absent fields omitted. Serializing a parsed graph and parsing the
//! result again reproduces the same text byte for byte.

use crate::error::ParseSkip;
use crate::graph::OntologyGraph;
use crate::term::Term;
use crate::types::TermId;
use tracing::{debug, warn};

/// Stanza header for terms
pub const TERM_STANZA: &str = "Term";

/// A `tag: value` line from the header frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderTag {
    /// Tag name, e.g. `format-version`
    pub tag: String,
    /// Trimmed value
    pub value: String,
}

/// One tag line inside a stanza
#[derive(Debug)]
struct TagLine<'a> {
    line: usize,
    tag: &'a str,
    value: &'a str,
}

/// A bracketed block of tag lines
#[derive(Debug)]
struct Stanza<'a> {
    kind: &'a str,
    line: usize,
    tags: Vec<TagLine<'a>>,
}

impl<'a> Stanza<'a> {
    fn first(&self, names: &[&str]) -> Option<&TagLine<'a>> {
        self.tags.iter().find(|t| names.contains(&t.tag))
    }
}

/// Parse hierarchy text, logging and dropping malformed entries
#[must_use]
pub fn parse_hierarchy(text: &str) -> OntologyGraph {
    parse_hierarchy_with_diagnostics(text).0
}

/// Parse hierarchy text and also return every dropped entry
///
/// Terms are created in a first pass and `is_a` references resolved in a
/// second, so a stanza may name a parent defined further down the file.
pub fn parse_hierarchy_with_diagnostics(text: &str) -> (OntologyGraph, Vec<ParseSkip>) {
    let (header, stanzas) = split_stanzas(text);
    let mut graph = OntologyGraph::new();
    graph.set_header(header);
    let mut skipped = Vec::new();
    let mut pending = Vec::new();

    for stanza in &stanzas {
        if stanza.kind != TERM_STANZA {
            debug!("Ignoring [{}] stanza at line {}", stanza.kind, stanza.line);
            continue;
        }
        match read_term(stanza, &graph) {
            Ok(term) => {
                if graph.is_empty() {
                    graph.adopt_prefix(term.id());
                }
                let child = term.id().clone();
                graph.insert(term);
                pending.extend(
                    stanza
                        .tags
                        .iter()
                        .filter(|t| t.tag == "is_a")
                        .map(|t| (t.line, child.clone(), t.value)),
                );
            }
            Err(skip) => skipped.push(skip),
        }
    }

    for (line, child, raw_parent) in pending {
        let parent = parent_reference(raw_parent);
        let Some(parent_idx) = graph.index_of(parent) else {
            skipped.push(ParseSkip::UnknownParent {
                line,
                term: child,
                parent: parent.to_string(),
            });
            continue;
        };
        let Some(child_idx) = graph.index_of(child.as_str()) else {
            continue;
        };
        if !graph.link(parent_idx, child_idx) {
            if let Some(parent) = graph.find_term_by_id(parent).map(|t| t.id().clone()) {
                skipped.push(ParseSkip::CyclicParent {
                    line,
                    term: child,
                    parent,
                });
            }
        }
    }

    for skip in &skipped {
        warn!("Skipping hierarchy entry: {}", skip);
    }
    debug!(
        "Parsed {} term(s), {} link(s), {} skipped",
        graph.len(),
        graph.link_count(),
        skipped.len()
    );
    (graph, skipped)
}

/// Serialize a graph to canonical hierarchy text
#[must_use]
pub fn serialize_hierarchy(graph: &OntologyGraph) -> String {
    let mut out = String::new();

    if !graph.header().is_empty() {
        for tag in graph.header() {
            out.push_str(&format!("{}: {}\n", tag.tag, tag.value));
        }
        out.push('\n');
    }

    for (i, term) in graph.all_terms().into_iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("[{TERM_STANZA}]\n"));
        out.push_str(&format!("id: {}\n", term.id()));
        if let Some(name) = term.name() {
            out.push_str(&format!("name: {name}\n"));
        }
        if let Some(definition) = term.definition() {
            out.push_str(&format!("def: \"{}\" []\n", escape_quoted(definition)));
        }
        for parent in graph.parents(term.id().as_str()) {
            out.push_str(&format!("is_a: {}\n", parent.id()));
        }
    }

    out
}

fn split_stanzas(text: &str) -> (Vec<HeaderTag>, Vec<Stanza<'_>>) {
    let mut header = Vec::new();
    let mut stanzas = Vec::new();
    let mut current: Option<Stanza<'_>> = None;
    let mut in_header = true;

    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            stanzas.extend(current.take());
            continue;
        }
        if trimmed.starts_with('!') {
            continue;
        }
        if let Some(kind) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            stanzas.extend(current.take());
            in_header = false;
            current = Some(Stanza {
                kind: kind.trim(),
                line,
                tags: Vec::new(),
            });
            continue;
        }

        let Some((tag, value)) = split_tag(trimmed) else {
            debug!("Ignoring unparseable line {}", line);
            continue;
        };
        match current.as_mut() {
            Some(stanza) => stanza.tags.push(TagLine { line, tag, value }),
            None if in_header => header.push(HeaderTag {
                tag: tag.to_string(),
                value: value.to_string(),
            }),
            None => debug!("Ignoring tag '{}' outside any stanza at line {}", tag, line),
        }
    }
    stanzas.extend(current);

    (header, stanzas)
}

/// `tag: value` with a non-empty, whitespace-free tag
fn split_tag(line: &str) -> Option<(&str, &str)> {
    let (tag, value) = line.split_once(':')?;
    let tag = tag.trim();
    if tag.is_empty() || tag.contains(char::is_whitespace) {
        return None;
    }
    Some((tag, value.trim()))
}

fn read_term(stanza: &Stanza<'_>, graph: &OntologyGraph) -> Result<Term, ParseSkip> {
    let id_tag = stanza
        .first(&["id"])
        .ok_or(ParseSkip::MissingId { line: stanza.line })?;
    let id = TermId::parse(id_tag.value).map_err(|_| ParseSkip::InvalidId {
        line: id_tag.line,
        value: id_tag.value.to_string(),
    })?;
    if graph.contains(id.as_str()) {
        return Err(ParseSkip::DuplicateId {
            line: stanza.line,
            id,
        });
    }

    let mut term = Term::new(id);
    if let Some(name) = stanza.first(&["name"]) {
        term = term.with_name(name.value);
    }
    if let Some(def) = stanza.first(&["def", "definition"]) {
        term = term.with_definition(unquote(def.value));
    }
    Ok(term)
}

/// Parent id of an `is_a` value, without `! comment` or `{qualifiers}`
fn parent_reference(value: &str) -> &str {
    let value = value.split('!').next().unwrap_or_default();
    let value = value.split('{').next().unwrap_or_default();
    value.split_whitespace().next().unwrap_or_default()
}

/// Text of a quoted definition, dropping the trailing xref list
///
/// Unquoted values are taken as they are.
fn unquote(value: &str) -> String {
    let Some(rest) = value.strip_prefix('"') else {
        return value.to_string();
    };
    let mut out = String::with_capacity(rest.len());
    let mut chars = rest.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('n') => out.push(' '),
                Some(escaped) => out.push(escaped),
                None => break,
            },
            '"' => break,
            other => out.push(other),
        }
    }
    out
}

fn escape_quoted(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "format-version: 1.2\nontology: dio\n\n\
[Term]\nid: DIO:0000002\nname: samtools\ndef: \"Tools for \\\"SAM\\\" files\" [PMID:19505943]\nis_a: DIO:0000001 ! abyss\n\n\
[Typedef]\nid: part_of\nname: part of\n\n\
[Term]\nid: DIO:0000001\nname: abyss\ncomment: assembler\n";

    fn ids(terms: &[&Term]) -> Vec<String> {
        terms.iter().map(|t| t.id().to_string()).collect()
    }

    #[test]
    fn test_parse_single_term() {
        let (graph, skipped) = parse_hierarchy_with_diagnostics("[Term]\nid: DIO:0000001\nname: abyss\n");
        assert!(skipped.is_empty());
        assert_eq!(graph.len(), 1);
        let term = graph.find_term_by_id("DIO:0000001").unwrap();
        assert_eq!(term.name(), Some("abyss"));
        assert_eq!(term.definition(), None);
        assert!(!graph.has_parents("DIO:0000001"));
    }

    #[test]
    fn test_parse_forward_reference_and_comment() {
        let (graph, skipped) = parse_hierarchy_with_diagnostics(SAMPLE);
        assert!(skipped.is_empty(), "{skipped:?}");
        assert_eq!(graph.len(), 2);
        assert_eq!(ids(&graph.parents("DIO:0000002")), vec!["DIO:0000001"]);
        assert_eq!(ids(&graph.root_terms()), vec!["DIO:0000001"]);
    }

    #[test]
    fn test_parse_definition_unquoted() {
        let graph = parse_hierarchy(SAMPLE);
        let term = graph.find_term_by_id("DIO:0000002").unwrap();
        assert_eq!(term.definition(), Some("Tools for \"SAM\" files"));
    }

    #[test]
    fn test_parse_definition_alias_and_bare_value() {
        let graph = parse_hierarchy("[Term]\nid: DIO:0000001\ndefinition: plain text\n");
        assert_eq!(
            graph.find_term_by_id("DIO:0000001").unwrap().definition(),
            Some("plain text")
        );
    }

    #[test]
    fn test_parse_header_kept() {
        let graph = parse_hierarchy(SAMPLE);
        let tags: Vec<_> = graph.header().iter().map(|h| h.tag.as_str()).collect();
        assert_eq!(tags, vec!["format-version", "ontology"]);
        assert_eq!(graph.header()[1].value, "dio");
    }

    #[test]
    fn test_parse_skips_bad_stanzas() {
        let text = "[Term]\nname: nameless\n\n\
[Term]\nid: DIO:12\n\n\
[Term]\nid: DIO:0000001\nname: first\n\n\
[Term]\nid: DIO:0000001\nname: second\n\n\
[Term]\nid: DIO:0000003\nis_a: DIO:0000404\n";
        let (graph, skipped) = parse_hierarchy_with_diagnostics(text);

        assert_eq!(ids(&graph.all_terms()), vec!["DIO:0000001", "DIO:0000003"]);
        assert_eq!(graph.find_term_by_id("DIO:0000001").unwrap().name(), Some("first"));
        assert!(matches!(skipped[0], ParseSkip::MissingId { line: 1 }));
        assert!(matches!(skipped[1], ParseSkip::InvalidId { line: 5, .. }));
        assert!(matches!(skipped[2], ParseSkip::DuplicateId { line: 11, .. }));
        assert!(matches!(skipped[3], ParseSkip::UnknownParent { line: 17, .. }));
        assert_eq!(skipped.len(), 4);
    }

    #[test]
    fn test_parse_drops_cyclic_links() {
        let text = "[Term]\nid: DIO:0000001\nis_a: DIO:0000002\n\n\
[Term]\nid: DIO:0000002\nis_a: DIO:0000001\n\n\
[Term]\nid: DIO:0000003\nis_a: DIO:0000003\n";
        let (graph, skipped) = parse_hierarchy_with_diagnostics(text);
        assert!(graph.is_acyclic());
        assert_eq!(graph.link_count(), 1);
        assert_eq!(skipped.len(), 2);
        assert!(skipped
            .iter()
            .all(|s| matches!(s, ParseSkip::CyclicParent { .. })));
    }

    #[test]
    fn test_parse_stanza_without_blank_separator() {
        let graph = parse_hierarchy("[Term]\nid: DIO:0000001\n[Term]\nid: DIO:0000002\nis_a: DIO:0000001 {source=\"x\"}\n");
        assert_eq!(ids(&graph.parents("DIO:0000002")), vec!["DIO:0000001"]);
    }

    #[test]
    fn test_parse_prefix_adopted() {
        let graph = parse_hierarchy("[Term]\nid: EDAM:0000010\n");
        assert_eq!(graph.next_id().unwrap().as_str(), "EDAM:0000011");
    }

    #[test]
    fn test_serialize_canonical() {
        let graph = parse_hierarchy(SAMPLE);
        let expected = "format-version: 1.2\nontology: dio\n\n\
[Term]\nid: DIO:0000001\nname: abyss\n\n\
[Term]\nid: DIO:0000002\nname: samtools\ndef: \"Tools for \\\"SAM\\\" files\" []\nis_a: DIO:0000001\n";
        assert_eq!(graph.serialize(), expected);
    }

    #[test]
    fn test_serialize_round_trip_is_stable() {
        let first = parse_hierarchy(SAMPLE).serialize();
        let second = parse_hierarchy(&first).serialize();
        assert_eq!(first, second);
    }

    #[test]
    fn test_serialize_empty() {
        assert_eq!(OntologyGraph::new().serialize(), "");
    }

    #[test]
    fn test_parent_reference() {
        assert_eq!(parent_reference("DIO:0000001 ! abyss"), "DIO:0000001");
        assert_eq!(parent_reference("DIO:0000001{a=b}"), "DIO:0000001");
        assert_eq!(parent_reference("  "), "");
    }
}
