// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Curation document: ontology, mappings and metadata edited together
//!
//! The document is the only place where the graph and the mapping table are
//! mutated side by side. Removing a term purges the mappings of every
//! removed identifier before the call returns, so callers never observe a
//! mapping pointing into a deleted subtree.

use crate::error::{DocumentError, OntologyError, ParseSkip};
use crate::graph::OntologyGraph;
use crate::mapping::{self, MappingTable};
use crate::metadata::{self, MetadataItem};
use crate::obo;
use crate::term::Term;
use crate::types::{Mapping, TermId};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Entries dropped while loading a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Dropped hierarchy stanzas and links
    pub hierarchy: Vec<ParseSkip>,
    /// Dropped mapping lines
    pub mappings: Vec<ParseSkip>,
}

impl LoadReport {
    /// Check if nothing was dropped
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.hierarchy.is_empty() && self.mappings.is_empty()
    }
}

/// What a cascading term removal took away
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    /// Removed term identifiers, ascending
    pub terms: Vec<TermId>,
    /// Number of mapping entries purged with them
    pub mappings: usize,
}

/// Referential problems found by [`Document::audit`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Audit {
    /// Mappings whose identifier has no term
    pub dangling_terms: Vec<Mapping>,
    /// Mappings whose name has no metadata record
    pub unknown_entities: Vec<Mapping>,
}

impl Audit {
    /// Check if no problem was found
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.dangling_terms.is_empty() && self.unknown_entities.is_empty()
    }
}

/// Canonical texts as of the last load or save
#[derive(Debug, Clone, Default)]
struct Baseline {
    ontology: String,
    mappings: String,
    metadata: String,
}

/// The three curated collections and their saved state
#[derive(Debug, Clone, Default)]
pub struct Document {
    graph: OntologyGraph,
    mappings: MappingTable,
    metadata: Vec<MetadataItem>,
    baseline: Baseline,
}

impl Document {
    /// Create an empty document
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from hierarchy text, mapping text and metadata JSON
    ///
    /// Malformed stanzas and mapping lines are dropped and listed in the
    /// report; malformed metadata JSON fails the whole load.
    pub fn load(
        ontology: &str,
        mappings: &str,
        metadata_json: &str,
    ) -> Result<(Self, LoadReport), DocumentError> {
        let metadata = metadata::parse_metadata(metadata_json)?;
        let (graph, hierarchy_skips) = obo::parse_hierarchy_with_diagnostics(ontology);
        let (mappings, mapping_skips) = mapping::parse_mappings_with_diagnostics(mappings);

        let mut document = Self {
            graph,
            mappings,
            metadata,
            baseline: Baseline::default(),
        };
        document.mark_saved();
        info!(
            "Loaded {} term(s), {} mapping(s), {} metadata record(s)",
            document.graph.len(),
            document.mappings.len(),
            document.metadata.len()
        );

        Ok((
            document,
            LoadReport {
                hierarchy: hierarchy_skips,
                mappings: mapping_skips,
            },
        ))
    }

    /// The ontology graph
    #[must_use]
    pub fn graph(&self) -> &OntologyGraph {
        &self.graph
    }

    /// The mapping table
    #[must_use]
    pub fn mappings(&self) -> &MappingTable {
        &self.mappings
    }

    /// The metadata records
    #[must_use]
    pub fn metadata(&self) -> &[MetadataItem] {
        &self.metadata
    }

    /// Metadata record by image name
    #[must_use]
    pub fn find_metadata(&self, name: &str) -> Option<&MetadataItem> {
        self.metadata.iter().find(|m| m.name == name)
    }

    /// Change the prefix new term identifiers are allocated under
    pub fn set_prefix(&mut self, prefix: &str) -> Result<(), OntologyError> {
        self.graph.set_prefix(prefix)
    }

    // =========================================================================
    // Term operations
    // =========================================================================

    /// Create a term under a freshly allocated identifier
    pub fn create_term(
        &mut self,
        name: &str,
        definition: &str,
        parent: Option<&str>,
    ) -> Result<TermId, OntologyError> {
        let id = self.graph.next_id()?;
        self.create_term_with_id(id, name, definition, parent)
    }

    /// Create a term under a caller-chosen identifier
    pub fn create_term_with_id(
        &mut self,
        id: TermId,
        name: &str,
        definition: &str,
        parent: Option<&str>,
    ) -> Result<TermId, OntologyError> {
        let term = self.graph.create_term(id, name, definition, parent)?;
        info!("Created term {} ({})", term.id(), term.label());
        Ok(term.id().clone())
    }

    /// Replace the name and definition of a term
    pub fn update_term(
        &mut self,
        id: &str,
        name: &str,
        definition: &str,
    ) -> Result<(), OntologyError> {
        self.graph.update_term(id, name, definition)
    }

    /// Reparent a term; see [`OntologyGraph::move_term`]
    pub fn move_term(&mut self, id: &str, new_parent: Option<&str>) -> bool {
        let moved = self.graph.move_term(id, new_parent);
        if moved {
            info!("Moved {} under {}", id, new_parent.unwrap_or("(root)"));
        }
        moved
    }

    /// Remove a term, its whole subtree, and every mapping into it
    pub fn remove_term(&mut self, id: &str) -> Result<Removal, OntologyError> {
        let terms = self.graph.remove_term(id)?;
        let mappings = self.mappings.remove_for_terms(&terms);
        info!(
            "Removed {} and {} descendant(s); purged {} mapping(s)",
            id,
            terms.len() - 1,
            mappings
        );
        Ok(Removal { terms, mappings })
    }

    /// Look up a term by identifier
    #[must_use]
    pub fn term(&self, id: &str) -> Option<&Term> {
        self.graph.find_term_by_id(id)
    }

    // =========================================================================
    // Mapping operations
    // =========================================================================

    /// Add a mapping; the identifier is not checked against the graph
    pub fn add_mapping(&mut self, dio_id: TermId, name: &str) {
        debug!("Mapping {} -> {}", dio_id, name);
        self.mappings.add(dio_id, name);
    }

    /// Remove every mapping matching both fields
    pub fn remove_mapping(&mut self, dio_id: &str, name: &str) -> usize {
        self.mappings.remove(dio_id, name)
    }

    /// Collapse exact duplicate mappings, returning how many were dropped
    pub fn dedup_mappings(&mut self) -> usize {
        self.mappings.dedup()
    }

    /// Mappings of one term
    #[must_use]
    pub fn mappings_for_term(&self, dio_id: &str) -> Vec<&Mapping> {
        self.mappings.for_term(dio_id)
    }

    /// Mappings of one image
    #[must_use]
    pub fn mappings_for_entity(&self, name: &str) -> Vec<&Mapping> {
        self.mappings.for_entity(name)
    }

    /// Report mappings that reference missing terms or unknown images
    ///
    /// Image names are only checked when metadata records are loaded.
    #[must_use]
    pub fn audit(&self) -> Audit {
        let names: BTreeSet<&str> = self.metadata.iter().map(|m| m.name.as_str()).collect();
        let mut audit = Audit::default();
        for entry in self.mappings.iter() {
            if !self.graph.contains(entry.dio_id.as_str()) {
                audit.dangling_terms.push(entry.clone());
            }
            if !names.is_empty() && !names.contains(entry.name.as_str()) {
                audit.unknown_entities.push(entry.clone());
            }
        }
        audit
    }

    // =========================================================================
    // Serialization and change tracking
    // =========================================================================

    /// Canonical hierarchy text
    #[must_use]
    pub fn ontology_text(&self) -> String {
        self.graph.serialize()
    }

    /// Canonical mapping text
    #[must_use]
    pub fn mappings_text(&self) -> String {
        self.mappings.serialize()
    }

    /// Metadata JSON
    pub fn metadata_text(&self) -> serde_json::Result<String> {
        metadata::serialize_metadata(&self.metadata)
    }

    /// Replace the graph with a fresh parse of its own serialization
    ///
    /// The prefix and identifier history carry over.
    pub fn refresh(&mut self) {
        let mut fresh = OntologyGraph::parse(&self.graph.serialize());
        fresh.absorb_history(&self.graph);
        self.graph = fresh;
    }

    /// Check whether any collection differs from the last load or save
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.graph.serialize() != self.baseline.ontology
            || self.mappings.serialize() != self.baseline.mappings
            || self.metadata_text().map_or(true, |m| m != self.baseline.metadata)
    }

    /// Take the current state as the saved state
    pub fn mark_saved(&mut self) {
        self.baseline = Baseline {
            ontology: self.graph.serialize(),
            mappings: self.mappings.serialize(),
            metadata: self.metadata_text().unwrap_or_default(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONTOLOGY: &str = "[Term]\nid: DIO:0000001\nname: assembly\n\n\
[Term]\nid: DIO:0000002\nname: short reads\nis_a: DIO:0000001\n\n\
[Term]\nid: DIO:0000003\nname: long reads\nis_a: DIO:0000001\n\n\
[Term]\nid: DIO:0000004\nname: hybrid\nis_a: DIO:0000002\n\n\
[Term]\nid: DIO:0000005\nname: alignment\n";

    const MAPPINGS: &str = "DIO:0000002\tabyss\nDIO:0000003\tcanu\nDIO:0000004\tunicycler\nDIO:0000005\tbwa\n";

    fn make_document() -> Document {
        let (doc, report) = Document::load(ONTOLOGY, MAPPINGS, "").unwrap();
        assert!(report.is_clean());
        doc
    }

    #[test]
    fn test_remove_term_purges_subtree_mappings() {
        let mut doc = make_document();
        let removal = doc.remove_term("DIO:0000001").unwrap();

        assert_eq!(removal.terms.len(), 4);
        assert_eq!(removal.mappings, 3);
        assert_eq!(doc.mappings_text(), "DIO:0000005\tbwa");
        assert!(doc.audit().is_clean());
    }

    #[test]
    fn test_remove_unknown_term_touches_nothing() {
        let mut doc = make_document();
        assert!(doc.remove_term("DIO:0000099").is_err());
        assert_eq!(doc.mappings().len(), 4);
        assert!(!doc.has_unsaved_changes());
    }

    #[test]
    fn test_create_term_allocates_next_id() {
        let mut doc = make_document();
        let id = doc.create_term("scaffolding", "", Some("DIO:0000001")).unwrap();
        assert_eq!(id.as_str(), "DIO:0000006");
        assert_eq!(doc.graph().parents("DIO:0000006")[0].id().as_str(), "DIO:0000001");
    }

    #[test]
    fn test_change_tracking() {
        let mut doc = make_document();
        assert!(!doc.has_unsaved_changes());

        doc.add_mapping(TermId::parse("DIO:0000005").unwrap(), "minimap2");
        assert!(doc.has_unsaved_changes());
        doc.remove_mapping("DIO:0000005", "minimap2");
        assert!(!doc.has_unsaved_changes());

        assert!(doc.move_term("DIO:0000004", None));
        assert!(doc.has_unsaved_changes());
        doc.mark_saved();
        assert!(!doc.has_unsaved_changes());
    }

    #[test]
    fn test_refresh_keeps_id_history() {
        let mut doc = make_document();
        doc.remove_term("DIO:0000005").unwrap();
        doc.refresh();
        assert_eq!(doc.graph().next_id().unwrap().as_str(), "DIO:0000006");
        assert_eq!(doc.graph().len(), 4);
    }

    #[test]
    fn test_refresh_keeps_prefix() {
        let mut doc = make_document();
        doc.set_prefix("EDAM").unwrap();
        doc.refresh();
        assert_eq!(doc.graph().prefix(), "EDAM");
        assert_eq!(doc.graph().next_id().unwrap().as_str(), "EDAM:0000001");
    }

    #[test]
    fn test_audit_reports_dangling_and_unknown() {
        let metadata = r#"[{"name": "abyss"}, {"name": "canu"}, {"name": "unicycler"}, {"name": "bwa"}]"#;
        let (mut doc, _) = Document::load(ONTOLOGY, MAPPINGS, metadata).unwrap();
        doc.add_mapping(TermId::parse("DIO:0000042").unwrap(), "abyss");
        doc.add_mapping(TermId::parse("DIO:0000001").unwrap(), "spades");

        let audit = doc.audit();
        assert_eq!(audit.dangling_terms.len(), 1);
        assert_eq!(audit.dangling_terms[0].dio_id.as_str(), "DIO:0000042");
        assert_eq!(audit.unknown_entities.len(), 1);
        assert_eq!(audit.unknown_entities[0].name, "spades");
    }

    #[test]
    fn test_load_reports_skips() {
        let (doc, report) =
            Document::load("[Term]\nname: orphan\n", "DIO:0000001\tx\nbogus\n", "[]").unwrap();
        assert!(doc.graph().is_empty());
        assert_eq!(report.hierarchy.len(), 1);
        assert_eq!(report.mappings.len(), 1);
        assert_eq!(doc.mappings().len(), 1);
    }

    #[test]
    fn test_load_rejects_bad_metadata() {
        assert!(Document::load(ONTOLOGY, MAPPINGS, "{not json").is_err());
    }
}
