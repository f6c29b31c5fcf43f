// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Ontology graph: term arena, hierarchy queries and mutations
//!
//! Terms are stored once, as node weights of a petgraph `StableDiGraph`.
//! Every `is_a` link is a single directed edge from parent to child, so the
//! parent view and the child view of a link are the same edge. Node indices
//! stay valid across removals, and the id index maps identifiers onto them.

use crate::error::OntologyError;
use crate::obo::{self, HeaderTag};
use crate::term::Term;
use crate::types::TermId;
use petgraph::algo::{has_path_connecting, is_cyclic_directed};
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::{Dfs, EdgeRef};
use petgraph::Direction;
use std::collections::BTreeMap;
use tracing::debug;

/// Prefix used for new identifiers when nothing else is known
pub const DEFAULT_PREFIX: &str = "DIO";

/// The term hierarchy
#[derive(Debug, Clone)]
pub struct OntologyGraph {
    /// Edges point from parent to child
    graph: StableDiGraph<Term, ()>,
    /// Map from term ID to node index, ordered by ID
    node_indices: BTreeMap<TermId, NodeIndex>,
    /// Prefix for allocated identifiers
    prefix: String,
    /// Highest local number ever seen per prefix, including removed terms
    high_water: BTreeMap<String, u32>,
    /// Header frame tags carried through from parsed text
    header: Vec<HeaderTag>,
}

impl Default for OntologyGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl OntologyGraph {
    /// Create a new empty graph allocating under the default prefix
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: StableDiGraph::new(),
            node_indices: BTreeMap::new(),
            prefix: DEFAULT_PREFIX.to_string(),
            high_water: BTreeMap::new(),
            header: Vec::new(),
        }
    }

    /// Parse hierarchy text, dropping malformed stanzas
    ///
    /// See [`obo::parse_hierarchy_with_diagnostics`] to get the list of
    /// dropped entries.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        obo::parse_hierarchy(text)
    }

    /// Serialize to hierarchy text in canonical order
    #[must_use]
    pub fn serialize(&self) -> String {
        obo::serialize_hierarchy(self)
    }

    // =========================================================================
    // Identifier allocation
    // =========================================================================

    /// Prefix used by [`next_id`](Self::next_id)
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Change the allocation prefix
    pub fn set_prefix(&mut self, prefix: &str) -> Result<(), OntologyError> {
        if !TermId::is_valid(&format!("{prefix}:0000000")) {
            return Err(OntologyError::InvalidId(format!("{prefix}:")));
        }
        self.prefix = prefix.to_string();
        Ok(())
    }

    /// Next free identifier under the allocation prefix
    ///
    /// One above the highest number ever present under the prefix, so ids
    /// freed by removal are not handed out again.
    pub fn next_id(&self) -> Result<TermId, OntologyError> {
        let highest = self.high_water.get(&self.prefix).copied().unwrap_or(0);
        TermId::from_parts(&self.prefix, highest + 1)
    }

    /// Carry the allocation prefix and history over from a previous instance
    /// of the same ontology, so a re-parsed copy keeps counting where the old
    /// one stopped
    pub fn absorb_history(&mut self, previous: &Self) {
        self.prefix.clone_from(&previous.prefix);
        for (prefix, &number) in &previous.high_water {
            let slot = self.high_water.entry(prefix.clone()).or_insert(0);
            *slot = (*slot).max(number);
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Look up a term by exact identifier
    #[must_use]
    pub fn find_term_by_id(&self, id: &str) -> Option<&Term> {
        self.index_of(id).map(|idx| &self.graph[idx])
    }

    /// Check whether a term exists
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.node_indices.contains_key(id)
    }

    /// All terms, ascending by identifier
    #[must_use]
    pub fn all_terms(&self) -> Vec<&Term> {
        self.node_indices.values().map(|&idx| &self.graph[idx]).collect()
    }

    /// Terms without parents, ascending by identifier
    #[must_use]
    pub fn root_terms(&self) -> Vec<&Term> {
        self.node_indices
            .values()
            .filter(|&&idx| {
                self.graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|&idx| &self.graph[idx])
            .collect()
    }

    /// Direct parents of a term, ascending by identifier
    #[must_use]
    pub fn parents(&self, id: &str) -> Vec<&Term> {
        self.neighbors(id, Direction::Incoming)
    }

    /// Direct children of a term, ascending by identifier
    #[must_use]
    pub fn children(&self, id: &str) -> Vec<&Term> {
        self.neighbors(id, Direction::Outgoing)
    }

    /// Check whether a term has any parent
    #[must_use]
    pub fn has_parents(&self, id: &str) -> bool {
        !self.parents(id).is_empty()
    }

    /// All transitive children of a term, ascending by identifier
    #[must_use]
    pub fn descendants(&self, id: &str) -> Vec<&Term> {
        let Some(start) = self.index_of(id) else {
            return Vec::new();
        };
        let mut found = Vec::new();
        let mut dfs = Dfs::new(&self.graph, start);
        while let Some(idx) = dfs.next(&self.graph) {
            if idx != start {
                found.push(&self.graph[idx]);
            }
        }
        found.sort_by(|a, b| a.id().cmp(b.id()));
        found
    }

    /// Check whether `ancestor` reaches `id` through one or more child links
    #[must_use]
    pub fn is_ancestor(&self, ancestor: &str, id: &str) -> bool {
        match (self.index_of(ancestor), self.index_of(id)) {
            (Some(a), Some(d)) if a != d => has_path_connecting(&self.graph, a, d, None),
            _ => false,
        }
    }

    /// Number of terms
    #[must_use]
    pub fn len(&self) -> usize {
        self.node_indices.len()
    }

    /// Check if the graph has no terms
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.node_indices.is_empty()
    }

    /// Number of parent-child links
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Check that no term is its own ancestor
    #[must_use]
    pub fn is_acyclic(&self) -> bool {
        !is_cyclic_directed(&self.graph)
    }

    /// Header frame tags, in file order
    #[must_use]
    pub fn header(&self) -> &[HeaderTag] {
        &self.header
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Create a term, optionally as a child of an existing one
    ///
    /// Empty `name` or `definition` leaves the field absent.
    pub fn create_term(
        &mut self,
        id: TermId,
        name: &str,
        definition: &str,
        parent: Option<&str>,
    ) -> Result<&Term, OntologyError> {
        if self.contains(id.as_str()) {
            return Err(OntologyError::DuplicateId(id));
        }
        let parent_idx = match parent {
            Some(p) => Some(
                self.index_of(p)
                    .ok_or_else(|| OntologyError::UnknownParent(p.to_string()))?,
            ),
            None => None,
        };

        let term = Term::new(id).with_name(name).with_definition(definition);
        let idx = self.insert(term);
        if let Some(p) = parent_idx {
            self.graph.update_edge(p, idx, ());
        }
        debug!("Created term {}", self.graph[idx].id());
        Ok(&self.graph[idx])
    }

    /// Replace the name and definition of a term
    pub fn update_term(
        &mut self,
        id: &str,
        name: &str,
        definition: &str,
    ) -> Result<(), OntologyError> {
        let idx = self
            .index_of(id)
            .ok_or_else(|| OntologyError::UnknownTerm(id.to_string()))?;
        let term = &mut self.graph[idx];
        term.set_name(Some(name.to_string()));
        term.set_definition(Some(definition.to_string()));
        Ok(())
    }

    /// Remove a term together with its whole subtree
    ///
    /// Every transitive child goes, including children that also have a
    /// parent outside the subtree. Returns the removed identifiers in
    /// ascending order.
    pub fn remove_term(&mut self, id: &str) -> Result<Vec<TermId>, OntologyError> {
        let start = self
            .index_of(id)
            .ok_or_else(|| OntologyError::UnknownTerm(id.to_string()))?;

        let mut subtree = Vec::new();
        let mut dfs = Dfs::new(&self.graph, start);
        while let Some(idx) = dfs.next(&self.graph) {
            subtree.push(idx);
        }

        let mut removed = Vec::with_capacity(subtree.len());
        for idx in subtree {
            // Dropping the node drops every edge touching it
            if let Some(term) = self.graph.remove_node(idx) {
                self.node_indices.remove(term.id());
                removed.push(term.id().clone());
            }
        }
        removed.sort();
        debug!("Removed {} with {} descendant(s)", id, removed.len() - 1);
        Ok(removed)
    }

    /// Make `new_parent` the only parent of a term, or make it a root
    ///
    /// Returns false without touching the graph if either term is unknown,
    /// if the new parent is the term itself, or if the new parent is one of
    /// its descendants.
    pub fn move_term(&mut self, id: &str, new_parent: Option<&str>) -> bool {
        let Some(idx) = self.index_of(id) else {
            debug!("Move rejected: unknown term {}", id);
            return false;
        };
        let parent_idx = match new_parent {
            Some(p) => match self.index_of(p) {
                Some(pi) => Some(pi),
                None => {
                    debug!("Move rejected: unknown parent {}", p);
                    return false;
                }
            },
            None => None,
        };
        if let Some(pi) = parent_idx {
            // Also true when pi == idx
            if has_path_connecting(&self.graph, idx, pi, None) {
                debug!("Move rejected: {} under {:?} would create a cycle", id, new_parent);
                return false;
            }
        }

        let old_links: Vec<_> = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .map(|e| e.id())
            .collect();
        for link in old_links {
            self.graph.remove_edge(link);
        }
        if let Some(pi) = parent_idx {
            self.graph.add_edge(pi, idx, ());
        }
        true
    }

    // =========================================================================
    // Construction helpers for the parser
    // =========================================================================

    pub(crate) fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.node_indices.get(id).copied()
    }

    /// Add a term whose identifier is known to be free
    pub(crate) fn insert(&mut self, term: Term) -> NodeIndex {
        let id = term.id().clone();
        let slot = self.high_water.entry(id.prefix().to_string()).or_insert(0);
        *slot = (*slot).max(id.number());
        let idx = self.graph.add_node(term);
        self.node_indices.insert(id, idx);
        idx
    }

    /// Link parent to child unless that would close a cycle
    pub(crate) fn link(&mut self, parent: NodeIndex, child: NodeIndex) -> bool {
        if has_path_connecting(&self.graph, child, parent, None) {
            return false;
        }
        self.graph.update_edge(parent, child, ());
        true
    }

    /// Allocate under the prefix of an identifier that was just parsed
    pub(crate) fn adopt_prefix(&mut self, id: &TermId) {
        self.prefix = id.prefix().to_string();
    }

    pub(crate) fn set_header(&mut self, header: Vec<HeaderTag>) {
        self.header = header;
    }

    fn neighbors(&self, id: &str, direction: Direction) -> Vec<&Term> {
        let Some(idx) = self.index_of(id) else {
            return Vec::new();
        };
        let mut terms: Vec<&Term> = self
            .graph
            .neighbors_directed(idx, direction)
            .map(|n| &self.graph[n])
            .collect();
        terms.sort_by(|a, b| a.id().cmp(b.id()));
        terms.dedup_by(|a, b| a.id() == b.id());
        terms
    }
}
