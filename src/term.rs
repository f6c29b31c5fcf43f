// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Ontology term node

use crate::types::TermId;

/// A node of the classification hierarchy
///
/// A term carries only its own data. Parent and child links live in the
/// owning [`OntologyGraph`](crate::graph::OntologyGraph) as directed edges,
/// so both directions of a link are the same edge and can never disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    id: TermId,
    name: Option<String>,
    definition: Option<String>,
}

impl Term {
    /// Create a term with no name or definition
    #[must_use]
    pub fn new(id: TermId) -> Self {
        Self {
            id,
            name: None,
            definition: None,
        }
    }

    /// Builder-style name setter
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.set_name(Some(name.into()));
        self
    }

    /// Builder-style definition setter
    #[must_use]
    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.set_definition(Some(definition.into()));
        self
    }

    /// Identifier of this term
    #[must_use]
    pub fn id(&self) -> &TermId {
        &self.id
    }

    /// Display name, if any
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Definition text, if any
    #[must_use]
    pub fn definition(&self) -> Option<&str> {
        self.definition.as_deref()
    }

    /// Name when present, identifier otherwise
    #[must_use]
    pub fn label(&self) -> &str {
        self.name().unwrap_or(self.id.as_str())
    }

    pub(crate) fn set_name(&mut self, name: Option<String>) {
        self.name = normalize(name);
    }

    pub(crate) fn set_definition(&mut self, definition: Option<String>) {
        self.definition = normalize(definition);
    }
}

/// Single-line, trimmed, and absent rather than empty
fn normalize(value: Option<String>) -> Option<String> {
    let value = value?;
    let flat: String = value
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!flat.is_empty()).then_some(flat)
}
