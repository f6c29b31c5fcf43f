// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! DIAF mapping table: term identifier to image name
//!
//! One mapping per line, `DIO:0000033<TAB>abyss`, no header. Parsing keeps
//! entries in file order and keeps exact duplicates; serialization sorts by
//! identifier, then name.

use crate::error::ParseSkip;
use crate::types::{Mapping, TermId};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Ordered collection of mapping entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingTable {
    entries: Vec<Mapping>,
}

impl MappingTable {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse mapping text, dropping malformed lines
    #[must_use]
    pub fn parse(text: &str) -> Self {
        parse_mappings(text)
    }

    /// Serialize in canonical order
    #[must_use]
    pub fn serialize(&self) -> String {
        serialize_mappings(&self.entries)
    }

    /// Append an entry; duplicates are kept
    ///
    /// The name is stored as [`Mapping::new`] normalizes it.
    pub fn add(&mut self, dio_id: TermId, name: impl Into<String>) {
        self.entries.push(Mapping::new(dio_id, name));
    }

    /// Remove every entry matching both fields; returns how many went
    pub fn remove(&mut self, dio_id: &str, name: &str) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|m| !(m.dio_id.as_str() == dio_id && m.name == name));
        before - self.entries.len()
    }

    /// Remove every entry pointing at one of `ids`; returns how many went
    pub fn remove_for_terms(&mut self, ids: &[TermId]) -> usize {
        let doomed: BTreeSet<&TermId> = ids.iter().collect();
        let before = self.entries.len();
        self.entries.retain(|m| !doomed.contains(&m.dio_id));
        before - self.entries.len()
    }

    /// Entries for one term identifier
    #[must_use]
    pub fn for_term(&self, dio_id: &str) -> Vec<&Mapping> {
        self.entries
            .iter()
            .filter(|m| m.dio_id.as_str() == dio_id)
            .collect()
    }

    /// Entries for one entity name
    #[must_use]
    pub fn for_entity(&self, name: &str) -> Vec<&Mapping> {
        self.entries.iter().filter(|m| m.name == name).collect()
    }

    /// Number of entries for one term identifier
    #[must_use]
    pub fn count_for_term(&self, dio_id: &str) -> usize {
        self.entries
            .iter()
            .filter(|m| m.dio_id.as_str() == dio_id)
            .count()
    }

    /// Check for an exact entry
    #[must_use]
    pub fn contains(&self, dio_id: &str, name: &str) -> bool {
        self.entries
            .iter()
            .any(|m| m.dio_id.as_str() == dio_id && m.name == name)
    }

    /// Collapse exact duplicates, keeping the first occurrence
    pub fn dedup(&mut self) -> usize {
        let before = self.entries.len();
        let mut seen = BTreeSet::new();
        self.entries.retain(|m| seen.insert(m.clone()));
        before - self.entries.len()
    }

    /// Entries in their current order
    #[must_use]
    pub fn entries(&self) -> &[Mapping] {
        &self.entries
    }

    /// Iterate over entries in their current order
    pub fn iter(&self) -> impl Iterator<Item = &Mapping> {
        self.entries.iter()
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse mapping text, logging and dropping malformed lines
#[must_use]
pub fn parse_mappings(text: &str) -> MappingTable {
    parse_mappings_with_diagnostics(text).0
}

/// Parse mapping text and also return every dropped line
pub fn parse_mappings_with_diagnostics(text: &str) -> (MappingTable, Vec<ParseSkip>) {
    let mut table = MappingTable::new();
    let mut skipped = Vec::new();

    for (i, raw) in text.split('\n').enumerate() {
        let line = i + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        let mut fields = trimmed.split('\t');
        let (Some(id), Some(name)) = (fields.next(), fields.next()) else {
            skipped.push(ParseSkip::MalformedMapping { line });
            continue;
        };
        if name.trim().is_empty() {
            skipped.push(ParseSkip::MalformedMapping { line });
            continue;
        }
        match TermId::parse(id.trim()) {
            Ok(dio_id) => table.add(dio_id, name.trim()),
            Err(_) => skipped.push(ParseSkip::InvalidMappingId {
                line,
                value: id.trim().to_string(),
            }),
        }
    }

    for skip in &skipped {
        warn!("Skipping mapping: {}", skip);
    }
    debug!("Parsed {} mapping(s), {} skipped", table.len(), skipped.len());
    (table, skipped)
}

/// Serialize entries sorted by identifier, then name, one per line
#[must_use]
pub fn serialize_mappings(entries: &[Mapping]) -> String {
    let mut sorted: Vec<&Mapping> = entries.iter().collect();
    sorted.sort();
    sorted
        .iter()
        .map(|m| format!("{}\t{}", m.dio_id, m.name))
        .collect::<Vec<_>>()
        .join("\n")
}
