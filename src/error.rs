// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Error kinds for graph mutation and text parsing

use crate::types::TermId;
use thiserror::Error;

/// Failure of a graph or mapping operation
///
/// Every operation that returns one of these has left its target untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OntologyError {
    /// Creation with an identifier that is already taken
    #[error("term {0} already exists")]
    DuplicateId(TermId),
    /// Creation referencing a parent that is not in the graph
    #[error("parent term {0} does not exist")]
    UnknownParent(String),
    /// Operation on a term that is not in the graph
    #[error("term {0} does not exist")]
    UnknownTerm(String),
    /// Text that is not of the form `PREFIX:NNNNNNN`
    #[error("invalid term identifier '{0}' (expected PREFIX:NNNNNNN)")]
    InvalidId(String),
    /// All seven-digit numbers under the prefix are used up
    #[error("identifier space for prefix {0} is exhausted")]
    IdSpaceExhausted(String),
}

/// A stanza or mapping line that was dropped while parsing
///
/// These are diagnostics: the parse that produced them still succeeded
/// with the offending entry omitted. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseSkip {
    /// `[Term]` stanza without an `id` tag
    #[error("line {line}: term stanza has no id")]
    MissingId {
        /// Line of the stanza header
        line: usize,
    },
    /// `id` tag whose value is not a valid identifier
    #[error("line {line}: invalid term id '{value}'")]
    InvalidId {
        /// Line of the `id` tag
        line: usize,
        /// Raw value found
        value: String,
    },
    /// Second stanza for an identifier already defined earlier
    #[error("line {line}: duplicate term id {id}")]
    DuplicateId {
        /// Line of the later stanza header
        line: usize,
        /// Repeated identifier
        id: TermId,
    },
    /// `is_a` pointing at a term that was never defined
    #[error("line {line}: {term} is_a unknown term '{parent}'")]
    UnknownParent {
        /// Line of the `is_a` tag
        line: usize,
        /// Term carrying the reference
        term: TermId,
        /// Raw parent reference
        parent: String,
    },
    /// `is_a` that would make a term its own ancestor
    #[error("line {line}: {term} is_a {parent} would create a cycle")]
    CyclicParent {
        /// Line of the `is_a` tag
        line: usize,
        /// Term carrying the reference
        term: TermId,
        /// Parent that is already a descendant
        parent: TermId,
    },
    /// Mapping line with fewer than two tab-separated fields
    #[error("line {line}: mapping needs two tab-separated fields")]
    MalformedMapping {
        /// Offending line
        line: usize,
    },
    /// Mapping line whose first field is not a valid identifier
    #[error("line {line}: invalid mapping id '{value}'")]
    InvalidMappingId {
        /// Offending line
        line: usize,
        /// Raw first field
        value: String,
    },
}

impl ParseSkip {
    /// Line the diagnostic refers to
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            Self::MissingId { line }
            | Self::InvalidId { line, .. }
            | Self::DuplicateId { line, .. }
            | Self::UnknownParent { line, .. }
            | Self::CyclicParent { line, .. }
            | Self::MalformedMapping { line }
            | Self::InvalidMappingId { line, .. } => *line,
        }
    }
}

/// Failure to load a document from its three source texts
#[derive(Debug, Error)]
pub enum DocumentError {
    /// `metadata.json` is not a valid record array
    #[error("invalid metadata JSON: {0}")]
    Metadata(#[from] serde_json::Error),
}
