// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! DIO curator library - curation core for the Docker image ontology
//!
//! This crate provides the ontology graph, the OBO-style hierarchy format,
//! the DIAF term-to-image mapping table, and the document that keeps the
//! two consistent while they are edited.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod commands;
pub mod config;
pub mod document;
pub mod error;
pub mod graph;
pub mod mapping;
pub mod metadata;
pub mod obo;
pub mod store;
pub mod term;

/// Core value types shared by the graph and the mapping table
pub mod types {
    use crate::error::OntologyError;
    use serde::{Deserialize, Serialize};
    use std::borrow::Borrow;
    use std::fmt;
    use std::str::FromStr;

    // =========================================================================
    // Term Identifier
    // =========================================================================

    /// Stable term identifier of the form `PREFIX:NNNNNNN`
    ///
    /// The prefix starts with an ASCII letter and continues with ASCII
    /// alphanumerics or underscores; the local part is exactly seven digits.
    /// Ordering is lexicographic on the full text.
    #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    #[serde(try_from = "String", into = "String")]
    pub struct TermId(String);

    impl TermId {
        /// Number of digits in the local part
        pub const DIGITS: usize = 7;

        /// Largest local number representable in seven digits
        pub const MAX_NUMBER: u32 = 9_999_999;

        /// Validate and wrap an identifier
        pub fn parse(raw: &str) -> Result<Self, OntologyError> {
            if Self::is_valid(raw) {
                Ok(Self(raw.to_string()))
            } else {
                Err(OntologyError::InvalidId(raw.to_string()))
            }
        }

        /// Build an identifier from a prefix and a local number
        pub fn from_parts(prefix: &str, number: u32) -> Result<Self, OntologyError> {
            if number > Self::MAX_NUMBER {
                return Err(OntologyError::IdSpaceExhausted(prefix.to_string()));
            }
            Self::parse(&format!("{prefix}:{number:07}"))
        }

        /// Check the `PREFIX:NNNNNNN` shape without allocating
        #[must_use]
        pub fn is_valid(raw: &str) -> bool {
            let Some((prefix, local)) = raw.split_once(':') else {
                return false;
            };
            let mut chars = prefix.chars();
            let prefix_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
            prefix_ok && local.len() == Self::DIGITS && local.bytes().all(|b| b.is_ascii_digit())
        }

        /// The prefix before the colon
        #[must_use]
        pub fn prefix(&self) -> &str {
            self.0.split_once(':').map_or("", |(p, _)| p)
        }

        /// The numeric local part
        #[must_use]
        pub fn number(&self) -> u32 {
            self.0
                .bytes()
                .skip(self.prefix().len() + 1)
                .fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
        }

        /// Borrow the identifier text
        #[must_use]
        pub fn as_str(&self) -> &str {
            &self.0
        }
    }

    impl fmt::Display for TermId {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl FromStr for TermId {
        type Err = OntologyError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            Self::parse(s)
        }
    }

    impl TryFrom<String> for TermId {
        type Error = OntologyError;

        fn try_from(value: String) -> Result<Self, Self::Error> {
            if Self::is_valid(&value) {
                Ok(Self(value))
            } else {
                Err(OntologyError::InvalidId(value))
            }
        }
    }

    impl From<TermId> for String {
        fn from(id: TermId) -> Self {
            id.0
        }
    }

    impl AsRef<str> for TermId {
        fn as_ref(&self) -> &str {
            &self.0
        }
    }

    impl Borrow<str> for TermId {
        fn borrow(&self) -> &str {
            &self.0
        }
    }

    // =========================================================================
    // Mapping Entry
    // =========================================================================

    /// Association between a term and an external entity (an image name)
    ///
    /// Field order gives the canonical sort: identifier first, then name.
    #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    pub struct Mapping {
        /// Term identifier this entry points at
        #[serde(rename = "dioId")]
        pub dio_id: TermId,
        /// Entity name, the key of a metadata record
        pub name: String,
    }

    impl Mapping {
        /// Create a mapping entry
        ///
        /// Tabs and line breaks in the name become spaces and the ends are
        /// trimmed, so the stored name is what a written line reads back as.
        #[must_use]
        pub fn new(dio_id: TermId, name: impl Into<String>) -> Self {
            let name: String = name.into();
            Self {
                dio_id,
                name: name.replace(['\t', '\r', '\n'], " ").trim().to_string(),
            }
        }
    }
}

/// Prelude for common imports
pub mod prelude {
    pub use crate::document::Document;
    pub use crate::error::{OntologyError, ParseSkip};
    pub use crate::graph::OntologyGraph;
    pub use crate::mapping::MappingTable;
    pub use crate::term::Term;
    pub use crate::types::*;
    pub use anyhow::{Context, Result};
}

#[cfg(test)]
mod tests {
    use super::types::TermId;

    #[test]
    fn test_term_id_shape() {
        assert!(TermId::is_valid("DIO:0000001"));
        assert!(TermId::is_valid("GO_x:1234567"));
        assert!(!TermId::is_valid("DIO:000001"));
        assert!(!TermId::is_valid("DIO:00000001"));
        assert!(!TermId::is_valid("DIO0000001"));
        assert!(!TermId::is_valid(":0000001"));
        assert!(!TermId::is_valid("1IO:0000001"));
        assert!(!TermId::is_valid("DIO:00a0001"));
        assert!(!TermId::is_valid(" DIO:0000001"));
    }

    #[test]
    fn test_term_id_parts() {
        let id = TermId::parse("DIO:0000420").unwrap();
        assert_eq!(id.prefix(), "DIO");
        assert_eq!(id.number(), 420);
        assert_eq!(TermId::from_parts("DIO", 420).unwrap(), id);
    }

    #[test]
    fn test_term_id_exhausted() {
        assert!(TermId::from_parts("DIO", TermId::MAX_NUMBER).is_ok());
        assert!(TermId::from_parts("DIO", TermId::MAX_NUMBER + 1).is_err());
    }

    #[test]
    fn test_term_id_serde_rejects_malformed() {
        let ok: TermId = serde_json::from_str("\"DIO:0000003\"").unwrap();
        assert_eq!(ok.as_str(), "DIO:0000003");
        assert!(serde_json::from_str::<TermId>("\"DIO:3\"").is_err());
    }
}
