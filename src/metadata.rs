// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Image metadata records (`metadata.json`)
//!
//! The collection is an array of records keyed by `name`. Every known
//! field is typed; unknown keys are dropped when the file is read.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Curation status of an image
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// Works and is recommended
    #[default]
    Usable,
    /// Broken
    Unusable,
    /// Works, but a better alternative exists
    #[serde(rename = "Not_recommended")]
    NotRecommended,
}

/// A version known to work, with the date it was checked
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendedVersion {
    /// Image tag
    pub version: String,
    /// Check date
    pub date: String,
}

/// A bug observed in one version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BugFound {
    /// Image tag
    pub version: String,
    /// What goes wrong
    pub description: String,
}

/// An automated smoke test
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoTest {
    /// Image reference to run
    pub docker_image: String,
    /// Input files fetched before the run
    pub input_files: Vec<String>,
    /// Directory results are written to
    pub output_dir: String,
    /// File expected after the run
    pub output_file: String,
    /// Extra configuration passed to the runner
    pub add_config: String,
    /// Shell commands to execute
    pub commands: String,
}

/// Prepared literature searches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomSearches {
    /// PubMed query URL
    pub pubmed: String,
    /// Google Scholar query URL
    pub scholar: String,
    /// Bio-protocol query URL
    pub bioprotocol: String,
    /// Bio-protocol Exchange query URL
    pub bioprotocol_exchange: String,
}

/// Alternative build recipes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alternatives {
    /// Dockerfile name to URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dockerfiles: Option<BTreeMap<String, String>>,
}

/// One image record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataItem {
    /// Image name, the key mapping entries refer to
    pub name: String,
    /// Free-text summary
    pub description: String,
    /// Curation status
    pub status: Status,
    /// Versions known to work
    pub recommended: Vec<RecommendedVersion>,
    /// Latest published tag
    pub latest: String,
    /// Known bugs per version
    pub bug_found: Vec<BugFound>,
    /// Tags that do not run
    pub not_working: Vec<String>,
    /// Tags dropped from testing
    pub no_longer_tested: Vec<String>,
    /// User manual
    pub manual_url: String,
    /// Upstream source
    pub source_url: String,
    /// Curator notes
    pub comments: Vec<String>,
    /// Whether the tool has a graphical interface
    pub gui: bool,
    /// Command that starts the GUI
    pub gui_command: String,
    /// Podman invocation
    pub podman: String,
    /// Singularity invocation
    pub singularity: String,
    /// Generic container invocation
    pub invocation_general: String,
    /// Typical tool command line
    pub usual_invocation_specific: String,
    /// Notes on the typical command line
    pub usual_invocation_specific_comments: Vec<String>,
    /// Command line used for testing
    pub test_invocation_specific: String,
    /// Test input location
    pub test_data_url: String,
    /// Test output location
    pub test_results_url: String,
    /// Icon URL
    pub icon: String,
    /// Accepted input formats
    pub input_data_type: Vec<String>,
    /// Automated smoke tests
    pub auto_tests: Vec<AutoTest>,
    /// Literature searches
    pub custom_searches: CustomSearches,
    /// Alternative build recipes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternatives: Option<Alternatives>,
}

impl MetadataItem {
    /// Blank record for a new image
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Parse a `metadata.json` array
pub fn parse_metadata(json: &str) -> serde_json::Result<Vec<MetadataItem>> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(json)
}

/// Serialize records as two-space indented JSON
pub fn serialize_metadata(items: &[MetadataItem]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_record() {
        let items = parse_metadata(
            r#"[{"name": "abyss", "status": "Not_recommended", "gui": true, "unexpected": 42}]"#,
        )
        .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "abyss");
        assert_eq!(items[0].status, Status::NotRecommended);
        assert!(items[0].gui);
        assert!(items[0].recommended.is_empty());
        assert!(items[0].alternatives.is_none());
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse_metadata("  \n").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!(parse_metadata(r#"[{"name": "x", "status": "Maybe"}]"#).is_err());
    }

    #[test]
    fn test_round_trip() {
        let mut item = MetadataItem::named("samtools");
        item.recommended.push(RecommendedVersion {
            version: "1.19".into(),
            date: "2024-02-01".into(),
        });
        item.alternatives = Some(Alternatives {
            dockerfiles: Some(BTreeMap::from([("slim".to_string(), "https://example.org/Dockerfile".to_string())])),
        });
        let json = serialize_metadata(&[item.clone()]).unwrap();
        assert!(json.contains("\n  {\n    \"name\": \"samtools\""));
        assert_eq!(parse_metadata(&json).unwrap(), vec![item]);
    }
}
