// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Reading and writing a document directory

use crate::config::Config;
use crate::document::{Document, LoadReport};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Load the document described by `config`
///
/// Missing files count as empty collections.
pub fn load(config: &Config) -> Result<(Document, LoadReport)> {
    let ontology = read_optional(&config.ontology_path())?;
    let mappings = read_optional(&config.mappings_path())?;
    let metadata = read_optional(&config.metadata_path())?;

    let (mut document, report) = Document::load(&ontology, &mappings, &metadata)
        .with_context(|| format!("Failed to parse {}", config.metadata_path().display()))?;

    if let Some(prefix) = &config.id_prefix {
        document
            .set_prefix(prefix)
            .with_context(|| format!("Invalid id_prefix '{prefix}'"))?;
    }

    Ok((document, report))
}

/// Write all three files and take the result as the saved state
pub fn save(document: &mut Document, config: &Config) -> Result<()> {
    fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("Failed to create directory {}", config.data_dir.display()))?;

    write(&config.ontology_path(), &document.ontology_text())?;
    write(&config.mappings_path(), &document.mappings_text())?;
    let metadata = document
        .metadata_text()
        .context("Failed to serialize metadata")?;
    write(&config.metadata_path(), &metadata)?;

    document.mark_saved();
    Ok(())
}

fn read_optional(path: &Path) -> Result<String> {
    if !path.exists() {
        debug!("{} not found, starting empty", path.display());
        return Ok(String::new());
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn write(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TermId;
    use tempfile::TempDir;

    fn make_config(dir: &TempDir) -> Config {
        Config {
            data_dir: dir.path().to_path_buf(),
            ..Config::default()
        }
    }

    #[test]
    fn test_load_missing_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: dir.path().join("nowhere"),
            ..Config::default()
        };
        let (document, report) = load(&config).unwrap();
        assert!(document.graph().is_empty());
        assert!(document.mappings().is_empty());
        assert!(report.is_clean());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let config = make_config(&dir);

        let mut document = Document::new();
        let root = document.create_term("assembly", "", None).unwrap();
        document.create_term("short reads", "", Some(root.as_str())).unwrap();
        document.add_mapping(TermId::parse("DIO:0000002").unwrap(), "abyss");
        assert!(document.has_unsaved_changes());

        save(&mut document, &config).unwrap();
        assert!(!document.has_unsaved_changes());

        let (reloaded, report) = load(&config).unwrap();
        assert!(report.is_clean());
        assert_eq!(reloaded.ontology_text(), document.ontology_text());
        assert_eq!(reloaded.mappings_text(), "DIO:0000002\tabyss");
        assert!(!reloaded.has_unsaved_changes());
    }

    #[test]
    fn test_configured_prefix_applies() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            id_prefix: Some("EDAM".into()),
            ..make_config(&dir)
        };
        let (document, _) = load(&config).unwrap();
        assert_eq!(document.graph().next_id().unwrap().as_str(), "EDAM:0000001");
    }

    #[test]
    fn test_bad_prefix_is_an_error() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            id_prefix: Some("not a prefix".into()),
            ..make_config(&dir)
        };
        assert!(load(&config).is_err());
    }
}
