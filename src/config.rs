// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management
//!
//! Layers, lowest first: built-in defaults, an optional TOML file, then
//! `DIO_CURATOR_*` environment variables.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "DIO_CURATOR";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the curated files
    pub data_dir: PathBuf,
    /// Prefix for newly allocated term identifiers; inferred from the
    /// ontology when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_prefix: Option<String>,
    /// Hierarchy file name inside `data_dir`
    pub ontology_file: String,
    /// Mapping file name inside `data_dir`
    pub mappings_file: String,
    /// Metadata file name inside `data_dir`
    pub metadata_file: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            id_prefix: None,
            ontology_file: "dio.obo".to_string(),
            mappings_file: "dio.diaf".to_string(),
            metadata_file: "metadata.json".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Path of the hierarchy file
    #[must_use]
    pub fn ontology_path(&self) -> PathBuf {
        self.data_dir.join(&self.ontology_file)
    }

    /// Path of the mapping file
    #[must_use]
    pub fn mappings_path(&self) -> PathBuf {
        self.data_dir.join(&self.mappings_file)
    }

    /// Path of the metadata file
    #[must_use]
    pub fn metadata_path(&self) -> PathBuf {
        self.data_dir.join(&self.metadata_file)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("org", "hyperpolymath", "dio-curator")
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".dio-curator"))
}

/// Load configuration from defaults, an optional file and the environment
pub fn load(file: Option<&Path>) -> Result<Config> {
    let defaults = Config::default();
    let mut builder = ::config::Config::builder()
        .set_default("data_dir", defaults.data_dir.to_string_lossy().to_string())?
        .set_default("ontology_file", defaults.ontology_file)?
        .set_default("mappings_file", defaults.mappings_file)?
        .set_default("metadata_file", defaults.metadata_file)?
        .set_default("log_level", defaults.log_level)?;

    if let Some(path) = file {
        builder = builder.add_source(::config::File::from(path).required(true));
    }
    builder = builder.add_source(::config::Environment::with_prefix(ENV_PREFIX));

    builder
        .build()
        .context("Failed to assemble configuration")?
        .try_deserialize()
        .context("Invalid configuration")
}
