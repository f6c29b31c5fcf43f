// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Format command - rewrites the curated files in canonical form

use super::CommandContext;
use crate::store;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Run the format command
///
/// With `check`, nothing is written and the command fails if any file is
/// not already canonical.
pub fn run(ctx: &CommandContext, check: bool) -> Result<()> {
    let (mut document, report) = store::load(&ctx.config)?;

    if check {
        let metadata = document.metadata_text().context("Failed to serialize metadata")?;
        let targets = [
            (ctx.config.ontology_path(), document.ontology_text()),
            (ctx.config.mappings_path(), document.mappings_text()),
            (ctx.config.metadata_path(), metadata),
        ];
        let mut dirty = 0;
        for (path, canonical) in &targets {
            if !is_canonical(path, canonical)? {
                println!("{} {}", ctx.warn("would reformat"), path.display());
                dirty += 1;
            }
        }
        if dirty > 0 {
            anyhow::bail!("{} file(s) not in canonical form", dirty);
        }
        println!("{}", ctx.ok("All files canonical"));
        return Ok(());
    }

    let dropped = report.hierarchy.len() + report.mappings.len();
    if dropped > 0 {
        eprintln!(
            "{} dropping {} malformed entries; run 'check' to list them",
            ctx.warn("Warning:"),
            dropped
        );
    }
    store::save(&mut document, &ctx.config)?;
    println!("Formatted {}", ctx.config.data_dir.display());
    Ok(())
}

/// Missing files count as canonical when their canonical form is empty
fn is_canonical(path: &Path, canonical: &str) -> Result<bool> {
    if !path.exists() {
        return Ok(canonical.is_empty() || canonical == "[]");
    }
    let current =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(current == canonical)
}
