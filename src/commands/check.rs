// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Check command - reports dropped entries and broken references

use super::CommandContext;
use crate::store;
use anyhow::Result;
use tracing::info;

/// Run the check command
///
/// With `strict`, any finding makes the command fail.
pub fn run(ctx: &CommandContext, strict: bool) -> Result<()> {
    info!("Checking {}", ctx.config.data_dir.display());
    let (document, report) = store::load(&ctx.config)?;
    let audit = document.audit();

    println!(
        "{} term(s), {} root(s), {} mapping(s), {} metadata record(s)",
        document.graph().len(),
        document.graph().root_terms().len(),
        document.mappings().len(),
        document.metadata().len()
    );

    for skip in &report.hierarchy {
        println!("  {} {}: {}", ctx.warn("skipped"), ctx.config.ontology_file, skip);
    }
    for skip in &report.mappings {
        println!("  {} {}: {}", ctx.warn("skipped"), ctx.config.mappings_file, skip);
    }
    for entry in &audit.dangling_terms {
        println!(
            "  {} {} -> {}: no such term",
            ctx.warn("dangling"),
            ctx.id(&entry.dio_id),
            entry.name
        );
    }
    for entry in &audit.unknown_entities {
        println!(
            "  {} {} -> {}: no metadata record",
            ctx.warn("unknown"),
            ctx.id(&entry.dio_id),
            entry.name
        );
    }

    let findings = report.hierarchy.len()
        + report.mappings.len()
        + audit.dangling_terms.len()
        + audit.unknown_entities.len();
    if findings == 0 {
        println!("{}", ctx.ok("No problems found"));
    } else if strict {
        anyhow::bail!("{} problem(s) found", findings);
    } else {
        println!("{} problem(s) found", findings);
    }

    Ok(())
}
