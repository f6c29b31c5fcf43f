// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Mapping commands - associate images with ontology terms

use super::CommandContext;
use crate::store;
use crate::types::TermId;
use anyhow::Result;
use clap::Subcommand;

/// Mapping actions
#[derive(Debug, Subcommand)]
pub enum MapCommand {
    /// List mappings, optionally filtered
    Ls {
        /// Only mappings of this term
        #[arg(long)]
        term: Option<String>,

        /// Only mappings of this image
        #[arg(long)]
        entity: Option<String>,
    },

    /// Map an image to a term
    Add {
        /// Term identifier
        id: String,

        /// Image name
        name: String,
    },

    /// Remove a mapping
    Rm {
        /// Term identifier
        id: String,

        /// Image name
        name: String,
    },

    /// Collapse exact duplicate mappings
    Dedup,
}

/// Run a mapping command
pub fn run(ctx: &CommandContext, action: MapCommand) -> Result<()> {
    let (mut document, _) = store::load(&ctx.config)?;

    match action {
        MapCommand::Ls { term, entity } => {
            let mut entries: Vec<_> = document
                .mappings()
                .iter()
                .filter(|m| term.as_deref().map_or(true, |t| m.dio_id.as_str() == t))
                .filter(|m| entity.as_deref().map_or(true, |e| m.name == e))
                .collect();
            if entries.is_empty() {
                println!("No mappings found.");
                return Ok(());
            }
            entries.sort();
            println!("Mappings ({}):", entries.len());
            for entry in entries {
                let label = document
                    .term(entry.dio_id.as_str())
                    .map_or_else(|| ctx.warn("(missing term)"), |t| t.label().to_string());
                println!("  {} {} -> {}", ctx.id(&entry.dio_id), label, entry.name);
            }
        }

        MapCommand::Add { id, name } => {
            let dio_id = TermId::parse(&id)?;
            let name = name.trim();
            if name.is_empty() {
                anyhow::bail!("Image name must not be empty");
            }
            if document.mappings().contains(dio_id.as_str(), name) {
                anyhow::bail!("Mapping already exists: {} -> {}", id, name);
            }
            if document.term(&id).is_none() {
                eprintln!("{} term {} does not exist", ctx.warn("Warning:"), id);
            }
            document.add_mapping(dio_id, name);
            store::save(&mut document, &ctx.config)?;
            println!("Mapped {} -> {}", ctx.id(&id), name);
        }

        MapCommand::Rm { id, name } => {
            let removed = document.remove_mapping(&id, &name);
            if removed == 0 {
                println!("No mapping found for {} -> {}", id, name);
                return Ok(());
            }
            store::save(&mut document, &ctx.config)?;
            println!("Removed {} mapping(s) for {} -> {}", removed, ctx.id(&id), name);
        }

        MapCommand::Dedup => {
            let removed = document.dedup_mappings();
            if removed > 0 {
                store::save(&mut document, &ctx.config)?;
            }
            println!("Removed {} duplicate mapping(s)", removed);
        }
    }

    Ok(())
}
