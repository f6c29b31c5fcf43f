// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Term management commands - create, edit, move and delete ontology terms

use super::CommandContext;
use crate::store;
use crate::types::TermId;
use anyhow::{Context, Result};
use clap::Subcommand;

/// Term actions
#[derive(Debug, Subcommand)]
pub enum TermCommand {
    /// Show one term with its parents, children and mappings
    Show {
        /// Term identifier
        id: String,
    },

    /// Create a term
    Add {
        /// Display name
        name: String,

        /// Definition text
        #[arg(long = "def")]
        definition: Option<String>,

        /// Parent term identifier
        #[arg(long)]
        parent: Option<String>,

        /// Explicit identifier (allocated when omitted)
        #[arg(long)]
        id: Option<String>,
    },

    /// Change the name or definition of a term
    Edit {
        /// Term identifier
        id: String,

        /// New display name
        #[arg(long)]
        name: Option<String>,

        /// New definition text
        #[arg(long = "def")]
        definition: Option<String>,
    },

    /// Delete a term, its subtree and every mapping into it
    Rm {
        /// Term identifier
        id: String,
    },

    /// Make a term the child of another, or a root
    Mv {
        /// Term identifier
        id: String,

        /// New parent (omit to make the term a root)
        #[arg(long)]
        parent: Option<String>,
    },
}

/// Run a term command
pub fn run(ctx: &CommandContext, action: TermCommand) -> Result<()> {
    let (mut document, _) = store::load(&ctx.config)?;

    match action {
        TermCommand::Show { id } => {
            let term = document
                .term(&id)
                .ok_or_else(|| anyhow::anyhow!("Term not found: {}", id))?;
            println!("{}", ctx.id(term.id()));
            if let Some(name) = term.name() {
                println!("  name: {name}");
            }
            if let Some(definition) = term.definition() {
                println!("  def: {definition}");
            }
            for parent in document.graph().parents(&id) {
                println!("  is_a: {} {}", ctx.id(parent.id()), parent.label());
            }
            for child in document.graph().children(&id) {
                println!("  child: {} {}", ctx.id(child.id()), child.label());
            }
            for mapping in document.mappings_for_term(&id) {
                println!("  mapped: {}", mapping.name);
            }
        }

        TermCommand::Add {
            name,
            definition,
            parent,
            id,
        } => {
            let definition = definition.unwrap_or_default();
            let created = match id {
                Some(raw) => {
                    let id = TermId::parse(&raw)?;
                    document.create_term_with_id(id, &name, &definition, parent.as_deref())?
                }
                None => document.create_term(&name, &definition, parent.as_deref())?,
            };
            store::save(&mut document, &ctx.config)?;
            println!("Created term: {} {}", ctx.id(&created), name);
        }

        TermCommand::Edit {
            id,
            name,
            definition,
        } => {
            let term = document
                .term(&id)
                .ok_or_else(|| anyhow::anyhow!("Term not found: {}", id))?;
            let name = name.unwrap_or_else(|| term.name().unwrap_or_default().to_string());
            let definition = definition
                .unwrap_or_else(|| term.definition().unwrap_or_default().to_string());
            document.update_term(&id, &name, &definition)?;
            store::save(&mut document, &ctx.config)?;
            println!("Updated term: {}", ctx.id(&id));
        }

        TermCommand::Rm { id } => {
            let removal = document
                .remove_term(&id)
                .with_context(|| format!("Cannot remove {id}"))?;
            store::save(&mut document, &ctx.config)?;
            println!(
                "Removed {} term(s) and {} mapping(s)",
                removal.terms.len(),
                removal.mappings
            );
            for removed in &removal.terms {
                println!("  {}", ctx.id(removed));
            }
        }

        TermCommand::Mv { id, parent } => {
            if !document.move_term(&id, parent.as_deref()) {
                anyhow::bail!(
                    "Cannot move {} under {}: unknown term or the move would create a cycle",
                    id,
                    parent.as_deref().unwrap_or("(root)")
                );
            }
            store::save(&mut document, &ctx.config)?;
            match parent {
                Some(p) => println!("Moved {} under {}", ctx.id(&id), ctx.id(&p)),
                None => println!("Moved {} to the top level", ctx.id(&id)),
            }
        }
    }

    Ok(())
}
