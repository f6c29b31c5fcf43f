// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Tree command - prints the hierarchy as an indented outline

use super::CommandContext;
use crate::document::Document;
use crate::store;
use anyhow::Result;

/// Run the tree command, from `root` or from every root term
pub fn run(ctx: &CommandContext, root: Option<String>) -> Result<()> {
    let (document, _) = store::load(&ctx.config)?;

    let starts: Vec<String> = match root {
        Some(id) => {
            if document.term(&id).is_none() {
                anyhow::bail!("Term not found: {}", id);
            }
            vec![id]
        }
        None => document
            .graph()
            .root_terms()
            .iter()
            .map(|t| t.id().to_string())
            .collect(),
    };

    if starts.is_empty() {
        println!("Ontology is empty.");
        return Ok(());
    }

    let mut out = String::new();
    for id in &starts {
        render(ctx, &document, id, 0, &mut out);
    }
    print!("{out}");
    Ok(())
}

/// Append one line per term; a term with several parents shows up under each
fn render(ctx: &CommandContext, document: &Document, id: &str, depth: usize, out: &mut String) {
    let Some(term) = document.term(id) else {
        return;
    };
    let mapped = document.mappings().count_for_term(id);
    let suffix = if mapped > 0 {
        format!(" [{mapped}]")
    } else {
        String::new()
    };
    let name = term.name().map(|n| format!(" {n}")).unwrap_or_default();
    out.push_str(&format!(
        "{}{}{}{}\n",
        "  ".repeat(depth),
        ctx.id(term.id()),
        name,
        suffix
    ));
    for child in document.graph().children(id) {
        render(ctx, document, child.id().as_str(), depth + 1, out);
    }
}
