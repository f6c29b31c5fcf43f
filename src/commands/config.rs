// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Config command - prints the effective configuration

use super::CommandContext;
use anyhow::Result;

/// Print the merged configuration as TOML
pub fn run(ctx: &CommandContext) -> Result<()> {
    print!("{}", ctx.config.to_toml()?);
    Ok(())
}
