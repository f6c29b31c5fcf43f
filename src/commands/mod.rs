// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Command implementations

pub mod check;
pub mod completions;
pub mod config;
pub mod fmt;
pub mod map;
pub mod term;
pub mod tree;

use crate::config::Config;
use owo_colors::OwoColorize;
use std::fmt::Display;

/// State shared by every command
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Effective configuration
    pub config: Config,
    /// Whether to color terminal output
    pub color: bool,
}

impl CommandContext {
    /// Identifier-style text
    pub fn id(&self, text: impl Display) -> String {
        if self.color {
            text.cyan().to_string()
        } else {
            text.to_string()
        }
    }

    /// Warning-style text
    pub fn warn(&self, text: impl Display) -> String {
        if self.color {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    }

    /// Success-style text
    pub fn ok(&self, text: impl Display) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }
}
