// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! dio-curator CLI - curate the DIO image ontology and its mappings

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use dio_curator::commands::{self, map::MapCommand, term::TermCommand, CommandContext};
use dio_curator::config;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dio-curator")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long, env = "DIO_CURATOR_CONFIG")]
    config: Option<std::path::PathBuf>,

    /// Data directory override
    #[arg(long, env = "DIO_CURATOR_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", value_parser = clap::builder::FalseyValueParser::new())]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report malformed entries and broken mapping references
    Check {
        /// Fail when anything is found
        #[arg(long)]
        strict: bool,
    },

    /// Rewrite the curated files in canonical form
    Fmt {
        /// Only report files that would change
        #[arg(long)]
        check: bool,
    },

    /// Print the hierarchy as an outline
    Tree {
        /// Start from this term instead of every root
        root: Option<String>,
    },

    /// Manage ontology terms
    Term {
        #[command(subcommand)]
        action: TermCommand,
    },

    /// Manage image mappings
    Map {
        #[command(subcommand)]
        action: MapCommand,
    },

    /// Print the effective configuration
    Config,

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    // Initialize logging; RUST_LOG wins over flags, flags over config
    let level = match cli.verbose {
        0 if cli.quiet => "error",
        0 => config.log_level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let ctx = CommandContext {
        config,
        color: !cli.no_color,
    };

    // Execute command
    match cli.command {
        Commands::Check { strict } => commands::check::run(&ctx, strict),
        Commands::Fmt { check } => commands::fmt::run(&ctx, check),
        Commands::Tree { root } => commands::tree::run(&ctx, root),
        Commands::Term { action } => commands::term::run(&ctx, action),
        Commands::Map { action } => commands::map::run(&ctx, action),
        Commands::Config => commands::config::run(&ctx),
        Commands::Completions { shell } => commands::completions::run(shell, Cli::command()),
    }
}
