//! CLI argument parsing for recap
//!
//! Global flags: --config, --format, --quiet, --verbose, --log-level, --log-json

pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use output::OutputFormat;

/// Recap - distill conversation transcripts into linked vault notes
#[derive(Parser, Debug)]
#[command(name = "recap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file (default: ./recap.toml, then the user config dir)
    #[arg(long, short, global = true, env = "RECAP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Log debug detail and phase timings to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level or filter directive (e.g. `info`, `recap_core=trace`)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize every pending transcript into a vault note
    Run {
        /// Attempt at most this many pending transcripts
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },

    /// Show which transcripts are pending, done, or excluded
    Status,

    /// Print the keyword vocabulary drawn from vault note titles
    Vocab,

    /// Write a starter config file and an empty ledger
    Init {
        /// Vault directory to record in the config (default: current directory)
        #[arg(long)]
        vault: Option<PathBuf>,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}
