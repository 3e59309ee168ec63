//! Command-line interface definitions.
//!
//! Defines the CLI structure for the honeylab binary using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::infrastructure::config::collection::Strategy;

/// Track market calls in video titles and measure how often the market
/// does the opposite
#[derive(Parser, Debug)]
#[command(name = "honeylab")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch recent videos, classify them, resolve what is due, and update
    /// the ledger and stats
    Collect(CollectArgs),

    /// Retry predictions that are still waiting on market data
    Recover,

    /// Show the honey index computed from the ledger
    Stats(StatsArgs),

    /// Classify a single title without touching the ledger
    Classify(ClassifyArgs),

    /// Rewrite legacy ledger partitions in the current format
    Migrate,
}

/// Arguments for `honeylab collect`.
#[derive(Args, Debug, Default)]
pub struct CollectArgs {
    /// Trailing window of videos, in days (overrides config)
    #[arg(long)]
    pub days: Option<u32>,

    /// Classification strategy (overrides config)
    #[arg(long, value_enum)]
    pub strategy: Option<Strategy>,
}

/// Arguments for `honeylab stats`.
#[derive(Args, Debug, Default)]
pub struct StatsArgs {
    /// Number of recent predictions to list (overrides config)
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Arguments for `honeylab classify`.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Video title to classify
    pub title: String,

    /// Classification strategy (overrides config)
    #[arg(long, value_enum)]
    pub strategy: Option<Strategy>,
}
