//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tally_core::{Category, RuleVersion};

/// Calendar time tally.
///
/// Files synced calendar events under life categories using ordered keyword
/// rules and reports where the hours went.
#[derive(Debug, Parser)]
#[command(name = "tally", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the storage document if it does not exist.
    Init,

    /// Append events read from stdin (JSON lines or a JSON array).
    Import,

    /// Report hours per category.
    Report {
        #[command(flatten)]
        rules: RulesArg,

        #[command(flatten)]
        range: RangeArgs,

        /// Output as JSON.
        #[arg(long)]
        json: bool,

        /// List distinct titles within one category.
        #[arg(long, value_name = "CATEGORY")]
        breakdown: Option<Category>,

        /// Show the first few events of every category (see `sample_limit`).
        #[arg(long)]
        samples: bool,
    },

    /// Show the category a title would be filed under.
    Classify {
        /// Event titles to classify.
        #[arg(required = true)]
        titles: Vec<String>,

        #[command(flatten)]
        rules: RulesArg,

        /// Output as JSON lines.
        #[arg(long)]
        json: bool,
    },

    /// List the ordered rules of a rule set.
    Rules {
        #[command(flatten)]
        rules: RulesArg,
    },

    /// Find rules that earlier rules shadow, using stored event titles.
    Audit {
        #[command(flatten)]
        rules: RulesArg,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print stored events with their category as JSON lines.
    Events {
        #[command(flatten)]
        rules: RulesArg,

        #[command(flatten)]
        range: RangeArgs,
    },
}

/// Rule set selection shared by several subcommands.
#[derive(Debug, Clone, Copy, Args)]
pub struct RulesArg {
    /// Rule set version (v1, v2, final). Defaults to the configured one.
    #[arg(long = "rules", value_name = "VERSION")]
    pub version: Option<RuleVersion>,
}

/// Start-time filter shared by several subcommands.
#[derive(Debug, Clone, Default, Args)]
pub struct RangeArgs {
    /// Only events starting at or after this time (ISO 8601 or "2 weeks ago").
    #[arg(long)]
    pub start: Option<String>,

    /// Only events starting before this time (ISO 8601 or "1 day ago").
    #[arg(long)]
    pub end: Option<String>,
}
