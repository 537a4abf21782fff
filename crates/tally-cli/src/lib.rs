//! Calendar time tally CLI library.
//!
//! This crate provides the CLI interface for tally.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, RangeArgs, RulesArg};
pub use config::Config;
