//! CLI subcommand implementations.

pub mod audit;
pub mod classify;
pub mod events;
pub mod import;
pub mod init;
pub mod report;
pub mod rules;
pub mod util;
