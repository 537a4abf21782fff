use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tally_cli::commands::util::TimeRange;
use tally_cli::commands::{audit, classify, events, import, init, report, rules};
use tally_cli::{Cli, Commands, Config};
use tally_store::{Store, StoreError};

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

/// Load config and open the storage document.
fn open_store(config_path: Option<&Path>) -> Result<(Store, Config)> {
    let config = load_config(config_path)?;
    let store = match Store::open(&config.storage_path) {
        Ok(store) => store,
        Err(e @ StoreError::NotFound { .. }) => {
            return Err(e).context("run `tally init` to create it");
        }
        Err(e) => return Err(e).context("failed to open storage"),
    };
    Ok((store, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let mut stdout = io::stdout().lock();

    match &cli.command {
        Some(Commands::Init) => {
            let config = load_config(cli.config.as_deref())?;
            init::run(&config.storage_path)?;
        }
        Some(Commands::Import) => {
            let (mut store, _config) = open_store(cli.config.as_deref())?;
            let added = import::run(&mut store, io::stdin().lock())?;
            println!("Imported {added} events");
        }
        Some(Commands::Report {
            rules,
            range,
            json,
            breakdown,
            samples,
        }) => {
            let (store, config) = open_store(cli.config.as_deref())?;
            let options = report::ReportOptions {
                rules: config.rules_or(rules.version),
                range: TimeRange::from_args(range)?,
                breakdown: *breakdown,
                sample_limit: samples.then_some(config.sample_limit),
            };
            report::run(&mut stdout, store.events(), &options, *json)?;
        }
        Some(Commands::Classify {
            titles,
            rules,
            json,
        }) => {
            // Classify works without storage
            let config = load_config(cli.config.as_deref())?;
            let version = config.rules_or(rules.version);
            classify::run(&mut stdout, version.rules(), titles, *json)?;
        }
        Some(Commands::Rules { rules }) => {
            let config = load_config(cli.config.as_deref())?;
            rules::run(&mut stdout, config.rules_or(rules.version).rules())?;
        }
        Some(Commands::Audit { rules, json }) => {
            let (store, config) = open_store(cli.config.as_deref())?;
            let version = config.rules_or(rules.version);
            audit::run(&mut stdout, version.rules(), &store.events(), *json)?;
        }
        Some(Commands::Events { rules, range }) => {
            let (store, config) = open_store(cli.config.as_deref())?;
            let version = config.rules_or(rules.version);
            let range = TimeRange::from_args(range)?;
            events::run(&mut stdout, version.rules(), store.events(), &range)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
