use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use ll_core::Ledger;
use ll_db::Database;
use tracing_subscriber::EnvFilter;

use ll_cli::commands::{dates, durations, forget, history, inspect, items, status, summary};
use ll_cli::{Cli, Commands, Config};

/// Load config and open the ledger, ensuring the database directory exists.
fn open_ledger(config_path: Option<&Path>) -> Result<(Ledger<Database>, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = Database::open(&config.database_path).context("failed to open database")?;
    Ok((Ledger::new(config.ledger_config(), db), config))
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

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let (ledger, config) = open_ledger(cli.config.as_deref())?;
    let mut out = io::stdout().lock();

    match command {
        Commands::Dates { json } => dates::run(&mut out, &ledger, *json)?,
        Commands::Durations { json } => durations::run(&mut out, &ledger, *json)?,
        Commands::Items { json } => items::run(&mut out, &ledger, *json)?,
        Commands::Summary { date, json } => summary::run(&mut out, &ledger, date.as_ref(), *json)?,
        Commands::History { item, json } => history::run(&mut out, &ledger, item, *json)?,
        Commands::Inspect { date, json } => inspect::run(&mut out, &ledger, date, *json)?,
        Commands::Status => status::run(&mut out, &ledger, &config.database_path)?,
        Commands::Forget { date } => forget::run(&mut out, &ledger, date)?,
    }

    Ok(())
}
