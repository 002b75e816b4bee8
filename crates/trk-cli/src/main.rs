use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use trk_cli::commands::{edit, print, start, stop};
use trk_cli::{Cli, Commands, Config};
use trk_core::StartMode;

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(trk_db::Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = trk_db::Database::open(&config.database_path).context("failed to open database")?;
    Ok((db, config))
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
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let mut stdout = io::stdout();
    match &cli.command {
        Some(Commands::Start { pause, at, name }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            start::run(&mut stdout, &db, StartMode::Push, *pause, at, name)?;
        }
        Some(Commands::Next { at, name }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            start::run(&mut stdout, &db, StartMode::Next, false, at, name)?;
        }
        Some(Commands::Stop { at }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            stop::run(&mut stdout, &db, at)?;
        }
        Some(Commands::Print { date }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            print::run(&mut stdout, &db, date.as_deref())?;
        }
        Some(Commands::Edit { date }) => {
            let (mut db, _config) = open_database(cli.config.as_deref())?;
            edit::run(&mut db, date.as_deref())?;
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
