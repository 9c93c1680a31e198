use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wh_cli::commands;
use wh_cli::{Backend, Cli, Config};
use wh_core::Tracker;
use wh_db::{Database, LocalStore};
use wh_sheet::{SheetClient, SheetStore};

/// Open the local database, ensuring the parent directory exists.
fn open_local_store(config: &Config) -> Result<LocalStore> {
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = Database::open(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))?;
    Ok(LocalStore::new(db))
}

fn open_sheet_store(config: &Config) -> Result<SheetStore<Local>> {
    let url = config
        .sheet_url
        .as_deref()
        .context("the sheet backend needs sheet_url (or WH_SHEET_URL) to be set")?;
    let client = SheetClient::new(url, config.timeout()).context("failed to create sheet client")?;
    Ok(SheetStore::new(client, Local).with_marker(config.active_path.clone()))
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
        .with_writer(std::io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let mut config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    tracing::debug!(?config, "loaded configuration");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(async {
        match config.backend {
            Backend::Local => {
                let mut tracker = Tracker::new(open_local_store(&config)?);
                commands::dispatch(&mut tracker, command).await
            }
            Backend::Sheet => {
                let mut tracker = Tracker::new(open_sheet_store(&config)?);
                commands::dispatch(&mut tracker, command).await
            }
        }
    })
}
