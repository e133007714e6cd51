mod config;
mod db;
mod models;
mod service;
mod ui;

use std::io;

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::service::ProjectService;
use crate::ui::menu::Menu;

/// Track projects, their hours and difficulty from the command line
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Database URL, overrides DATABASE_URL
    #[arg(long)]
    database_url: Option<String>,

    /// Log debug output to stderr
    #[arg(long)]
    debug: bool,
}

fn init_tracing(debug: bool) -> Result<()> {
    let default_level = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // stdout belongs to the menu
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(debug)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug)?;

    // Load configuration
    let config = config::init(cli.database_url)?;

    // Initialize database connection
    let db = db::init(&config).await?;
    info!(database_url = config.database_url(), "database connection established");

    let service = ProjectService::new(db);

    let stdin = io::stdin();
    let result = Menu::new(&service, stdin.lock(), io::stdout()).run().await;

    service.close().await;
    result
}
