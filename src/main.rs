//! Star Checkers - unified CLI
//!
//! Hot-seat play, networked play through a relay, and the relay itself.

#![warn(missing_docs)]

use anyhow::Result;
use clap::Parser;
use star_checkers::cli::{Cli, Command};
use star_checkers::{ClientConfig, RelayConfig, RelayServer, tui};
use std::path::Path;
use tracing::{error, info, instrument};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,star_checkers=debug";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let usage_error = e.use_stderr();
            e.print()?;
            std::process::exit(if usage_error { 1 } else { 0 });
        }
    };

    match cli.command {
        Command::Server { port, host } => run_server(RelayConfig::new(host, port)).await,
        Command::Local => {
            let config = load_client_config(&cli.config)?;
            init_file_logging(&config)?;
            tui::run_local(config).await
        }
        Command::Client {
            host,
            port,
            seat,
            room,
        } => {
            let config = load_client_config(&cli.config)?.with_room(room);
            init_file_logging(&config)?;
            let result = tui::run_networked(config, host, port, seat).await;
            if let Err(e) = &result {
                error!(error = %e, "Client exited with error");
            }
            result
        }
    }
}

/// Runs the relay until the listener fails.
async fn run_server(config: RelayConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .init();

    info!(address = %config.address(), "Starting star_checkers relay");
    let server = RelayServer::bind(&config).await?;
    server.run().await?;
    Ok(())
}

#[instrument]
fn load_client_config(path: &Path) -> Result<ClientConfig> {
    Ok(ClientConfig::from_file(path)?)
}

/// Sends logs to a file so they do not corrupt the raw-mode terminal.
fn init_file_logging(config: &ClientConfig) -> Result<()> {
    let log_file = std::fs::File::create(config.log_file())?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install file logger: {e}"))?;
    info!(log_file = %config.log_file().display(), "File logging started");
    Ok(())
}
