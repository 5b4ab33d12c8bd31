//! Command-line interface for star_checkers.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Star Checkers - two-player Chinese Checkers with a room relay
#[derive(Parser, Debug)]
#[command(name = "star_checkers")]
#[command(about = "Two-player star-board Chinese Checkers", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the client TOML config
    #[arg(long, global = true, default_value = "star_checkers.toml")]
    pub config: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play hot-seat on this terminal
    Local,

    /// Join a relay room as a fixed seat
    Client {
        /// Relay host
        host: String,

        /// Relay port
        port: u16,

        /// Seat to claim (0 or 1)
        #[arg(value_parser = clap::value_parser!(u8).range(0..=1))]
        seat: u8,

        /// Room name (defaults to the config file's room)
        #[arg(long)]
        room: Option<String>,
    },

    /// Run the relay server
    Server {
        /// Port to bind to
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
    },
}
