//! Command-line interface for the MathTug client.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::Config;

/// MathTug command-line arguments.
///
/// Flag values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "mathtug", about = "Arithmetic tug-of-war client")]
pub struct CliArgs {
    /// Base URL of the authority's HTTP API.
    #[arg(long)]
    pub api_url: Option<String>,

    /// Base URL of the authority's WebSocket endpoint.
    #[arg(long)]
    pub ws_url: Option<String>,

    /// Log filter (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// What to do once connected to the authority.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a room and play as team A.
    Create {
        /// Display name.
        #[arg(long)]
        username: String,

        /// Question difficulty: easy, medium, hard or extreme.
        #[arg(long)]
        difficulty: Option<String>,
    },
    /// Join an existing room by code.
    Join {
        /// Room code to join (e.g. AB12CD).
        #[arg(long)]
        room_code: String,

        /// Display name.
        #[arg(long)]
        username: String,

        /// Requested team (A or B); auto-assigned when omitted.
        #[arg(long)]
        team: Option<String>,
    },
    /// Print the global leaderboard.
    Leaderboard {
        /// Number of rows to fetch.
        #[arg(long)]
        limit: Option<u32>,
    },
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref url) = args.api_url {
            self.server.api_url = url.clone();
        }
        if let Some(ref url) = args.ws_url {
            self.server.ws_url = url.clone();
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
