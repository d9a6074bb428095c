//! Binary entry point for the MathTug CLI client.

mod session;

use std::time::Duration;

use clap::Parser;

use mathtug_config::{CliArgs, Command, Config};
use mathtug_protocol::{Difficulty, ParseTagError, Team};
use mathtug_rooms::{CreateRoom, JoinRoom, RoomsClient};

/// Top-level application errors.
#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Rooms(#[from] mathtug_rooms::RoomsError),

    #[error(transparent)]
    Connect(#[from] mathtug_client::ConnectError),

    #[error(transparent)]
    InvalidArgument(#[from] ParseTagError),

    #[error("stdin error: {0}")]
    Stdin(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().or_else(Config::default_dir);
    let mut config = match &config_dir {
        Some(dir) => Config::load_or_create(dir).unwrap_or_else(|e| {
            eprintln!("config error ({e}), continuing with defaults");
            Config::default()
        }),
        None => Config::default(),
    };
    config.apply_cli_overrides(&args);

    mathtug_log::init(Some(&config), None);

    if let Err(e) = run(args.command, &config).await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

async fn run(command: Command, config: &Config) -> Result<(), AppError> {
    let rooms = RoomsClient::new(
        &config.server.api_url,
        Duration::from_secs(config.server.request_timeout_secs),
    )?;

    match command {
        Command::Create {
            username,
            difficulty,
        } => {
            let difficulty: Difficulty = difficulty
                .as_deref()
                .unwrap_or(&config.game.default_difficulty)
                .parse()?;
            let join = rooms
                .create_room(&CreateRoom::new(&username, difficulty))
                .await?;
            println!(
                "created room {} — share this code so team B can join",
                join.room_code
            );
            session::play(config, join, username).await
        }
        Command::Join {
            room_code,
            username,
            team,
        } => {
            let mut request = JoinRoom::new(room_code, &username);
            if let Some(team) = team {
                request = request.with_team(team.parse::<Team>()?);
            }
            let join = rooms.join_room(&request).await?;
            println!("joined room {} on team {}", join.room_code, join.team);
            session::play(config, join, username).await
        }
        Command::Leaderboard { limit } => {
            let limit = limit.unwrap_or(config.game.leaderboard_limit);
            let entries = rooms.leaderboard(limit).await?;
            if entries.is_empty() {
                println!("no games played yet");
            }
            for entry in entries {
                println!(
                    "{:>3}. {:<20} {:>4}W {:>4}L  acc {:>5.2}  avg {:>6.0} ms",
                    entry.rank,
                    entry.username,
                    entry.wins,
                    entry.losses,
                    entry.accuracy,
                    entry.avg_response_time_ms,
                );
            }
            Ok(())
        }
    }
}
