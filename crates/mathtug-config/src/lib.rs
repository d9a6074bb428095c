//! Configuration for the MathTug client.
//!
//! Settings persist to disk as RON and can be overridden from the command
//! line. Unknown or missing fields fall back to defaults, so config files
//! survive version changes in both directions.

mod cli;
mod config;
mod error;

pub use cli::{CliArgs, Command};
pub use config::{Config, DebugConfig, GameConfig, ServerConfig};
pub use error::ConfigError;
