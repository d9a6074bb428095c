//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Authority endpoints.
    pub server: ServerConfig,
    /// Gameplay defaults.
    pub game: GameConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Authority endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL for the HTTP API (rooms, leaderboard).
    pub api_url: String,
    /// Base URL for the realtime WebSocket endpoint.
    pub ws_url: String,
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
}

/// Gameplay defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    /// Difficulty used when creating a room without an explicit choice.
    pub default_difficulty: String,
    /// How many leaderboard rows to fetch.
    pub leaderboard_limit: u32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log filter override (e.g. "debug", "info,mathtug_client=trace").
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8000".to_string(),
            ws_url: "ws://127.0.0.1:8000".to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            default_difficulty: "easy".to_string(),
            leaderboard_limit: 20,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: String::new(),
        }
    }
}

// --- Load / Save ---

impl Config {
    /// The platform config directory for this application, if resolvable.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("mathtug"))
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::Read)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::Parse)?;
            tracing::info!("loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            tracing::info!("created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::Write)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new().depth_limit(3);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::Write)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_localhost() {
        let config = Config::default();
        assert_eq!(config.server.api_url, "http://127.0.0.1:8000");
        assert_eq!(config.server.ws_url, "ws://127.0.0.1:8000");
        assert_eq!(config.game.default_difficulty, "easy");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.server.api_url = "http://game.example:9000".to_string();
        config.game.leaderboard_limit = 5;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_partial_file_fills_missing_fields_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.ron"),
            r#"(server: (api_url: "http://lan-host:8000"))"#,
        )
        .unwrap();

        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config.server.api_url, "http://lan-host:8000");
        // Everything omitted keeps its default.
        assert_eq!(config.server.request_timeout_secs, 10);
        assert_eq!(config.game.leaderboard_limit, 20);
    }

    #[test]
    fn test_invalid_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "not ron at all (").unwrap();

        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
