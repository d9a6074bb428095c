//! Structured logging for the MathTug client.
//!
//! Console output via the `tracing` ecosystem, filterable through `RUST_LOG`
//! or the config file's `debug.log_level`, with an optional JSON file layer
//! for post-mortem analysis of a session.

use std::path::Path;

use mathtug_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter: quiet the transport internals, keep our crates at info.
const DEFAULT_FILTER: &str = "info,tungstenite=warn,tokio_tungstenite=warn,hyper=warn,reqwest=warn";

/// Initialize the tracing subscriber.
///
/// Filter precedence: `RUST_LOG` env var, then `config.debug.log_level`
/// (when non-empty), then [`DEFAULT_FILTER`]'s baseline. When `log_dir` is
/// given and writable, a JSON file layer records the session to
/// `mathtug.log` alongside the console output.
pub fn init(config: Option<&Config>, log_dir: Option<&Path>) {
    let filter_str = config
        .map(|c| c.debug.log_level.as_str())
        .filter(|level| !level.is_empty())
        .unwrap_or(DEFAULT_FILTER);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join("mathtug.log"))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}

/// An `EnvFilter` carrying the default filter string.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}
