//! Structured logging setup.

use shelflife_core::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Build the level filter: `RUST_LOG` when set, else the configured level.
pub fn build_filter(config: &LoggingConfig) -> anyhow::Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| anyhow::anyhow!("Invalid log level '{}': {}", config.level, e))
}

/// Install the global `tracing` subscriber.
///
/// # Errors
///
/// Returns an error for an unknown `format` or when a subscriber is already
/// installed.
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(build_filter(config)?);
    let installed = match config.format.as_str() {
        "json" => builder.json().try_init(),
        "text" => builder.try_init(),
        other => anyhow::bail!("Unknown log format '{other}' (expected 'text' or 'json')"),
    };
    installed.map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {e}"))
}
