//! YAML configuration loading for the prediction service.
//!
//! Loads [`ServiceConfig`] from a YAML file on disk, falling back to defaults
//! when no file is specified, then applies environment overrides.

use shelflife_core::ServiceConfig;
use std::path::{Path, PathBuf};

/// Environment variable naming a YAML config file.
pub const CONFIG_ENV: &str = "SHELFLIFE_CONFIG";

/// Environment variable overriding [`ServiceConfig::model_path`].
pub const MODEL_PATH_ENV: &str = "MODEL_PATH";

/// Environment variable overriding [`ServiceConfig::listen_addr`].
pub const LISTEN_ADDR_ENV: &str = "SHELFLIFE_LISTEN_ADDR";

/// Where the base configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// A YAML file.
    File(PathBuf),
    /// Built-in defaults.
    Defaults,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Defaults => f.write_str("defaults"),
        }
    }
}

/// Load a [`ServiceConfig`] from a YAML file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the YAML is invalid.
pub fn load_config(path: &Path) -> anyhow::Result<ServiceConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config file {}: {}", path.display(), e))?;
    let config: ServiceConfig = serde_yaml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config YAML: {}", e))?;
    Ok(config)
}

/// Apply `MODEL_PATH` and `SHELFLIFE_LISTEN_ADDR` when set and non-empty.
pub fn apply_env_overrides(config: &mut ServiceConfig, env: impl Fn(&str) -> Option<String>) {
    if let Some(path) = env(MODEL_PATH_ENV).filter(|v| !v.is_empty()) {
        config.model_path = path;
    }
    if let Some(addr) = env(LISTEN_ADDR_ENV).filter(|v| !v.is_empty()) {
        config.listen_addr = addr;
    }
}

/// Resolve the effective configuration.
///
/// Checks (in order):
/// 1. `cli_path` (first CLI argument) as config path
/// 2. `SHELFLIFE_CONFIG` environment variable
/// 3. Default configuration
///
/// Environment overrides are applied on top of whichever base was chosen.
pub fn resolve_config(
    cli_path: Option<String>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<(ServiceConfig, ConfigSource)> {
    let config_path = cli_path
        .or_else(|| env(CONFIG_ENV))
        .filter(|p| !p.is_empty())
        .map(PathBuf::from);

    let (mut config, source) = match config_path {
        Some(path) => (load_config(&path)?, ConfigSource::File(path)),
        None => (ServiceConfig::default(), ConfigSource::Defaults),
    };
    apply_env_overrides(&mut config, env);
    Ok((config, source))
}
