use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::errors::ConfigError;
use crate::types::ConnectorConfig;
use crate::validation::validate_config;

/// Environment variable pointing at an explicit config file.
pub const CONFIG_ENV_VAR: &str = "STREAMDOCK_CONFIG";

/// Read, parse, and validate a single config file.
pub fn load_config(path: &Path) -> Result<ConnectorConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::ConfigNotFound {
            path: path.display().to_string(),
        });
    }

    let content = std::fs::read_to_string(path)?;
    let config: ConnectorConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
            message: e.to_string(),
        })?;

    validate_config(&config)?;

    info!(
        event = "config.load_completed",
        path = %path.display(),
        min_query_len = config.search.min_query_len,
        settle_delay_ms = config.search.settle_delay_ms,
    );

    Ok(config)
}

/// Default location: `~/.streamdock/config.toml`.
///
/// Falls back to `./.streamdock/config.toml` if the home directory cannot be determined.
pub fn default_config_path() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(".streamdock").join("config.toml"),
        None => PathBuf::from(".streamdock").join("config.toml"),
    }
}

impl ConnectorConfig {
    /// Resolve and load the active configuration.
    ///
    /// Priority: `$STREAMDOCK_CONFIG` > `~/.streamdock/config.toml` > defaults.
    /// An explicitly named file that does not exist is an error; a missing
    /// default file is not.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(explicit) = std::env::var(CONFIG_ENV_VAR)
            && !explicit.trim().is_empty()
        {
            debug!(event = "config.load_started", source = "env", path = %explicit);
            return load_config(Path::new(&explicit));
        }

        let path = default_config_path();
        if !path.exists() {
            debug!(
                event = "config.load_skipped",
                reason = "no config file",
                path = %path.display()
            );
            return Ok(Self::default());
        }

        debug!(event = "config.load_started", source = "home", path = %path.display());
        load_config(&path)
    }
}
