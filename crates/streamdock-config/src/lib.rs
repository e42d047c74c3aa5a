//! Configuration for the streamdock connector.
//!
//! Values are read from TOML (`~/.streamdock/config.toml` or the file named
//! by `$STREAMDOCK_CONFIG`) and validated before use.

pub mod errors;
pub mod loading;
pub mod types;
pub mod validation;

pub use errors::ConfigError;
pub use loading::{CONFIG_ENV_VAR, default_config_path, load_config};
pub use types::{CollaboratorConfig, ConnectorConfig, NotificationConfig, SearchConfig};
pub use validation::validate_config;
