use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level connector configuration, read from `config.toml`.
///
/// Every section and field is optional in the file; missing values fall back
/// to the defaults below.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorConfig {
    pub search: SearchConfig,
    pub collaborators: CollaboratorConfig,
    pub notifications: NotificationConfig,
}

/// Search-as-you-type tuning for user and stream lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Queries shorter than this yield no results and make no remote call.
    pub min_query_len: usize,
    /// Quiet interval after results are written before a newer query may write.
    pub settle_delay_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_len: 3,
            settle_delay_ms: 300,
        }
    }
}

impl SearchConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollaboratorConfig {
    /// Role granted to every invited collaborator on a new stream.
    pub default_role: String,
}

impl Default for CollaboratorConfig {
    fn default() -> Self {
        Self {
            default_role: "stream:contributor".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub ttl_secs: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { ttl_secs: 5 }
    }
}

impl NotificationConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}
