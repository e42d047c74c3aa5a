use crate::errors::ConfigError;
use crate::types::ConnectorConfig;

const MAX_SETTLE_DELAY_MS: u64 = 10_000;

/// Reject values the connector cannot work with.
pub fn validate_config(config: &ConnectorConfig) -> Result<(), ConfigError> {
    if config.search.min_query_len == 0 {
        return Err(ConfigError::InvalidConfiguration {
            message: "search.min_query_len must be at least 1".to_string(),
        });
    }

    if config.search.settle_delay_ms > MAX_SETTLE_DELAY_MS {
        return Err(ConfigError::InvalidConfiguration {
            message: format!(
                "search.settle_delay_ms must not exceed {} (got {})",
                MAX_SETTLE_DELAY_MS, config.search.settle_delay_ms
            ),
        });
    }

    if config.collaborators.default_role.trim().is_empty() {
        return Err(ConfigError::InvalidConfiguration {
            message: "collaborators.default_role cannot be empty".to_string(),
        });
    }

    if config.notifications.ttl_secs == 0 {
        return Err(ConfigError::InvalidConfiguration {
            message: "notifications.ttl_secs must be at least 1".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ConnectorConfig::default()).is_ok());
    }

    #[test]
    fn test_zero_min_query_len_rejected() {
        let mut config = ConnectorConfig::default();
        config.search.min_query_len = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("min_query_len"));
    }

    #[test]
    fn test_excessive_settle_delay_rejected() {
        let mut config = ConnectorConfig::default();
        config.search.settle_delay_ms = 60_000;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("settle_delay_ms"));
    }

    #[test]
    fn test_zero_settle_delay_allowed() {
        let mut config = ConnectorConfig::default();
        config.search.settle_delay_ms = 0;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_blank_role_rejected() {
        let mut config = ConnectorConfig::default();
        config.collaborators.default_role = "  ".to_string();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let mut config = ConnectorConfig::default();
        config.notifications.ttl_secs = 0;
        assert!(validate_config(&config).is_err());
    }
}
