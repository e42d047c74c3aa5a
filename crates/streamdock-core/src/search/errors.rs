use crate::errors::ConnectorError;
use crate::remote::RemoteError;

/// A search call failed. Logged by the controller, never shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Search for '{query}' failed: {source}")]
    Remote {
        query: String,
        #[source]
        source: RemoteError,
    },
}

impl ConnectorError for SearchError {
    fn error_code(&self) -> &'static str {
        match self {
            SearchError::Remote { .. } => "SEARCH_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_error_display() {
        let error = SearchError::Remote {
            query: "roof".to_string(),
            source: RemoteError::new("timeout"),
        };
        assert_eq!(
            error.to_string(),
            "Search for 'roof' failed: Remote call failed: timeout"
        );
        assert_eq!(error.error_code(), "SEARCH_FAILED");
        assert!(!error.is_user_error());
    }
}
