//! Remote service error type.

use crate::errors::ConnectorError;

/// Any failure reported by the remote collaboration service.
///
/// Network, timeout, and auth failures are not distinguished; the client
/// flattens them into a message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Remote call failed: {message}")]
pub struct RemoteError {
    pub message: String,
}

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl ConnectorError for RemoteError {
    fn error_code(&self) -> &'static str {
        "REMOTE_CALL_FAILED"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_display() {
        let error = RemoteError::new("connection reset");
        assert_eq!(error.to_string(), "Remote call failed: connection reset");
        assert_eq!(error.error_code(), "REMOTE_CALL_FAILED");
        assert!(!error.is_user_error());
    }
}
