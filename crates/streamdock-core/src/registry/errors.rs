use crate::errors::ConnectorError;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Stream '{stream_id}' is already attached to this document")]
    DuplicateAttachment { stream_id: String },

    #[error("Attached stream list could not be serialized: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

impl ConnectorError for RegistryError {
    fn error_code(&self) -> &'static str {
        match self {
            RegistryError::DuplicateAttachment { .. } => "REGISTRY_DUPLICATE_ATTACHMENT",
            RegistryError::Serialization { .. } => "REGISTRY_SERIALIZATION_FAILED",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, RegistryError::DuplicateAttachment { .. })
    }
}
