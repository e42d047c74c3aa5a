use crate::errors::ConnectorError;
use crate::registry::RegistryError;
use crate::remote::RemoteError;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("{message}")]
    Validation { message: String },

    #[error("Error: {source}")]
    CreationFailed {
        /// Id of the stream that was created and then deleted, if creation got that far.
        stream_id: Option<String>,
        #[source]
        source: RemoteError,
    },

    #[error("This stream already exists in this file")]
    DuplicateAttachment { stream_id: String },

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Registry(RegistryError),

    #[error("Another stream operation is already in progress")]
    CommitInProgress,

    #[error("Cannot change step while a commit is in progress")]
    CommitStepLocked,

    #[error("The stream dialog has been closed")]
    DialogClosed,

    #[error("No account available to publish from")]
    NoAccount,
}

impl SessionError {
    pub fn validation(message: impl Into<String>) -> Self {
        SessionError::Validation {
            message: message.into(),
        }
    }
}

impl From<RegistryError> for SessionError {
    fn from(error: RegistryError) -> Self {
        match error {
            RegistryError::DuplicateAttachment { stream_id } => {
                SessionError::DuplicateAttachment { stream_id }
            }
            other => SessionError::Registry(other),
        }
    }
}

impl ConnectorError for SessionError {
    fn error_code(&self) -> &'static str {
        match self {
            SessionError::Validation { .. } => "SESSION_VALIDATION_FAILED",
            SessionError::CreationFailed { .. } => "SESSION_CREATION_FAILED",
            SessionError::DuplicateAttachment { .. } => "SESSION_DUPLICATE_ATTACHMENT",
            SessionError::Remote(_) => "SESSION_REMOTE_FAILED",
            SessionError::Registry(e) => e.error_code(),
            SessionError::CommitInProgress => "SESSION_COMMIT_IN_PROGRESS",
            SessionError::CommitStepLocked => "SESSION_STEP_LOCKED",
            SessionError::DialogClosed => "SESSION_DIALOG_CLOSED",
            SessionError::NoAccount => "SESSION_NO_ACCOUNT",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            SessionError::Validation { .. }
                | SessionError::DuplicateAttachment { .. }
                | SessionError::CommitInProgress
                | SessionError::CommitStepLocked
                | SessionError::DialogClosed
                | SessionError::NoAccount
        )
    }
}
