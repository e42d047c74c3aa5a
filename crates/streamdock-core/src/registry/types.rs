use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::filters::FilterSelection;
use crate::host::ObjectPlaceholder;
use crate::remote::{Account, RemoteStream};

/// Local binding between the document, an account, and a remote stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub stream: RemoteStream,
    /// Account every call for this stream runs as.
    pub account: Account,
    /// Filter feeding the stream. `None` for attached existing streams.
    #[serde(default)]
    pub filter: Option<FilterSelection>,
    #[serde(default)]
    pub server_updates_enabled: bool,
    #[serde(default)]
    pub placeholders: Vec<ObjectPlaceholder>,
    pub attached_at: DateTime<Utc>,
}

impl Session {
    pub fn new(stream: RemoteStream, account: Account) -> Self {
        Self {
            stream,
            account,
            filter: None,
            server_updates_enabled: false,
            placeholders: Vec::new(),
            attached_at: Utc::now(),
        }
    }

    pub fn stream_id(&self) -> &str {
        &self.stream.id
    }
}
