use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::errors::RegistryError;
use super::types::Session;

const REGISTRY_FORMAT_VERSION: u32 = 1;

/// On-document representation of the attached streams.
#[derive(Serialize, Deserialize)]
struct RegistryFile {
    version: u32,
    sessions: Vec<Session>,
}

/// Streams bound to the current document, keyed by stream id.
///
/// Cloning yields another handle to the same list, so the controller and a
/// sync engine can share it. Iteration follows attachment order.
#[derive(Debug, Clone, Default)]
pub struct AttachedStreamRegistry {
    sessions: Arc<Mutex<Vec<Session>>>,
}

impl AttachedStreamRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Session>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn contains(&self, stream_id: &str) -> bool {
        self.lock().iter().any(|s| s.stream_id() == stream_id)
    }

    /// Add a session. Fails if its stream is already attached.
    pub fn register(&self, session: Session) -> Result<(), RegistryError> {
        let mut sessions = self.lock();
        if sessions.iter().any(|s| s.stream_id() == session.stream_id()) {
            return Err(RegistryError::DuplicateAttachment {
                stream_id: session.stream_id().to_string(),
            });
        }

        info!(
            event = "core.registry.session_registered",
            stream_id = session.stream_id(),
            stream_name = %session.stream.name,
            server_updates = session.server_updates_enabled
        );
        sessions.push(session);
        Ok(())
    }

    /// Detach a stream from the document.
    pub fn remove(&self, stream_id: &str) -> Option<Session> {
        let mut sessions = self.lock();
        let index = sessions.iter().position(|s| s.stream_id() == stream_id)?;
        let removed = sessions.remove(index);
        info!(event = "core.registry.session_removed", stream_id = stream_id);
        Some(removed)
    }

    pub fn get(&self, stream_id: &str) -> Option<Session> {
        self.lock()
            .iter()
            .find(|s| s.stream_id() == stream_id)
            .cloned()
    }

    pub fn sessions(&self) -> Vec<Session> {
        self.lock().clone()
    }

    pub fn stream_ids(&self) -> Vec<String> {
        self.lock()
            .iter()
            .map(|s| s.stream_id().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Serialize for storage inside the host document.
    pub fn to_json(&self) -> Result<String, RegistryError> {
        let file = RegistryFile {
            version: REGISTRY_FORMAT_VERSION,
            sessions: self.sessions(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Restore from a document payload.
    ///
    /// Duplicate stream ids in the payload keep the first entry.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile = serde_json::from_str(json)?;
        if file.version != REGISTRY_FORMAT_VERSION {
            warn!(
                event = "core.registry.version_mismatch",
                found = file.version,
                expected = REGISTRY_FORMAT_VERSION
            );
        }

        let registry = Self::new();
        for session in file.sessions {
            if let Err(e) = registry.register(session) {
                warn!(event = "core.registry.load_entry_skipped", error = %e);
            }
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::{Account, RemoteStream};

    fn account() -> Account {
        Account {
            id: "acc-1".to_string(),
            server_url: "https://collab.example.com".to_string(),
            user_name: "ada".to_string(),
            is_default: true,
        }
    }

    fn session(id: &str, name: &str) -> Session {
        Session::new(RemoteStream::new(id, name), account())
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = AttachedStreamRegistry::new();
        registry.register(session("s1", "Roof Plan")).unwrap();

        assert!(registry.contains("s1"));
        assert!(!registry.contains("s2"));
        assert_eq!(registry.get("s1").unwrap().stream.name, "Roof Plan");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_register_rejected() {
        let registry = AttachedStreamRegistry::new();
        registry.register(session("s1", "Roof Plan")).unwrap();

        let result = registry.register(session("s1", "Other"));
        assert!(matches!(
            result,
            Err(RegistryError::DuplicateAttachment { ref stream_id }) if stream_id == "s1"
        ));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("s1").unwrap().stream.name, "Roof Plan");
    }

    #[test]
    fn test_remove_allows_reattach() {
        let registry = AttachedStreamRegistry::new();
        registry.register(session("s1", "Roof Plan")).unwrap();

        let removed = registry.remove("s1").unwrap();
        assert_eq!(removed.stream_id(), "s1");
        assert!(registry.is_empty());
        assert!(registry.remove("s1").is_none());
        assert!(registry.register(session("s1", "Roof Plan")).is_ok());
    }

    #[test]
    fn test_clones_share_state() {
        let registry = AttachedStreamRegistry::new();
        let handle = registry.clone();
        registry.register(session("s1", "A")).unwrap();
        assert!(handle.contains("s1"));
    }

    #[test]
    fn test_stream_ids_in_attachment_order() {
        let registry = AttachedStreamRegistry::new();
        registry.register(session("s2", "B")).unwrap();
        registry.register(session("s1", "A")).unwrap();
        assert_eq!(registry.stream_ids(), vec!["s2", "s1"]);
    }

    #[test]
    fn test_json_restores_sessions() {
        let registry = AttachedStreamRegistry::new();
        let mut attached = session("s1", "Roof Plan");
        attached.server_updates_enabled = true;
        registry.register(attached.clone()).unwrap();
        registry.register(session("s2", "Site")).unwrap();

        let json = registry.to_json().unwrap();
        let restored = AttachedStreamRegistry::from_json(&json).unwrap();

        assert_eq!(restored.sessions(), registry.sessions());
        assert!(restored.get("s1").unwrap().server_updates_enabled);
    }

    #[test]
    fn test_json_with_duplicates_keeps_first() {
        let file = RegistryFile {
            version: REGISTRY_FORMAT_VERSION,
            sessions: vec![session("s1", "First"), session("s1", "Second")],
        };
        let json = serde_json::to_string(&file).unwrap();

        let restored = AttachedStreamRegistry::from_json(&json).unwrap();
        assert_eq!(restored.len(), 1);
        assert_eq!(restored.get("s1").unwrap().stream.name, "First");
    }

    #[test]
    fn test_invalid_json_is_error() {
        let result = AttachedStreamRegistry::from_json("{not json");
        assert!(matches!(result, Err(RegistryError::Serialization { .. })));
    }
}
