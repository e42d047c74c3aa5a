use serde::{Deserialize, Serialize};

/// Lightweight reference to a host object that will be sent with a stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectPlaceholder {
    pub application_id: String,
    #[serde(default)]
    pub type_name: Option<String>,
}

/// Events pushed by the CAD host into the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// Host-side selection changed; carries the full new selection.
    SelectionChanged { ids: Vec<String> },
    ViewActivated,
    /// The document the dialog belongs to was closed.
    DocumentClosed,
    /// The host resolved the current filter into object placeholders.
    FilteredObjectsRetrieved { objects: Vec<ObjectPlaceholder> },
}
