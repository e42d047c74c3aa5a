use serde::{Deserialize, Serialize};

use crate::collaborators::CollaboratorSet;
use crate::filters::{FilterKind, FilterSelection};
use crate::host::ObjectPlaceholder;

/// Position in the create/attach wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WizardStep {
    #[default]
    Name,
    Filter,
    CollaboratorsOrAttach,
    /// Entered only by a commit; left only when it finishes.
    Committing,
}

/// The stream being described, not yet committed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    /// Which filter strategy the user picked.
    pub filter_choice: Option<FilterKind>,
    /// Copy of the chosen filter taken during commit. Host events never
    /// update it.
    pub filter_snapshot: Option<FilterSelection>,
    pub collaborators: CollaboratorSet,
    pub placeholders: Vec<ObjectPlaceholder>,
}

/// Which commit is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Attach,
}
