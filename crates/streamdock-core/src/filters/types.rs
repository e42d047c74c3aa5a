use serde::{Deserialize, Serialize};

/// Selection strategies the connector knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// Objects the host currently has selected.
    Selection,
    /// Objects visible in the active view.
    View,
    /// Objects grouped by a host-defined category.
    Category,
    /// Arbitrary list of object ids, used by shortcuts.
    List,
}

impl FilterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::Selection => "Selection",
            FilterKind::View => "View",
            FilterKind::Category => "Category",
            FilterKind::List => "List",
        }
    }
}

impl std::fmt::Display for FilterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FilterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "selection" => Ok(FilterKind::Selection),
            "view" => Ok(FilterKind::View),
            "category" => Ok(FilterKind::Category),
            "list" => Ok(FilterKind::List),
            _ => Err(format!(
                "Unknown filter '{}'. Known filters: selection, view, category, list",
                s
            )),
        }
    }
}

/// A concrete filter: which strategy, its display name, and its candidates.
///
/// Candidates stay mutable while the wizard is open. Commit clones the
/// chosen filter, so later host events never touch the committed copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FilterSelection {
    Selection {
        name: String,
        object_ids: Vec<String>,
    },
    View {
        name: String,
        object_ids: Vec<String>,
    },
    Category {
        name: String,
        object_ids: Vec<String>,
    },
    List {
        name: String,
        object_ids: Vec<String>,
    },
}

impl FilterSelection {
    pub fn new(kind: FilterKind, name: impl Into<String>, object_ids: Vec<String>) -> Self {
        let name = name.into();
        match kind {
            FilterKind::Selection => FilterSelection::Selection { name, object_ids },
            FilterKind::View => FilterSelection::View { name, object_ids },
            FilterKind::Category => FilterSelection::Category { name, object_ids },
            FilterKind::List => FilterSelection::List { name, object_ids },
        }
    }

    pub fn kind(&self) -> FilterKind {
        match self {
            FilterSelection::Selection { .. } => FilterKind::Selection,
            FilterSelection::View { .. } => FilterKind::View,
            FilterSelection::Category { .. } => FilterKind::Category,
            FilterSelection::List { .. } => FilterKind::List,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FilterSelection::Selection { name, .. }
            | FilterSelection::View { name, .. }
            | FilterSelection::Category { name, .. }
            | FilterSelection::List { name, .. } => name,
        }
    }

    pub fn candidate_object_ids(&self) -> &[String] {
        match self {
            FilterSelection::Selection { object_ids, .. }
            | FilterSelection::View { object_ids, .. }
            | FilterSelection::Category { object_ids, .. }
            | FilterSelection::List { object_ids, .. } => object_ids,
        }
    }

    pub fn set_candidates(&mut self, ids: Vec<String>) {
        match self {
            FilterSelection::Selection { object_ids, .. }
            | FilterSelection::View { object_ids, .. }
            | FilterSelection::Category { object_ids, .. }
            | FilterSelection::List { object_ids, .. } => *object_ids = ids,
        }
    }

    /// Remove one candidate entry. Returns `true` if something was removed.
    ///
    /// Selection candidates mirror the host and cannot be edited here.
    pub fn remove_list_item(&mut self, item: &str) -> bool {
        let object_ids = match self {
            FilterSelection::Selection { .. } => return false,
            FilterSelection::View { object_ids, .. }
            | FilterSelection::Category { object_ids, .. }
            | FilterSelection::List { object_ids, .. } => object_ids,
        };

        match object_ids.iter().position(|id| id == item) {
            Some(index) => {
                object_ids.remove(index);
                true
            }
            None => false,
        }
    }
}
