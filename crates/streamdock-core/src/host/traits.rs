//! Host application and account capabilities.

use crate::filters::FilterKind;
use crate::remote::Account;

/// Read access to the CAD host's selection and view state.
///
/// Selection changes are also pushed as `HostEvent::SelectionChanged`;
/// `current_selection_ids` is only consulted when the controller needs a
/// fresh snapshot.
pub trait HostSelectionProvider: Send + Sync {
    fn current_selection_ids(&self) -> Vec<String>;

    fn active_view_name(&self) -> String;

    fn objects_in_active_view(&self) -> Vec<String>;

    /// Host-defined object categories offered by the Category filter.
    fn category_names(&self) -> Vec<String> {
        Vec::new()
    }

    /// Filter strategies this host supports, in display order.
    fn available_filters(&self) -> Vec<FilterKind> {
        vec![FilterKind::Selection, FilterKind::View, FilterKind::Category]
    }
}

/// Source of the accounts a user can publish from.
pub trait AccountProvider: Send + Sync {
    fn default_account(&self) -> Option<Account>;

    fn list_accounts(&self) -> Vec<Account>;
}
