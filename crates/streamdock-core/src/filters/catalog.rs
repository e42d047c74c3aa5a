use tracing::debug;

use super::types::{FilterKind, FilterSelection};
use crate::host::HostSelectionProvider;

/// Filters offered to the user, with their live candidate lists.
///
/// Built once from the host when the wizard opens. Only the filter that
/// an update targets is touched; other filters' candidates are independent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCatalog {
    filters: Vec<FilterSelection>,
}

impl FilterCatalog {
    pub fn new(filters: Vec<FilterSelection>) -> Self {
        Self { filters }
    }

    /// Enumerate the host's filter strategies and their current candidates.
    pub fn from_host<H: HostSelectionProvider + ?Sized>(host: &H) -> Self {
        let filters: Vec<FilterSelection> = host
            .available_filters()
            .into_iter()
            .map(|kind| {
                let candidates = match kind {
                    FilterKind::Selection => host.current_selection_ids(),
                    FilterKind::View => host.objects_in_active_view(),
                    FilterKind::Category => host.category_names(),
                    FilterKind::List => Vec::new(),
                };
                FilterSelection::new(kind, kind.as_str(), candidates)
            })
            .collect();

        debug!(
            event = "core.filters.catalog_built",
            filter_count = filters.len()
        );

        Self { filters }
    }

    pub fn filters(&self) -> &[FilterSelection] {
        &self.filters
    }

    pub fn contains(&self, kind: FilterKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn get(&self, kind: FilterKind) -> Option<&FilterSelection> {
        self.filters.iter().find(|f| f.kind() == kind)
    }

    fn get_mut(&mut self, kind: FilterKind) -> Option<&mut FilterSelection> {
        self.filters.iter_mut().find(|f| f.kind() == kind)
    }

    /// Number of candidates in a filter, zero if the filter is not offered.
    pub fn candidate_count(&self, kind: FilterKind) -> usize {
        self.get(kind)
            .map(|f| f.candidate_object_ids().len())
            .unwrap_or(0)
    }

    /// Replace a filter's candidates. Returns `false` if the filter is not offered.
    pub fn set_candidates(&mut self, kind: FilterKind, ids: Vec<String>) -> bool {
        match self.get_mut(kind) {
            Some(filter) => {
                filter.set_candidates(ids);
                true
            }
            None => false,
        }
    }

    /// Insert or replace the generic list filter.
    pub fn upsert_list(&mut self, name: &str, ids: Vec<String>) {
        let list = FilterSelection::new(FilterKind::List, name, ids);
        match self.get_mut(FilterKind::List) {
            Some(existing) => *existing = list,
            None => self.filters.push(list),
        }
    }

    pub fn remove_list_item(&mut self, kind: FilterKind, item: &str) -> bool {
        self.get_mut(kind)
            .is_some_and(|filter| filter.remove_list_item(item))
    }
}
