mod debounce;
mod errors;

pub use debounce::{DebouncedSearch, SearchOutcome};
pub use errors::SearchError;
