mod catalog;
mod types;

pub use catalog::FilterCatalog;
pub use types::{FilterKind, FilterSelection};
