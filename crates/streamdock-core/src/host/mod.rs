mod traits;
mod types;

pub use traits::{AccountProvider, HostSelectionProvider};
pub use types::{HostEvent, ObjectPlaceholder};
