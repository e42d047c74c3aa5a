mod errors;
mod store;
mod types;

pub use errors::RegistryError;
pub use store::AttachedStreamRegistry;
pub use types::Session;
