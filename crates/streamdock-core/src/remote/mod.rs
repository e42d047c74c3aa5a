mod errors;
mod traits;
mod types;

pub use errors::RemoteError;
pub use traits::RemoteStreamClient;
pub use types::{Account, RemoteStream, UserRef};
