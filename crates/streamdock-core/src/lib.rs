//! Stream creation and attachment for CAD connectors.
//!
//! A [`SessionController`] walks the user through naming a stream, choosing
//! which host objects feed it, and inviting collaborators, then commits by
//! either creating a new remote stream or attaching an existing one. The
//! remote service, the CAD host, and the account store are injected through
//! the traits in [`remote`] and [`host`].

pub mod collaborators;
pub mod errors;
pub mod filters;
pub mod host;
pub mod logging;
pub mod registry;
pub mod remote;
pub mod search;
pub mod wizard;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use collaborators::CollaboratorSet;
pub use errors::ConnectorError;
pub use filters::{FilterCatalog, FilterKind, FilterSelection};
pub use host::{AccountProvider, HostEvent, HostSelectionProvider, ObjectPlaceholder};
pub use logging::init_logging;
pub use registry::{AttachedStreamRegistry, RegistryError, Session};
pub use remote::{Account, RemoteError, RemoteStream, RemoteStreamClient, UserRef};
pub use search::{DebouncedSearch, SearchError, SearchOutcome};
pub use wizard::{
    CloseReason, ControllerEvent, Draft, Operation, SessionController, SessionError, WizardStep,
};
