mod commit;
mod controller;
mod errors;
mod events;
mod loading;
mod notifications;
mod types;
mod validation;

pub use commit::ACTIVE_VIEW_LIST_NAME;
pub use controller::SessionController;
pub use errors::SessionError;
pub use events::{CloseReason, ControllerEvent, EventBus};
pub use loading::LoadingState;
pub use notifications::{Notification, Notifications};
pub use types::{Draft, Operation, WizardStep};
pub use validation::{MIN_STREAM_NAME_LEN, validate_stream_name};
