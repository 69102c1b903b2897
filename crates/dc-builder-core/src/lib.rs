//! Product builder controller.
//!
//! Platform-independent core of the builder modal: selection state, debounced
//! pricing, snapshot-guarded cart submission and the modal lifecycle. The DOM,
//! timers and network are supplied by the host through the traits in
//! [`ports`] and [`schedule`].

pub mod config;
pub mod control;
pub mod controller;
pub mod error;
pub mod ports;
pub mod pricing;
pub mod schedule;
pub mod selection;
pub mod session;

pub use config::{BuilderConfig, Labels};
pub use control::SubmitState;
pub use controller::{BuilderController, Collaborators, Navigated};
pub use error::{ApiError, CalculationError, ConfigError, SubmitError};
pub use ports::{BuilderView, CredentialProvider, Navigator, Notifier, StorefrontApi};
pub use pricing::{CartLine, PriceSnapshot};
pub use schedule::{Debouncer, ScheduledTask, Scheduler, TaskState};
pub use selection::{AppliedDefaults, OptionGroup, Selection};
pub use session::BuilderSession;

#[cfg(not(target_arch = "wasm32"))]
pub use schedule::TokioScheduler;
