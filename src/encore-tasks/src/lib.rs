//! Background scrobble execution.
//!
//! The pieces here keep slow network calls off the interactive thread: a
//! [`ScrobblePlan`] flattens user requests into dated attempts, a
//! [`TaskRunner`] executes a plan on its own tokio task and reports every
//! attempt over an ordered event channel, and a [`ScrobbleController`]
//! enforces the one-task-per-slot rule and the event-ordering contract on
//! behalf of the UI.

pub mod controller;
pub mod events;
pub mod lookup;
pub mod plan;
pub mod runner;

pub use controller::{ControllerError, ScrobbleController, Slot, SubmitError};
pub use events::{AttemptOutcome, CompletionEvent, EventReceiver, ProgressEvent, TaskEvent};
pub use lookup::{spawn_album_lookup, spawn_track_search};
pub use plan::{PlanError, PlannedPlay, ScrobblePlan};
pub use runner::{TaskHandle, TaskRunner};
