use encore_core::TrackRef;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// Result of a single submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    Failure { reason: String },
}

impl AttemptOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AttemptOutcome::Success)
    }
}

/// Emitted once per attempt, in strictly increasing attempt order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    /// 1-based attempt index within the plan.
    pub attempt: u32,
    /// Total attempts in the plan.
    pub total: u32,
    pub track: TrackRef,
    pub outcome: AttemptOutcome,
}

/// Emitted exactly once, after the final [`ProgressEvent`] of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompletionEvent {
    pub attempted: u32,
    pub succeeded: u32,
    pub failed: u32,
    /// Set when the plan stopped early on a cancellation request.
    pub cancelled: bool,
}

/// Messages carried from a runner task to its controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskEvent {
    Progress(ProgressEvent),
    Completed(CompletionEvent),
}

pub type EventSender = UnboundedSender<TaskEvent>;
pub type EventReceiver = UnboundedReceiver<TaskEvent>;
