use crate::events::{EventReceiver, TaskEvent};
use crate::plan::{PlanError, ScrobblePlan};
use crate::runner::{TaskHandle, TaskRunner};
use encore_core::ScrobbleRequest;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::mpsc::error::TryRecvError;

/// Independent channels of work. Each slot runs at most one task at a time;
/// distinct slots run concurrently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Manual,
    Search,
    Album,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::Manual, Slot::Search, Slot::Album];

    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Manual => "manual",
            Slot::Search => "search",
            Slot::Album => "album",
        }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("slot {slot} already has a task in flight")]
    Busy { slot: Slot },
    #[error(transparent)]
    Invalid(#[from] PlanError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControllerError {
    /// The runner broke the ordering contract. Indicates a defect, never
    /// recoverable for the affected slot.
    #[error("protocol violation on slot {slot}: expected attempt {expected}, got {got}")]
    ProtocolViolation { slot: Slot, expected: u32, got: u32 },
}

/// Enforces strictly increasing, gap-free attempt indices for one task.
#[derive(Debug, Default)]
struct SequenceTracker {
    last_seen: u32,
}

impl SequenceTracker {
    fn observe(&mut self, attempt: u32) -> Result<(), (u32, u32)> {
        let expected = self.last_seen + 1;
        if attempt != expected {
            return Err((expected, attempt));
        }
        self.last_seen = attempt;
        Ok(())
    }
}

struct ActiveTask {
    handle: TaskHandle,
    events: EventReceiver,
    sequence: SequenceTracker,
}

/// Bridges user-initiated requests to the [`TaskRunner`] and hands validated
/// event streams back to the rendering layer.
///
/// All methods are non-blocking; `poll` only drains what has already arrived.
pub struct ScrobbleController {
    runner: TaskRunner,
    active: HashMap<Slot, ActiveTask>,
}

impl ScrobbleController {
    pub fn new(runner: TaskRunner) -> Self {
        Self {
            runner,
            active: HashMap::new(),
        }
    }

    /// Start a batch on a slot. Fails synchronously when the slot is busy or
    /// the batch is invalid; no events are produced in either case.
    pub fn submit(&mut self, slot: Slot, requests: &[ScrobbleRequest]) -> Result<(), SubmitError> {
        if self.active.contains_key(&slot) {
            return Err(SubmitError::Busy { slot });
        }
        let plan = ScrobblePlan::build(requests)?;
        tracing::info!(slot = %slot, attempts = plan.total(), "starting scrobble batch");

        let (handle, events) = self.runner.spawn(plan);
        self.active.insert(
            slot,
            ActiveTask {
                handle,
                events,
                sequence: SequenceTracker::default(),
            },
        );
        Ok(())
    }

    pub fn is_busy(&self, slot: Slot) -> bool {
        self.active.contains_key(&slot)
    }

    /// Request cancellation of the slot's task, if any. The slot stays busy
    /// until its completion event is observed through `poll`.
    pub fn cancel(&mut self, slot: Slot) {
        if let Some(task) = self.active.get(&slot) {
            tracing::info!(slot = %slot, "cancellation requested");
            task.handle.cancel();
        }
    }

    /// Drain events that have arrived for a slot, in emission order. The slot
    /// becomes idle once its `Completed` event has been returned.
    pub fn poll(&mut self, slot: Slot) -> Result<Vec<TaskEvent>, ControllerError> {
        let Some(task) = self.active.get_mut(&slot) else {
            return Ok(Vec::new());
        };

        let mut drained = Vec::new();
        loop {
            match task.events.try_recv() {
                Ok(TaskEvent::Progress(event)) => {
                    if let Err((expected, got)) = task.sequence.observe(event.attempt) {
                        tracing::error!(
                            slot = %slot,
                            expected,
                            got,
                            "runner emitted out-of-order progress; dropping task"
                        );
                        if let Some(task) = self.active.remove(&slot) {
                            task.handle.cancel();
                        }
                        return Err(ControllerError::ProtocolViolation {
                            slot,
                            expected,
                            got,
                        });
                    }
                    drained.push(TaskEvent::Progress(event));
                }
                Ok(TaskEvent::Completed(summary)) => {
                    drained.push(TaskEvent::Completed(summary));
                    self.active.remove(&slot);
                    break;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    // Task ended without a completion event; treat the slot
                    // as idle rather than wedging it forever.
                    tracing::warn!(slot = %slot, "runner task ended without completion");
                    self.active.remove(&slot);
                    break;
                }
            }
        }

        Ok(drained)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{AttemptOutcome, TaskEvent};
    use encore_core::{
        PlaySubmission, ScrobbleService, ServiceResult, TrackCandidate, TrackRef,
    };
    use std::sync::Arc;
    use std::time::Duration;

    struct OkService;

    #[async_trait::async_trait]
    impl ScrobbleService for OkService {
        fn id(&self) -> &str {
            "ok"
        }

        async fn submit_play(&self, _play: &PlaySubmission) -> ServiceResult<()> {
            Ok(())
        }

        async fn search_tracks(
            &self,
            _artist: &str,
            _title: &str,
        ) -> ServiceResult<Vec<TrackCandidate>> {
            Ok(Vec::new())
        }

        async fn album_tracks(&self, _artist: &str, _album: &str) -> ServiceResult<Vec<String>> {
            Ok(Vec::new())
        }
    }

    fn controller() -> ScrobbleController {
        let runner = TaskRunner::with_pacing(
            Arc::new(OkService),
            Duration::from_millis(1),
            Duration::from_millis(1),
        );
        ScrobbleController::new(runner)
    }

    fn requests(count: u32) -> Vec<ScrobbleRequest> {
        vec![ScrobbleRequest::new(TrackRef::new("Artist", "Song"), count)]
    }

    /// Poll a slot until its completion event arrives, returning everything
    /// drained along the way.
    async fn poll_to_completion(
        controller: &mut ScrobbleController,
        slot: Slot,
    ) -> Vec<TaskEvent> {
        let mut all = Vec::new();
        loop {
            let events = controller.poll(slot).expect("no protocol violation");
            let done = events
                .iter()
                .any(|e| matches!(e, TaskEvent::Completed(_)));
            all.extend(events);
            if done {
                return all;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }

    #[tokio::test]
    async fn busy_slot_rejects_second_submit() {
        let mut controller = controller();
        controller.submit(Slot::Manual, &requests(3)).unwrap();

        let err = controller.submit(Slot::Manual, &requests(1)).unwrap_err();
        assert!(matches!(
            err,
            SubmitError::Busy {
                slot: Slot::Manual
            }
        ));

        poll_to_completion(&mut controller, Slot::Manual).await;
        assert!(!controller.is_busy(Slot::Manual));
        // Idle again: a new submit succeeds.
        controller.submit(Slot::Manual, &requests(1)).unwrap();
    }

    #[tokio::test]
    async fn distinct_slots_run_concurrently_with_independent_sequences() {
        let mut controller = controller();
        controller.submit(Slot::Manual, &requests(3)).unwrap();
        controller.submit(Slot::Album, &requests(2)).unwrap();
        assert!(controller.is_busy(Slot::Manual));
        assert!(controller.is_busy(Slot::Album));

        let manual = poll_to_completion(&mut controller, Slot::Manual).await;
        let album = poll_to_completion(&mut controller, Slot::Album).await;

        let attempts = |events: &[TaskEvent]| -> Vec<u32> {
            events
                .iter()
                .filter_map(|e| match e {
                    TaskEvent::Progress(p) => Some(p.attempt),
                    _ => None,
                })
                .collect()
        };
        assert_eq!(attempts(&manual), vec![1, 2, 3]);
        assert_eq!(attempts(&album), vec![1, 2]);
    }

    #[tokio::test]
    async fn invalid_count_fails_synchronously_and_leaves_slot_idle() {
        let mut controller = controller();
        let err = controller.submit(Slot::Manual, &requests(0)).unwrap_err();
        assert!(matches!(
            err,
            SubmitError::Invalid(PlanError::InvalidRequest { .. })
        ));
        assert!(!controller.is_busy(Slot::Manual));
        assert!(controller.poll(Slot::Manual).unwrap().is_empty());
    }

    #[tokio::test]
    async fn cancelled_slot_reports_partial_completion() {
        let runner = TaskRunner::with_pacing(
            Arc::new(OkService),
            Duration::from_millis(20),
            Duration::from_millis(1),
        );
        let mut controller = ScrobbleController::new(runner);
        controller.submit(Slot::Album, &requests(10)).unwrap();

        // Let at least one attempt land, then cancel.
        tokio::time::sleep(Duration::from_millis(5)).await;
        controller.cancel(Slot::Album);

        let events = poll_to_completion(&mut controller, Slot::Album).await;
        let summary = events
            .iter()
            .find_map(|e| match e {
                TaskEvent::Completed(c) => Some(*c),
                _ => None,
            })
            .unwrap();
        assert!(summary.cancelled);
        assert!(summary.attempted < 10);
        assert!(!controller.is_busy(Slot::Album));
    }

    #[tokio::test]
    async fn progress_outcomes_reach_the_caller() {
        let mut controller = controller();
        controller.submit(Slot::Search, &requests(1)).unwrap();
        let events = poll_to_completion(&mut controller, Slot::Search).await;
        match &events[0] {
            TaskEvent::Progress(p) => assert_eq!(p.outcome, AttemptOutcome::Success),
            other => panic!("expected progress first, got {other:?}"),
        }
    }

    #[test]
    fn sequence_tracker_rejects_duplicates_gaps_and_regressions() {
        let mut tracker = SequenceTracker::default();
        assert!(tracker.observe(1).is_ok());
        assert!(tracker.observe(2).is_ok());
        assert_eq!(tracker.observe(2), Err((3, 2)));

        let mut tracker = SequenceTracker::default();
        tracker.observe(1).unwrap();
        assert_eq!(tracker.observe(3), Err((2, 3)));

        let mut tracker = SequenceTracker::default();
        tracker.observe(1).unwrap();
        tracker.observe(2).unwrap();
        assert_eq!(tracker.observe(1), Err((3, 1)));
    }
}
