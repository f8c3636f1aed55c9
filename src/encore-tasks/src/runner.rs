use crate::events::{
    AttemptOutcome, CompletionEvent, EventReceiver, EventSender, ProgressEvent, TaskEvent,
};
use crate::plan::ScrobblePlan;
use encore_core::{PlaySubmission, ScrobbleConfig, ScrobbleService};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Handle to one in-flight plan. Dropping it does not stop the task;
/// cancellation is always an explicit request.
#[derive(Debug)]
pub struct TaskHandle {
    cancel: Arc<AtomicBool>,
    join: JoinHandle<()>,
}

impl TaskHandle {
    /// Request cooperative cancellation. The runner honors it between
    /// attempts; an attempt already in flight runs to completion.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

/// Executes scrobble plans on background tokio tasks.
///
/// One task per plan; the runner itself holds no per-plan state and can be
/// shared. The service handle is injected at construction.
#[derive(Clone)]
pub struct TaskRunner {
    service: Arc<dyn ScrobbleService>,
    delay: Duration,
    failure_delay: Duration,
}

impl TaskRunner {
    pub fn new(service: Arc<dyn ScrobbleService>, config: &ScrobbleConfig) -> Self {
        Self {
            service,
            delay: config.delay(),
            failure_delay: config.failure_delay(),
        }
    }

    pub fn with_pacing(
        service: Arc<dyn ScrobbleService>,
        delay: Duration,
        failure_delay: Duration,
    ) -> Self {
        Self {
            service,
            delay,
            failure_delay,
        }
    }

    /// Start executing a plan. Events arrive on the returned receiver in
    /// attempt order: one `Progress` per attempt made, then exactly one
    /// `Completed`.
    pub fn spawn(&self, plan: ScrobblePlan) -> (TaskHandle, EventReceiver) {
        let (tx, rx): (EventSender, EventReceiver) = tokio::sync::mpsc::unbounded_channel();
        let cancel = Arc::new(AtomicBool::new(false));

        let service = Arc::clone(&self.service);
        let delay = self.delay;
        let failure_delay = self.failure_delay;
        let cancel_flag = Arc::clone(&cancel);

        let join = tokio::spawn(async move {
            let total = plan.total();
            let attempts = plan.into_attempts();
            let mut summary = CompletionEvent::default();

            for (index, play) in attempts.iter().enumerate() {
                if cancel_flag.load(Ordering::SeqCst) {
                    summary.cancelled = true;
                    tracing::info!(
                        attempted = summary.attempted,
                        total,
                        "scrobble plan cancelled"
                    );
                    break;
                }

                let submission = PlaySubmission {
                    track: play.track.clone(),
                    timestamp: play.timestamp,
                };
                let outcome = match service.submit_play(&submission).await {
                    Ok(()) => AttemptOutcome::Success,
                    Err(e) => AttemptOutcome::Failure {
                        reason: e.to_string(),
                    },
                };

                summary.attempted += 1;
                let failed = match &outcome {
                    AttemptOutcome::Success => {
                        summary.succeeded += 1;
                        false
                    }
                    AttemptOutcome::Failure { reason } => {
                        summary.failed += 1;
                        tracing::warn!(
                            attempt = summary.attempted,
                            total,
                            track = %play.track.describe(),
                            reason,
                            "scrobble attempt failed"
                        );
                        true
                    }
                };

                let event = ProgressEvent {
                    attempt: summary.attempted,
                    total,
                    track: play.track.clone(),
                    outcome,
                };
                if tx.send(TaskEvent::Progress(event)).is_err() {
                    // Receiver gone; nothing left to report to.
                    return;
                }

                let is_last = index + 1 == attempts.len();
                if !is_last {
                    if failed {
                        sleep(failure_delay).await;
                    }
                    sleep(delay).await;
                }
            }

            tracing::info!(
                attempted = summary.attempted,
                succeeded = summary.succeeded,
                failed = summary.failed,
                cancelled = summary.cancelled,
                "scrobble plan finished"
            );
            let _ = tx.send(TaskEvent::Completed(summary));
        });

        (TaskHandle { cancel, join }, rx)
    }
}
