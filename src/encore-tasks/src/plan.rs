use encore_core::{ScrobbleRequest, TrackRef};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Spacing between backdated play timestamps.
const TIMESTAMP_STEP_SECS: u64 = 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("scrobble count must be at least 1, got {count} for {track}")]
    InvalidRequest { track: String, count: u32 },
    #[error("plan contains no requests")]
    Empty,
}

/// One dated attempt within a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedPlay {
    pub track: TrackRef,
    /// Unix timestamp (seconds) to submit for this play.
    pub timestamp: u64,
}

/// A validated, flattened sequence of submission attempts.
///
/// A request with count N contributes exactly N attempts, in request order.
/// Timestamps are backdated from the base, one step per attempt with the most
/// recent first, so repeated plays read as a plausible listening history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrobblePlan {
    attempts: Vec<PlannedPlay>,
}

impl ScrobblePlan {
    pub fn build(requests: &[ScrobbleRequest]) -> Result<Self, PlanError> {
        Self::build_at(requests, now_unix())
    }

    pub fn build_at(requests: &[ScrobbleRequest], base_timestamp: u64) -> Result<Self, PlanError> {
        if requests.is_empty() {
            return Err(PlanError::Empty);
        }

        let mut attempts = Vec::new();
        let mut offset: u64 = 0;
        for request in requests {
            if request.count == 0 {
                return Err(PlanError::InvalidRequest {
                    track: request.track.describe(),
                    count: request.count,
                });
            }
            for _ in 0..request.count {
                let timestamp = base_timestamp.saturating_sub(offset * TIMESTAMP_STEP_SECS);
                attempts.push(PlannedPlay {
                    track: request.track.clone(),
                    timestamp,
                });
                offset += 1;
            }
        }

        Ok(Self { attempts })
    }

    pub fn total(&self) -> u32 {
        self.attempts.len() as u32
    }

    pub fn attempts(&self) -> &[PlannedPlay] {
        &self.attempts
    }

    pub(crate) fn into_attempts(self) -> Vec<PlannedPlay> {
        self.attempts
    }
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(title: &str, count: u32) -> ScrobbleRequest {
        ScrobbleRequest::new(TrackRef::new("Artist", title), count)
    }

    #[test]
    fn single_request_flattens_to_count_attempts() {
        let plan = ScrobblePlan::build_at(&[request("Song", 3)], 10_000).unwrap();
        assert_eq!(plan.total(), 3);
        let stamps: Vec<u64> = plan.attempts().iter().map(|p| p.timestamp).collect();
        assert_eq!(stamps, vec![10_000, 9_940, 9_880]);
    }

    #[test]
    fn batch_preserves_request_order_and_continues_backdating() {
        let plan =
            ScrobblePlan::build_at(&[request("One", 2), request("Two", 1)], 10_000).unwrap();
        assert_eq!(plan.total(), 3);
        assert_eq!(plan.attempts()[2].track.title, "Two");
        assert_eq!(plan.attempts()[2].timestamp, 9_880);
    }

    #[test]
    fn zero_count_is_invalid() {
        let err = ScrobblePlan::build_at(&[request("Song", 0)], 10_000).unwrap_err();
        assert!(matches!(err, PlanError::InvalidRequest { count: 0, .. }));
    }

    #[test]
    fn empty_batch_is_invalid() {
        assert_eq!(
            ScrobblePlan::build_at(&[], 10_000).unwrap_err(),
            PlanError::Empty
        );
    }

    #[test]
    fn timestamps_never_underflow() {
        let plan = ScrobblePlan::build_at(&[request("Song", 3)], 60).unwrap();
        assert_eq!(plan.attempts()[2].timestamp, 0);
    }
}
