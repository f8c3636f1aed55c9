//! One-shot background lookups (search, album track listing).
//!
//! These share the runner's goal of keeping network calls off the interactive
//! thread, but carry a single result instead of a progress stream.

use encore_core::{ScrobbleService, ServiceResult, TrackCandidate};
use std::sync::Arc;
use tokio::sync::oneshot;

/// Spawn a track search on a background task. The receiver yields the result
/// exactly once; if the task panics the receiver reports closed.
pub fn spawn_track_search(
    service: Arc<dyn ScrobbleService>,
    artist: String,
    title: String,
) -> oneshot::Receiver<ServiceResult<Vec<TrackCandidate>>> {
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let result = service.search_tracks(&artist, &title).await;
        let _ = tx.send(result);
    });
    rx
}

/// Spawn an album track-list fetch on a background task.
pub fn spawn_album_lookup(
    service: Arc<dyn ScrobbleService>,
    artist: String,
    album: String,
) -> oneshot::Receiver<ServiceResult<Vec<String>>> {
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let result = service.album_tracks(&artist, &album).await;
        let _ = tx.send(result);
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use encore_core::{PlaySubmission, ServiceError};

    struct FixtureService;

    #[async_trait::async_trait]
    impl ScrobbleService for FixtureService {
        fn id(&self) -> &str {
            "fixture"
        }

        async fn submit_play(&self, _play: &PlaySubmission) -> ServiceResult<()> {
            Ok(())
        }

        async fn search_tracks(
            &self,
            artist: &str,
            title: &str,
        ) -> ServiceResult<Vec<TrackCandidate>> {
            Ok(vec![TrackCandidate {
                artist: artist.into(),
                title: title.into(),
                listeners: None,
            }])
        }

        async fn album_tracks(&self, _artist: &str, album: &str) -> ServiceResult<Vec<String>> {
            if album == "missing" {
                return Err(ServiceError::NotFound {
                    entity: album.into(),
                });
            }
            Ok(vec!["One".into(), "Two".into()])
        }
    }

    #[tokio::test]
    async fn search_result_arrives_on_the_channel() {
        let rx = spawn_track_search(Arc::new(FixtureService), "Low".into(), "Monkey".into());
        let candidates = rx.await.unwrap().unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "Monkey");
    }

    #[tokio::test]
    async fn album_lookup_propagates_service_errors() {
        let rx = spawn_album_lookup(Arc::new(FixtureService), "Low".into(), "missing".into());
        let err = rx.await.unwrap().unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }
}
