use crate::models::{PlaySubmission, TrackCandidate};
use thiserror::Error;

/// Failure categories surfaced by remote scrobble services.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("service is not authenticated")]
    NotAuthenticated,
    #[error("network error: {message}")]
    Network { message: String },
    #[error("authentication error: {message}")]
    Authentication { message: String },
    #[error("rate limited: {message}")]
    RateLimited { message: String },
    #[error("not found: {entity}")]
    NotFound { entity: String },
    /// The service accepted the request but ignored the scrobble.
    #[error("scrobble ignored: {reason}")]
    Ignored { reason: String },
    /// A structured error body from the remote API.
    #[error("api error {code}: {message}")]
    Api { code: u32, message: String },
    #[error("{message}")]
    Other { message: String },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// A remote music-tracking service.
///
/// Implementations own their session state; callers receive an
/// already-authenticated handle and treat every method as a slow, fallible
/// network call.
#[async_trait::async_trait]
pub trait ScrobbleService: Send + Sync {
    /// Stable service identifier (e.g., "lastfm").
    fn id(&self) -> &str;

    /// Submit one dated play.
    async fn submit_play(&self, play: &PlaySubmission) -> ServiceResult<()>;

    /// Search for tracks matching artist + title.
    async fn search_tracks(&self, artist: &str, title: &str) -> ServiceResult<Vec<TrackCandidate>>;

    /// Ordered track titles for an album.
    async fn album_tracks(&self, artist: &str, album: &str) -> ServiceResult<Vec<String>>;
}
