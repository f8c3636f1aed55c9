use serde::{Deserialize, Serialize};

/// The subject of a scrobble: enough metadata to identify one play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct TrackRef {
    pub artist: String,
    pub title: String,
    pub album: Option<String>,
}

impl TrackRef {
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
            album: None,
        }
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = Some(album.into());
        self
    }

    /// Short human-readable form for status lines and logs.
    pub fn describe(&self) -> String {
        format!("\"{}\" by {}", self.title, self.artist)
    }
}

/// One user-submitted unit of work: scrobble this track `count` times.
///
/// Immutable once handed to the task layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrobbleRequest {
    pub track: TrackRef,
    pub count: u32,
}

impl ScrobbleRequest {
    pub fn new(track: TrackRef, count: u32) -> Self {
        Self { track, count }
    }

    pub fn once(track: TrackRef) -> Self {
        Self { track, count: 1 }
    }
}

/// A single dated play as submitted to the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaySubmission {
    pub track: TrackRef,
    /// Unix timestamp (seconds) the play is asserted to have happened at.
    pub timestamp: u64,
}

/// One hit from a remote track search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackCandidate {
    pub artist: String,
    pub title: String,
    /// Listener count when the service reports one; used for display ordering.
    pub listeners: Option<u64>,
}

impl TrackCandidate {
    pub fn into_track_ref(self) -> TrackRef {
        TrackRef::new(self.artist, self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_is_title_first() {
        let track = TrackRef::new("Pink Floyd", "Time").with_album("The Dark Side of the Moon");
        assert_eq!(track.describe(), "\"Time\" by Pink Floyd");
    }

    #[test]
    fn candidate_converts_to_track_ref() {
        let candidate = TrackCandidate {
            artist: "Artist".into(),
            title: "Song".into(),
            listeners: Some(42),
        };
        let track = candidate.into_track_ref();
        assert_eq!(track.artist, "Artist");
        assert_eq!(track.title, "Song");
        assert!(track.album.is_none());
    }
}
