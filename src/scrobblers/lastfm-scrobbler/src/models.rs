//! Wire models for the Last.fm JSON API.
//!
//! The API is loose with types: counts arrive as strings or numbers, and any
//! field documented as a list collapses to a bare object when there is exactly
//! one element. The deserializers here absorb both shapes.

use serde::{Deserialize, Deserializer};

/// A field that may be a single element or a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

fn u64_lenient<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.parse().ok(),
        _ => None,
    }))
}

fn u64_lenient_or_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(u64_lenient(deserializer)?.unwrap_or(0))
}

/// Error body: `{ "error": 6, "message": "Album not found" }`.
#[derive(Debug, Deserialize)]
pub struct ApiFailure {
    pub error: u32,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SessionResponse {
    pub session: Session,
}

#[derive(Debug, Deserialize)]
pub struct Session {
    pub key: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub results: SearchResults,
}

#[derive(Debug, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub trackmatches: Option<TrackMatches>,
}

#[derive(Debug, Deserialize)]
pub struct TrackMatches {
    #[serde(default)]
    pub track: Option<OneOrMany<SearchedTrack>>,
}

#[derive(Debug, Deserialize)]
pub struct SearchedTrack {
    pub name: String,
    pub artist: String,
    #[serde(default, deserialize_with = "u64_lenient")]
    pub listeners: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct AlbumInfoResponse {
    pub album: AlbumInfo,
}

#[derive(Debug, Deserialize)]
pub struct AlbumInfo {
    #[serde(default)]
    pub tracks: Option<AlbumTracks>,
}

#[derive(Debug, Deserialize)]
pub struct AlbumTracks {
    #[serde(default)]
    pub track: Option<OneOrMany<AlbumTrack>>,
}

#[derive(Debug, Deserialize)]
pub struct AlbumTrack {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ScrobbleResponse {
    pub scrobbles: Scrobbles,
}

#[derive(Debug, Deserialize)]
pub struct Scrobbles {
    #[serde(rename = "@attr", default)]
    pub attr: Option<ScrobbleTally>,
    #[serde(default)]
    pub scrobble: Option<OneOrMany<ScrobbleReceipt>>,
}

#[derive(Debug, Deserialize)]
pub struct ScrobbleTally {
    #[serde(default, deserialize_with = "u64_lenient_or_zero")]
    pub accepted: u64,
    #[serde(default, deserialize_with = "u64_lenient_or_zero")]
    pub ignored: u64,
}

#[derive(Debug, Deserialize)]
pub struct ScrobbleReceipt {
    #[serde(rename = "ignoredMessage", default)]
    pub ignored_message: Option<IgnoredMessage>,
}

#[derive(Debug, Deserialize)]
pub struct IgnoredMessage {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(rename = "#text", default)]
    pub text: Option<String>,
}

impl IgnoredMessage {
    pub fn reason(&self) -> String {
        let text = self
            .text
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or("scrobble ignored by service");
        match self.code.as_deref() {
            Some(code) if !code.is_empty() && code != "0" => format!("{text} (code {code})"),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_track_match_parses_as_one() {
        let body = r#"{"results":{"trackmatches":{"track":{"name":"Song","artist":"Artist","listeners":"12"}}}}"#;
        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        let tracks = parsed
            .results
            .trackmatches
            .unwrap()
            .track
            .unwrap()
            .into_vec();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].listeners, Some(12));
    }

    #[test]
    fn listeners_accepts_numbers_and_garbage() {
        let body = r#"{"name":"A","artist":"B","listeners":7}"#;
        let track: SearchedTrack = serde_json::from_str(body).unwrap();
        assert_eq!(track.listeners, Some(7));

        let body = r#"{"name":"A","artist":"B","listeners":"n/a"}"#;
        let track: SearchedTrack = serde_json::from_str(body).unwrap();
        assert_eq!(track.listeners, None);
    }

    #[test]
    fn scrobble_tally_accepts_string_counts() {
        let body = r#"{"scrobbles":{"@attr":{"accepted":"1","ignored":"0"}}}"#;
        let parsed: ScrobbleResponse = serde_json::from_str(body).unwrap();
        let attr = parsed.scrobbles.attr.unwrap();
        assert_eq!(attr.accepted, 1);
        assert_eq!(attr.ignored, 0);
    }

    #[test]
    fn ignored_message_formats_reason() {
        let message = IgnoredMessage {
            code: Some("1".into()),
            text: Some("Artist was ignored".into()),
        };
        assert_eq!(message.reason(), "Artist was ignored (code 1)");

        let message = IgnoredMessage {
            code: Some("0".into()),
            text: None,
        };
        assert_eq!(message.reason(), "scrobble ignored by service");
    }

    #[test]
    fn album_without_tracks_parses() {
        let body = r#"{"album":{}}"#;
        let parsed: AlbumInfoResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.album.tracks.is_none());
    }
}
