//! Last.fm scrobble service client.
//!
//! Implements the audioscrobbler 2.0 API surface Encore needs: mobile-session
//! authentication, track search, album track listing, and scrobble
//! submission. Signed requests follow the documented scheme: md5 over the
//! sorted `key``value` concatenation plus the shared secret, with the
//! `format` parameter excluded from the signature.

pub mod models;

use encore_core::redact::redact_params;
use encore_core::{
    Credentials, PlaySubmission, ScrobbleService, ServiceError, ServiceResult, TrackCandidate,
};
use models::{
    AlbumInfoResponse, ApiFailure, ScrobbleResponse, SearchResponse, SessionResponse,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::sync::RwLock;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://ws.audioscrobbler.com/2.0/";

#[derive(Clone)]
pub struct LastfmConfig {
    pub base_url: String,
    pub credentials: Credentials,
    /// Maximum candidates requested from track search.
    pub search_limit: u32,
    /// Session key from a previous authentication, when available.
    pub initial_session: Option<String>,
}

impl LastfmConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            credentials,
            search_limit: 10,
            initial_session: None,
        }
    }
}

enum HttpMethod {
    Get,
    Post,
}

pub struct LastfmScrobbler {
    client: Client,
    base_url: Url,
    credentials: Credentials,
    search_limit: u32,
    session_key: RwLock<Option<String>>,
}

impl LastfmScrobbler {
    pub fn new(config: LastfmConfig) -> Result<Self, ServiceError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| ServiceError::Other {
            message: format!("invalid base_url: {e}"),
        })?;
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(20))
            .build()
            .map_err(|e| ServiceError::Other {
                message: e.to_string(),
            })?;
        Ok(Self {
            client,
            base_url,
            credentials: config.credentials,
            search_limit: config.search_limit.max(1),
            session_key: RwLock::new(config.initial_session),
        })
    }

    pub fn has_session(&self) -> bool {
        self.session_key
            .read()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    fn session(&self) -> ServiceResult<String> {
        self.session_key
            .read()
            .ok()
            .and_then(|guard| guard.clone())
            .ok_or(ServiceError::NotAuthenticated)
    }

    /// Obtain a session key with the stored account credentials.
    pub async fn authenticate(&self) -> ServiceResult<()> {
        let mut params = BTreeMap::new();
        params.insert("username".to_string(), self.credentials.username.clone());
        params.insert("password".to_string(), self.credentials.password.clone());

        let response: SessionResponse = self
            .request("auth.getMobileSession", HttpMethod::Post, params, true, false)
            .await
            .map_err(|e| match e {
                ServiceError::Network { .. } => e,
                other => ServiceError::Authentication {
                    message: format!("authentication failed: {other}"),
                },
            })?;

        if let Ok(mut guard) = self.session_key.write() {
            *guard = Some(response.session.key);
        }
        tracing::info!(
            user = response.session.name.as_deref().unwrap_or("unknown"),
            "authenticated with last.fm"
        );
        Ok(())
    }

    async fn request<T: DeserializeOwned>(
        &self,
        api_method: &str,
        http: HttpMethod,
        mut params: BTreeMap<String, String>,
        signed: bool,
        with_session: bool,
    ) -> ServiceResult<T> {
        params.insert("method".to_string(), api_method.to_string());
        params.insert("api_key".to_string(), self.credentials.api_key.clone());
        if with_session {
            params.insert("sk".to_string(), self.session()?);
        }
        if signed {
            // The signature covers everything sent so far; `format` is added
            // afterwards and never signed.
            let signature = api_signature(&params, &self.credentials.api_secret);
            params.insert("api_sig".to_string(), signature);
        }
        params.insert("format".to_string(), "json".to_string());

        if tracing::enabled!(tracing::Level::DEBUG) {
            let rendered = params
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("&");
            tracing::debug!(params = %redact_params(&rendered), "last.fm request");
        }

        let builder = match http {
            HttpMethod::Get => self.client.get(self.base_url.clone()).query(&params),
            HttpMethod::Post => self.client.post(self.base_url.clone()).form(&params),
        };
        let response = builder.send().await.map_err(|e| ServiceError::Network {
            message: e.to_string(),
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| ServiceError::Network {
            message: e.to_string(),
        })?;

        // Last.fm reports errors in the body with the status often still 200,
        // so the body is checked before the status line.
        if let Ok(failure) = serde_json::from_slice::<ApiFailure>(&body) {
            return Err(map_api_failure(failure));
        }
        if !status.is_success() {
            return Err(ServiceError::Other {
                message: format!("unexpected http status {status}"),
            });
        }
        serde_json::from_slice(&body).map_err(|e| ServiceError::Other {
            message: format!("failed to decode {api_method} response: {e}"),
        })
    }
}

#[async_trait::async_trait]
impl ScrobbleService for LastfmScrobbler {
    fn id(&self) -> &str {
        "lastfm"
    }

    async fn submit_play(&self, play: &PlaySubmission) -> ServiceResult<()> {
        let mut params = BTreeMap::new();
        params.insert("artist[0]".to_string(), play.track.artist.clone());
        params.insert("track[0]".to_string(), play.track.title.clone());
        params.insert("timestamp[0]".to_string(), play.timestamp.to_string());
        if let Some(album) = &play.track.album {
            params.insert("album[0]".to_string(), album.clone());
        }

        let response: ScrobbleResponse = self
            .request("track.scrobble", HttpMethod::Post, params, true, true)
            .await?;

        let scrobbles = response.scrobbles;
        if let Some(attr) = &scrobbles.attr {
            if attr.ignored > 0 {
                let reason = scrobbles
                    .scrobble
                    .map(|s| s.into_vec())
                    .unwrap_or_default()
                    .into_iter()
                    .find_map(|receipt| receipt.ignored_message)
                    .map(|message| message.reason())
                    .unwrap_or_else(|| "scrobble ignored by service".to_string());
                return Err(ServiceError::Ignored { reason });
            }
            if attr.accepted > 0 {
                return Ok(());
            }
        } else if scrobbles.scrobble.is_some() {
            // Older response shape without the tally attribute.
            return Ok(());
        }

        Err(ServiceError::Other {
            message: "scrobble response reported neither accepted nor ignored".into(),
        })
    }

    async fn search_tracks(&self, artist: &str, title: &str) -> ServiceResult<Vec<TrackCandidate>> {
        let mut params = BTreeMap::new();
        params.insert("artist".to_string(), artist.to_string());
        params.insert("track".to_string(), title.to_string());
        params.insert("limit".to_string(), self.search_limit.to_string());

        let response: SearchResponse = self
            .request("track.search", HttpMethod::Get, params, false, false)
            .await?;

        let candidates = response
            .results
            .trackmatches
            .and_then(|matches| matches.track)
            .map(|tracks| tracks.into_vec())
            .unwrap_or_default()
            .into_iter()
            .map(|track| TrackCandidate {
                artist: track.artist,
                title: track.name,
                listeners: track.listeners,
            })
            .collect();
        Ok(candidates)
    }

    async fn album_tracks(&self, artist: &str, album: &str) -> ServiceResult<Vec<String>> {
        let mut params = BTreeMap::new();
        params.insert("artist".to_string(), artist.to_string());
        params.insert("album".to_string(), album.to_string());

        let response: AlbumInfoResponse = self
            .request("album.getInfo", HttpMethod::Get, params, false, false)
            .await?;

        let titles = response
            .album
            .tracks
            .and_then(|tracks| tracks.track)
            .map(|tracks| tracks.into_vec())
            .unwrap_or_default()
            .into_iter()
            .map(|track| track.name)
            .collect();
        Ok(titles)
    }
}

/// md5 hex over the sorted `key``value` concatenation plus the shared secret.
fn api_signature(params: &BTreeMap<String, String>, secret: &str) -> String {
    let mut material = String::new();
    for (key, value) in params {
        material.push_str(key);
        material.push_str(value);
    }
    material.push_str(secret);
    format!("{:x}", md5::compute(material.as_bytes()))
}

fn map_api_failure(failure: ApiFailure) -> ServiceError {
    let message = failure
        .message
        .unwrap_or_else(|| "unknown api error".to_string());
    match failure.error {
        6 => ServiceError::NotFound { entity: message },
        4 | 9 | 10 | 13 | 14 | 26 => ServiceError::Authentication { message },
        29 => ServiceError::RateLimited { message },
        code => ServiceError::Api { code, message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_matches_known_vector() {
        // md5("ab" + "c") == md5("abc")
        let mut params = BTreeMap::new();
        params.insert("a".to_string(), "b".to_string());
        assert_eq!(
            api_signature(&params, "c"),
            "900150983cd24fb0d6963f7d28e17f72"
        );
    }

    #[test]
    fn signature_of_nothing_is_md5_of_empty_string() {
        let params = BTreeMap::new();
        assert_eq!(
            api_signature(&params, ""),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
    }

    #[test]
    fn signature_concatenates_in_key_order() {
        let mut forward = BTreeMap::new();
        forward.insert("artist".to_string(), "Low".to_string());
        forward.insert("method".to_string(), "track.search".to_string());

        let mut reversed = BTreeMap::new();
        reversed.insert("method".to_string(), "track.search".to_string());
        reversed.insert("artist".to_string(), "Low".to_string());

        assert_eq!(
            api_signature(&forward, "secret"),
            api_signature(&reversed, "secret")
        );
        assert_eq!(api_signature(&forward, "secret").len(), 32);
    }

    #[test]
    fn error_codes_map_to_categories() {
        let not_found = map_api_failure(ApiFailure {
            error: 6,
            message: Some("Album not found".into()),
        });
        assert!(matches!(not_found, ServiceError::NotFound { .. }));

        let auth = map_api_failure(ApiFailure {
            error: 4,
            message: None,
        });
        assert!(matches!(auth, ServiceError::Authentication { .. }));

        let limited = map_api_failure(ApiFailure {
            error: 29,
            message: Some("Rate limit exceeded".into()),
        });
        assert!(matches!(limited, ServiceError::RateLimited { .. }));

        let other = map_api_failure(ApiFailure {
            error: 11,
            message: Some("Service offline".into()),
        });
        assert!(matches!(other, ServiceError::Api { code: 11, .. }));
    }
}
