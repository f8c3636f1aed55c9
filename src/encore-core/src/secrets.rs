//! Credential storage for the scrobble service.
//!
//! Credentials resolve from the process environment first (the historical
//! `.env` workflow), then from the OS keyring. The keyring entries are written
//! by `encore auth store` so the environment variables never have to live in
//! shell profiles.

use thiserror::Error;

/// Service name used for all Encore credentials in the OS keyring.
const SERVICE_NAME: &str = "encore";

/// Environment variable names, one per credential field.
pub const ENV_API_KEY: &str = "LASTFM_API_KEY";
pub const ENV_API_SECRET: &str = "LASTFM_API_SECRET";
pub const ENV_USERNAME: &str = "LASTFM_USERNAME";
pub const ENV_PASSWORD: &str = "LASTFM_PASSWORD";

#[derive(Debug, Error)]
pub enum SecretsError {
    #[error("credential not found: {key}")]
    NotFound { key: String },

    #[error("keyring access denied: {0}")]
    AccessDenied(String),

    #[error("keyring unavailable: {0}")]
    Unavailable(String),

    #[error("keyring error: {0}")]
    Other(String),
}

impl From<keyring::Error> for SecretsError {
    fn from(err: keyring::Error) -> Self {
        match err {
            keyring::Error::NoEntry => SecretsError::NotFound {
                key: "unknown".into(),
            },
            keyring::Error::NoStorageAccess(e) => SecretsError::AccessDenied(e.to_string()),
            keyring::Error::PlatformFailure(e) => SecretsError::Unavailable(e.to_string()),
            other => SecretsError::Other(other.to_string()),
        }
    }
}

pub type SecretsResult<T> = Result<T, SecretsError>;

/// The four values required to authenticate against the scrobble service.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[redacted]")
            .field("api_secret", &"[redacted]")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Credential fields stored under distinct keyring keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    ApiKey,
    ApiSecret,
    Username,
    Password,
}

impl CredentialKind {
    pub const ALL: [CredentialKind; 4] = [
        CredentialKind::ApiKey,
        CredentialKind::ApiSecret,
        CredentialKind::Username,
        CredentialKind::Password,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            CredentialKind::ApiKey => "api_key",
            CredentialKind::ApiSecret => "api_secret",
            CredentialKind::Username => "username",
            CredentialKind::Password => "password",
        }
    }

    fn env_var(&self) -> &'static str {
        match self {
            CredentialKind::ApiKey => ENV_API_KEY,
            CredentialKind::ApiSecret => ENV_API_SECRET,
            CredentialKind::Username => ENV_USERNAME,
            CredentialKind::Password => ENV_PASSWORD,
        }
    }
}

/// Credential store backed by the OS keyring, with environment override.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    service: String,
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore {
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.into(),
        }
    }

    fn build_key(provider: &str, kind: CredentialKind) -> String {
        format!("{}/{}", provider, kind.as_str())
    }

    pub fn store(&self, provider: &str, kind: CredentialKind, secret: &str) -> SecretsResult<()> {
        let key = Self::build_key(provider, kind);
        let entry = keyring::Entry::new(&self.service, &key)?;
        entry.set_password(secret)?;
        tracing::debug!(provider = provider, kind = ?kind, "stored credential in keyring");
        Ok(())
    }

    pub fn get(&self, provider: &str, kind: CredentialKind) -> SecretsResult<String> {
        let key = Self::build_key(provider, kind);
        let entry = keyring::Entry::new(&self.service, &key)?;
        match entry.get_password() {
            Ok(secret) => Ok(secret),
            Err(keyring::Error::NoEntry) => Err(SecretsError::NotFound { key }),
            Err(e) => Err(e.into()),
        }
    }

    pub fn delete(&self, provider: &str, kind: CredentialKind) -> SecretsResult<()> {
        let key = Self::build_key(provider, kind);
        let entry = keyring::Entry::new(&self.service, &key)?;
        match entry.delete_credential() {
            Ok(()) => {
                tracing::debug!(provider = provider, kind = ?kind, "deleted credential from keyring");
                Ok(())
            }
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Resolve one credential: environment variable first, keyring second.
    pub fn resolve(&self, provider: &str, kind: CredentialKind) -> SecretsResult<String> {
        if let Ok(value) = std::env::var(kind.env_var()) {
            if !value.is_empty() {
                return Ok(value);
            }
        }
        self.get(provider, kind)
    }

    /// Resolve the full credential set for a provider.
    pub fn resolve_credentials(&self, provider: &str) -> SecretsResult<Credentials> {
        Ok(Credentials {
            api_key: self.resolve(provider, CredentialKind::ApiKey)?,
            api_secret: self.resolve(provider, CredentialKind::ApiSecret)?,
            username: self.resolve(provider, CredentialKind::Username)?,
            password: self.resolve(provider, CredentialKind::Password)?,
        })
    }

    /// Write the full credential set to the keyring.
    pub fn store_credentials(&self, provider: &str, creds: &Credentials) -> SecretsResult<()> {
        self.store(provider, CredentialKind::ApiKey, &creds.api_key)?;
        self.store(provider, CredentialKind::ApiSecret, &creds.api_secret)?;
        self.store(provider, CredentialKind::Username, &creds.username)?;
        self.store(provider, CredentialKind::Password, &creds.password)?;
        Ok(())
    }

    /// Remove every stored credential for a provider; missing entries are fine.
    pub fn clear_provider(&self, provider: &str) -> SecretsResult<()> {
        for kind in CredentialKind::ALL {
            let _ = self.delete(provider, kind);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Keyring-backed operations need a real credential store, so tests stick
    // to the pure pieces.

    #[test]
    fn key_building() {
        assert_eq!(
            CredentialStore::build_key("lastfm", CredentialKind::ApiKey),
            "lastfm/api_key"
        );
        assert_eq!(
            CredentialStore::build_key("lastfm", CredentialKind::Password),
            "lastfm/password"
        );
    }

    #[test]
    fn debug_never_prints_secrets() {
        let creds = Credentials {
            api_key: "key-123".into(),
            api_secret: "secret-456".into(),
            username: "listener".into(),
            password: "hunter2".into(),
        };
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("key-123"));
        assert!(!rendered.contains("secret-456"));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("listener"));
    }
}
