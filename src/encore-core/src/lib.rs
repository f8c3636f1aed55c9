pub mod config;
pub mod logging;
pub mod models;
pub mod paths;
pub mod redact;
pub mod secrets;
pub mod service;

pub use config::{Config, ConfigError, LogLevel, LoggingConfig, ScrobbleConfig, ValidationError};
pub use logging::{init_logging, LoggingError, LoggingGuard};
pub use models::{PlaySubmission, ScrobbleRequest, TrackCandidate, TrackRef};
pub use paths::{AppDirs, DirsError};
pub use secrets::{CredentialStore, Credentials, SecretsError};
pub use service::{ScrobbleService, ServiceError, ServiceResult};

pub const APP_NAME: &str = "encore";
pub const APP_AUTHOR: &str = "Encore";
pub const APP_QUALIFIER: &str = "io";
