//! Error types for the newswave-storage crate

use std::time::Duration;
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur while talking to the storage provider.
///
/// Display strings matter: the API layer classifies failures by the words
/// in these messages ("not found", "invalid", "timeout", "secret", "network").
#[derive(Error, Debug)]
pub enum StorageError {
    /// Content not found
    #[error("content not found: {0}")]
    NotFound(String),

    /// Identifier rejected locally or by the provider
    #[error("invalid CID: {0}")]
    InvalidCid(String),

    /// No secret key was configured, so no request was attempted
    #[error("secret key not configured")]
    MissingSecret,

    /// The provider refused the secret key
    #[error("storage provider rejected the secret key (HTTP {status})")]
    Unauthorized { status: u16 },

    /// The client gave up waiting
    #[error("request timeout after {after:?}")]
    Timeout { after: Duration },

    /// The provider reported a timeout of its own
    #[error("provider timeout (HTTP {status})")]
    ProviderTimeout { status: u16 },

    /// Connection error
    #[error("network error: {0}")]
    Connection(String),

    /// HTTP error
    #[error("http error: {0}")]
    Http(String),

    /// Provider answered with something we could not use
    #[error("unexpected provider response: {0}")]
    UnexpectedResponse(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Downloaded bytes were not a JSON document
    #[error("could not decode stored document as JSON: {0}")]
    Decode(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl StorageError {
    /// Map a reqwest failure, tagging timeouts with the configured limit.
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            StorageError::Timeout { after: timeout }
        } else if err.is_connect() {
            StorageError::Connection(err.to_string())
        } else {
            StorageError::Http(err.to_string())
        }
    }
}

impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        StorageError::from_reqwest(err, Duration::from_secs(30))
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}
