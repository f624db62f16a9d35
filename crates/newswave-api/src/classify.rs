//! Classification of storage provider failures
//!
//! The provider surfaces failures as free-form messages, so the category is
//! picked from keywords in the message text.

use axum::http::{Method, StatusCode};
use serde::Serialize;
use std::fmt;

/// The three operations the API exposes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// POST /api/ipfs/upload
    Upload,
    /// GET /api/ipfs/fetch/{cid}
    Fetch,
    /// GET /api/ipfs/gateway/{cid}
    Gateway,
}

impl Operation {
    /// The only method (besides OPTIONS) the operation accepts
    pub fn method(&self) -> Method {
        match self {
            Self::Upload => Method::POST,
            Self::Fetch | Self::Gateway => Method::GET,
        }
    }

    /// Value of `Access-Control-Allow-Methods`
    pub fn allow_methods(&self) -> &'static str {
        match self {
            Self::Upload => "POST, OPTIONS",
            Self::Fetch | Self::Gateway => "GET, OPTIONS",
        }
    }

    /// Route the operation is mounted on (without the CID segment)
    pub fn route(&self) -> &'static str {
        match self {
            Self::Upload => "/api/ipfs/upload",
            Self::Fetch => "/api/ipfs/fetch",
            Self::Gateway => "/api/ipfs/gateway",
        }
    }

    /// Whether the operation takes a CID from the path
    pub fn takes_cid(&self) -> bool {
        !matches!(self, Self::Upload)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Upload => "upload",
            Self::Fetch => "fetch",
            Self::Gateway => "gateway",
        };
        f.write_str(name)
    }
}

/// Category of a failed storage call
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    NotFound,
    InvalidInput,
    Timeout,
    AuthFailure,
    NetworkFailure,
    ConfigurationMissing,
    /// No keyword matched; carries the original message verbatim
    Unknown(String),
}

/// Classify a raw provider error by its message. Never fails.
///
/// Keywords are checked case-insensitively in priority order; the first
/// match wins.
pub fn classify(error: &dyn fmt::Display) -> ErrorCategory {
    let message = error.to_string();
    let lowered = message.to_lowercase();

    if lowered.contains("not found") {
        ErrorCategory::NotFound
    } else if lowered.contains("invalid") {
        ErrorCategory::InvalidInput
    } else if lowered.contains("timeout") {
        ErrorCategory::Timeout
    } else if lowered.contains("secret") {
        ErrorCategory::AuthFailure
    } else if lowered.contains("network") {
        ErrorCategory::NetworkFailure
    } else {
        ErrorCategory::Unknown(message)
    }
}

impl ErrorCategory {
    /// Stable machine-readable name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NotFound",
            Self::InvalidInput => "InvalidInput",
            Self::Timeout => "Timeout",
            Self::AuthFailure => "AuthFailure",
            Self::NetworkFailure => "NetworkFailure",
            Self::ConfigurationMissing => "ConfigurationMissing",
            Self::Unknown(_) => "Unknown",
        }
    }

    /// HTTP status for this category when `operation` fails.
    ///
    /// Upload has no CID to be missing, so not found is a server error there.
    pub fn status_code(&self, operation: Operation) -> StatusCode {
        match (self, operation) {
            (Self::NotFound, Operation::Upload) => StatusCode::INTERNAL_SERVER_ERROR,
            (Self::NotFound, _) => StatusCode::NOT_FOUND,
            (Self::InvalidInput, _) => StatusCode::BAD_REQUEST,
            (Self::Timeout, _)
            | (Self::AuthFailure, _)
            | (Self::NetworkFailure, _)
            | (Self::ConfigurationMissing, _)
            | (Self::Unknown(_), _) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// User-facing message for `operation`, naming `cid` where one applies
    pub fn message(&self, operation: Operation, cid: Option<&str>) -> String {
        let cid = cid.unwrap_or_default();
        match (self, operation) {
            (Self::NotFound, Operation::Upload) => "IPFS content not found".to_string(),
            (Self::NotFound, _) => format!("IPFS content not found for CID: {}", cid),
            (Self::InvalidInput, Operation::Upload) => "Invalid upload data".to_string(),
            (Self::InvalidInput, _) => format!("Invalid CID format: {}", cid),
            (Self::Timeout, Operation::Upload) => "Upload timeout - try again".to_string(),
            (Self::Timeout, Operation::Fetch) => format!("IPFS fetch timeout for CID: {}", cid),
            (Self::Timeout, Operation::Gateway) => {
                format!("Gateway resolution timeout for CID: {}", cid)
            }
            (Self::AuthFailure, _) => {
                "Authentication failed - check THIRDWEB_SECRET_KEY".to_string()
            }
            (Self::NetworkFailure, _) => "Network error - check internet connection".to_string(),
            (Self::ConfigurationMissing, _) => "Configuration error".to_string(),
            (Self::Unknown(raw), Operation::Upload) => format!("Upload failed: {}", raw),
            (Self::Unknown(raw), Operation::Fetch) => format!("IPFS fetch failed: {}", raw),
            (Self::Unknown(raw), Operation::Gateway) => {
                format!("Failed to resolve gateway URL: {}", raw)
            }
        }
    }
}
