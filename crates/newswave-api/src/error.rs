//! API error type and JSON error bodies

use crate::classify::{classify, ErrorCategory, Operation};
use crate::config::SECRET_KEY_ENV;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use newswave_storage::{StorageError, EXPECTED_CID_FORMAT};
use serde::Serialize;
use thiserror::Error;

/// ISO-8601 UTC timestamp with millisecond precision
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// JSON body of every error response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_format: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cid: Option<String>,
    pub timestamp: String,
}

/// API error type
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("No CID provided")]
    MissingCid,

    #[error("No data provided")]
    MissingBody,

    #[error("Invalid CID format")]
    InvalidCid { cid: String },

    #[error("Invalid JSON body")]
    MalformedBody { reason: String },

    #[error("Invalid data format")]
    InvalidPayload,

    #[error("Could not read request body")]
    BodyRejected { status: StatusCode, reason: String },

    #[error("Configuration error")]
    ConfigurationMissing,

    #[error("{message}")]
    Storage {
        operation: Operation,
        category: ErrorCategory,
        message: String,
        cid: Option<String>,
    },
}

impl ApiError {
    /// Classify a storage failure for `operation`
    pub fn storage(operation: Operation, err: &StorageError, cid: Option<&str>) -> Self {
        let category = classify(err);
        Self::Storage {
            operation,
            message: category.message(operation, cid),
            category,
            cid: cid.map(str::to_string),
        }
    }

    /// Short name of the error kind, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MethodNotAllowed => "MethodNotAllowed",
            Self::MissingCid | Self::MissingBody => "MissingInput",
            Self::InvalidCid { .. } | Self::MalformedBody { .. } | Self::InvalidPayload => {
                "InvalidInputShape"
            }
            Self::BodyRejected { .. } => "BodyRejected",
            Self::ConfigurationMissing => ErrorCategory::ConfigurationMissing.as_str(),
            Self::Storage { category, .. } => category.as_str(),
        }
    }

    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::MissingCid
            | Self::MissingBody
            | Self::InvalidCid { .. }
            | Self::MalformedBody { .. }
            | Self::InvalidPayload => StatusCode::BAD_REQUEST,
            Self::BodyRejected { status, .. } => *status,
            Self::ConfigurationMissing => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Storage {
                operation,
                category,
                ..
            } => category.status_code(*operation),
        }
    }

    /// Build the JSON body
    pub fn body(&self) -> ErrorBody {
        let mut body = ErrorBody {
            error: self.to_string(),
            details: None,
            expected_format: None,
            cid: None,
            timestamp: timestamp(),
        };

        match self {
            Self::MethodNotAllowed => {}
            Self::MissingCid => {
                body.details = Some("Please provide a valid IPFS CID in the URL path".into());
            }
            Self::MissingBody => {
                body.details = Some("Please provide news data in the request body".into());
            }
            Self::InvalidCid { cid } => {
                body.details = Some(format!(
                    "The provided CID \"{}\" does not appear to be a valid IPFS CID",
                    cid
                ));
                body.expected_format = Some(EXPECTED_CID_FORMAT);
            }
            Self::MalformedBody { reason } => {
                body.details = Some(format!("Request body is not valid JSON: {}", reason));
            }
            Self::InvalidPayload => {
                body.details =
                    Some("News data must contain at least a title or content field".into());
            }
            Self::BodyRejected { reason, .. } => {
                body.details = Some(reason.clone());
            }
            Self::ConfigurationMissing => {
                body.details = Some(format!(
                    "{} environment variable is not configured",
                    SECRET_KEY_ENV
                ));
            }
            Self::Storage { operation, cid, .. } => {
                if *operation == Operation::Upload {
                    body.details = Some("Check the server logs for more information".into());
                }
                body.cid = cid.clone();
            }
        }

        body
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::MethodNotAllowed.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(ApiError::MissingCid.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidPayload.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::ConfigurationMissing.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_invalid_cid_body_has_hint() {
        let body = ApiError::InvalidCid { cid: "Qm123".into() }.body();
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["error"], "Invalid CID format");
        assert_eq!(json["expectedFormat"], EXPECTED_CID_FORMAT);
        assert!(json["details"].as_str().unwrap().contains("Qm123"));
        assert!(json.get("cid").is_none());
    }

    #[test]
    fn test_storage_error_body() {
        let cid = "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG";
        let err = ApiError::storage(
            Operation::Fetch,
            &StorageError::NotFound(cid.to_string()),
            Some(cid),
        );
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let json = serde_json::to_value(err.body()).unwrap();
        assert_eq!(json["error"], format!("IPFS content not found for CID: {}", cid));
        assert_eq!(json["cid"], cid);
        assert_eq!(err.kind(), "NotFound");
        assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_upload_not_found_is_server_error() {
        let err = ApiError::storage(
            Operation::Upload,
            &StorageError::NotFound("upload endpoint".into()),
            None,
        );
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "IPFS content not found");
    }

    #[test]
    fn test_upload_storage_error_has_details() {
        let err = ApiError::storage(Operation::Upload, &StorageError::MissingSecret, None);
        let json = serde_json::to_value(err.body()).unwrap();

        assert_eq!(json["error"], "Authentication failed - check THIRDWEB_SECRET_KEY");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["details"], "Check the server logs for more information");
    }
}
