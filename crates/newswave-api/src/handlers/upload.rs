//! POST /api/ipfs/upload

use crate::classify::Operation;
use crate::error::timestamp;
use crate::{ApiError, AppState};
use axum::{
    body::Bytes,
    response::{IntoResponse, Response},
    Json,
};
use newswave_storage::StorageError;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

/// Success body for an upload
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub uri: String,
    pub message: &'static str,
    pub timestamp: String,
}

/// JavaScript-style truthiness, used for the `title`/`content` check
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Parse and validate an upload body.
///
/// The payload must carry a truthy `title` or `content`.
pub fn parse_payload(body: &[u8]) -> Result<Value, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::MissingBody);
    }

    let payload: Value = serde_json::from_slice(body).map_err(|e| ApiError::MalformedBody {
        reason: e.to_string(),
    })?;

    if payload.is_null() {
        return Err(ApiError::MissingBody);
    }

    let has_field = |key: &str| payload.get(key).is_some_and(is_truthy);
    if !has_field("title") && !has_field("content") {
        return Err(ApiError::InvalidPayload);
    }

    Ok(payload)
}

/// Upload a JSON document and return its `ipfs://` URI
pub async fn upload(state: &AppState, body: Bytes) -> Result<Response, ApiError> {
    info!(size = body.len(), "Upload request received");

    let payload = parse_payload(&body)?;
    let data = serde_json::to_vec(&payload)
        .map_err(|e| ApiError::storage(Operation::Upload, &StorageError::from(e), None))?;

    debug!(bytes = data.len(), "Uploading document to IPFS");

    let cid = state
        .storage
        .upload(&data)
        .await
        .map_err(|e| ApiError::storage(Operation::Upload, &e, None))?;

    let uri = cid.to_uri();
    info!(uri = %uri, "Upload successful");

    Ok(Json(UploadResponse {
        uri,
        message: "Successfully uploaded to IPFS",
        timestamp: timestamp(),
    })
    .into_response())
}
