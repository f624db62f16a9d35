//! GET /api/ipfs/fetch/{cid}

use super::require_cid;
use crate::classify::Operation;
use crate::{ApiError, AppState};
use axum::{
    response::{IntoResponse, Response},
    Json,
};
use newswave_storage::StorageError;
use serde_json::Value;
use tracing::info;

/// Fetch the JSON document stored under `cid`
pub async fn fetch(state: &AppState, cid: Option<&str>) -> Result<Response, ApiError> {
    info!(cid = cid.unwrap_or_default(), "Fetch request received");

    let cid = require_cid(cid)?;
    let fail = |e: &StorageError| ApiError::storage(Operation::Fetch, e, Some(cid.as_str()));

    let bytes = state.storage.download(&cid).await.map_err(|e| fail(&e))?;
    let document: Value = serde_json::from_slice(&bytes)
        .map_err(|e| fail(&StorageError::Decode(e.to_string())))?;

    info!(cid = %cid, "Successfully fetched document from IPFS");

    Ok(Json(document).into_response())
}
