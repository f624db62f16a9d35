//! GET /api/ipfs/gateway/{cid}

use super::require_cid;
use crate::classify::Operation;
use crate::{ApiError, AppState};
use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::info;

/// Success body for a gateway lookup
#[derive(Debug, Serialize)]
pub struct GatewayResponse {
    pub url: String,
}

/// Resolve an HTTP gateway URL for `cid`
pub async fn gateway(state: &AppState, cid: Option<&str>) -> Result<Response, ApiError> {
    let cid = require_cid(cid)?;

    let url = state
        .storage
        .resolve_url(&cid)
        .await
        .map_err(|e| ApiError::storage(Operation::Gateway, &e, Some(cid.as_str())))?;

    info!(cid = %cid, url = %url, "Resolved gateway URL");

    Ok(Json(GatewayResponse { url }).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::handlers::testing::{FakeStorage, CID};
    use axum::body::to_bytes;
    use axum::http::StatusCode;
    use std::sync::Arc;

    fn state(fake: Arc<FakeStorage>) -> AppState {
        AppState::with_storage(ApiConfig::default().with_secret_key("sk_test"), fake)
    }

    #[tokio::test]
    async fn test_returns_url() {
        let fake = Arc::new(FakeStorage::default());
        let response = gateway(&state(fake), Some(CID)).await.unwrap();

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json, serde_json::json!({ "url": format!("https://gateway.test/ipfs/{}", CID) }));
    }

    #[tokio::test]
    async fn test_missing_cid() {
        let fake = Arc::new(FakeStorage::default());
        let err = gateway(&state(fake.clone()), None).await.unwrap_err();

        assert!(matches!(err, ApiError::MissingCid));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(fake.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_failure_wraps_message() {
        let fake = Arc::new(FakeStorage::failing("provider exploded"));
        let err = gateway(&state(fake), Some(CID)).await.unwrap_err();

        assert_eq!(err.to_string(), "Failed to resolve gateway URL: http error: provider exploded");
    }
}
