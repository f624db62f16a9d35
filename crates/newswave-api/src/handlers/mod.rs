//! IPFS API request handlers
//!
//! Both deployment shapes funnel into [`handle`], which runs the same
//! sequence for every operation: method gate, configuration gate, input
//! validation, storage call, response. CORS headers are attached by the
//! router around every operation (see [`crate::routes::with_cors`]).

pub mod fetch;
pub mod gateway;
pub mod upload;

use crate::classify::Operation;
use crate::{ApiError, AppState};
use axum::{
    body::Bytes,
    extract::rejection::BytesRejection,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use newswave_storage::ContentId;
use tracing::{error, warn};

/// A request stripped down to what the handler core needs
#[derive(Debug)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Raw CID path segment, if the route carried one
    pub cid: Option<String>,
    /// Request body, or the reason it could not be read
    pub body: Result<Bytes, ApiError>,
}

impl ApiRequest {
    /// Build from the pieces an adapter extracted
    pub fn new(
        method: Method,
        cid: Option<String>,
        body: Result<Bytes, BytesRejection>,
    ) -> Self {
        let body = body.map_err(|rejection| ApiError::BodyRejected {
            status: rejection.status(),
            reason: rejection.body_text(),
        });
        Self { method, cid, body }
    }
}

/// Run `operation` for `request`
pub async fn handle(state: &AppState, operation: Operation, request: ApiRequest) -> Response {
    if request.method == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        match dispatch(state, operation, request).await {
            Ok(response) => response,
            Err(err) => {
                let status = err.status_code();
                if status.is_server_error() {
                    error!(
                        operation = %operation,
                        kind = err.kind(),
                        status = %status.as_u16(),
                        error = %err,
                        "Request failed"
                    );
                } else {
                    warn!(
                        operation = %operation,
                        kind = err.kind(),
                        status = %status.as_u16(),
                        error = %err,
                        "Request rejected"
                    );
                }
                err.into_response()
            }
        }
    }
}

async fn dispatch(
    state: &AppState,
    operation: Operation,
    request: ApiRequest,
) -> Result<Response, ApiError> {
    if request.method != operation.method() {
        return Err(ApiError::MethodNotAllowed);
    }

    if !state.config.is_storage_configured() {
        error!("THIRDWEB_SECRET_KEY environment variable is not set");
        return Err(ApiError::ConfigurationMissing);
    }

    match operation {
        Operation::Upload => upload::upload(state, request.body?).await,
        Operation::Fetch => fetch::fetch(state, request.cid.as_deref()).await,
        Operation::Gateway => gateway::gateway(state, request.cid.as_deref()).await,
    }
}

/// Take the CID from the last path segment after the operation's route.
///
/// Returns `None` for operations without a CID and when nothing follows the
/// route. Percent-escapes are decoded; a segment that does not decode is
/// passed on raw so validation rejects it.
pub fn infer_cid(operation: Operation, path: &str) -> Option<String> {
    if !operation.takes_cid() {
        return None;
    }

    let rest = path.strip_prefix(operation.route()).unwrap_or(path);
    let segment = rest.trim_end_matches('/').rsplit('/').next()?;
    if segment.is_empty() {
        return None;
    }

    let decoded = urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string());
    Some(decoded)
}

/// Validate the CID path segment
pub(crate) fn require_cid(raw: Option<&str>) -> Result<ContentId, ApiError> {
    let raw = raw.filter(|s| !s.is_empty()).ok_or(ApiError::MissingCid)?;
    ContentId::parse(raw).map_err(|_| ApiError::InvalidCid {
        cid: raw.to_string(),
    })
}

#[cfg(test)]
pub(crate) mod testing {
    //! Fake storage shared by handler tests

    use async_trait::async_trait;
    use axum::body::Bytes;
    use newswave_storage::{ContentId, Result, StorageError, StorageGateway};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    pub const CID: &str = "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG";

    /// Counts calls and returns canned results
    #[derive(Default)]
    pub struct FakeStorage {
        pub calls: AtomicUsize,
        pub document: Mutex<Option<Bytes>>,
        pub failure: Mutex<Option<String>>,
    }

    impl FakeStorage {
        pub fn with_document(json: &str) -> Self {
            let fake = Self::default();
            *fake.document.lock().unwrap() = Some(Bytes::copy_from_slice(json.as_bytes()));
            fake
        }

        pub fn failing(message: &str) -> Self {
            let fake = Self::default();
            *fake.failure.lock().unwrap() = Some(message.to_string());
            fake
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn enter(&self) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.failure.lock().unwrap().clone() {
                Some(message) => Err(StorageError::Http(message)),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl StorageGateway for FakeStorage {
        async fn upload(&self, _data: &[u8]) -> Result<ContentId> {
            self.enter()?;
            ContentId::parse(CID)
        }

        async fn download(&self, cid: &ContentId) -> Result<Bytes> {
            self.enter()?;
            self.document
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| StorageError::NotFound(cid.to_string()))
        }

        async fn resolve_url(&self, cid: &ContentId) -> Result<String> {
            self.enter()?;
            Ok(format!("https://gateway.test/ipfs/{}", cid))
        }
    }
}
