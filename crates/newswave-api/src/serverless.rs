//! Serverless-function adapter
//!
//! Each operation is mounted as a single catch-all function. The CID is not a
//! route parameter; it is inferred from the trailing segment of the request
//! path.

use crate::classify::Operation;
use crate::handlers::{handle, infer_cid, ApiRequest};
use crate::routes::with_cors;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{Method, Uri},
    routing::any,
    Router,
};
use std::sync::Arc;

/// Routes for the serverless layout
pub fn routes() -> Router<Arc<AppState>> {
    [Operation::Upload, Operation::Fetch, Operation::Gateway]
        .into_iter()
        .fold(Router::new(), |router, operation| {
            router.merge(function(operation))
        })
}

/// One function answering every path under the operation's route
fn function(operation: Operation) -> Router<Arc<AppState>> {
    let invoke = move |State(state): State<Arc<AppState>>,
                       method: Method,
                       uri: Uri,
                       body: Result<Bytes, BytesRejection>| async move {
        let cid = infer_cid(operation, uri.path());
        handle(&state, operation, ApiRequest::new(method, cid, body)).await
    };

    let route = operation.route();
    let router = Router::new()
        .route(route, any(invoke))
        .route(&format!("{}/", route), any(invoke))
        .route(&format!("{}/{{*rest}}", route), any(invoke));

    with_cors(operation, router)
}
