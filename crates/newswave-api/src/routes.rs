//! HTTP route definitions

use crate::classify::Operation;
use crate::config::DeploymentMode;
use crate::handlers::{handle, infer_cid, ApiRequest};
use crate::{middleware, serverless, AppState};
use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        DefaultBodyLimit, Path, State,
    },
    http::{header, HeaderValue, Method, Uri},
    middleware as axum_middleware,
    response::Response,
    routing::{any, get},
    Router,
};
use std::sync::Arc;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::debug;

/// Create the main router for the configured deployment mode
pub fn create_router(state: Arc<AppState>) -> Router {
    let routes = match state.config.mode {
        DeploymentMode::Standalone => standalone_routes(),
        DeploymentMode::Serverless => serverless::routes(),
    };

    routes
        // Apply middleware
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(axum_middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(state.config.max_body_size))
        .with_state(state)
}

/// Attach the permissive CORS headers for `operation` to every response
/// `router` produces, including extractor rejections.
///
/// `CorsLayer` only sends the allow-methods and allow-headers values on
/// preflight, so each header is set explicitly.
pub fn with_cors<S>(operation: Operation, router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(operation.allow_methods()),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
}

/// Fixed routes with a `{cid}` path parameter
fn standalone_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .merge(with_cors(
            Operation::Upload,
            Router::new().route(Operation::Upload.route(), any(upload_handler)),
        ))
        .merge(cid_routes(Operation::Fetch))
        .merge(cid_routes(Operation::Gateway))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

async fn upload_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    handle(&state, Operation::Upload, ApiRequest::new(method, None, body)).await
}

/// `{route}`, `{route}/` and `{route}/{cid}` for an operation taking a CID
fn cid_routes(operation: Operation) -> Router<Arc<AppState>> {
    let handler = move |State(state): State<Arc<AppState>>,
                        method: Method,
                        uri: Uri,
                        path: Result<Path<String>, PathRejection>| async move {
        let cid = match path {
            Ok(Path(cid)) => Some(cid),
            Err(rejection) => {
                debug!(error = %rejection, "CID not extracted from route, reading raw path");
                infer_cid(operation, uri.path())
            }
        };
        handle(&state, operation, ApiRequest::new(method, cid, Ok(Bytes::new()))).await
    };

    let route = operation.route();
    let router = Router::new()
        .route(route, any(handler))
        .route(&format!("{}/", route), any(handler))
        .route(&format!("{}/{{cid}}", route), any(handler));

    with_cors(operation, router)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::handlers::testing::{FakeStorage, CID};
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use rstest::rstest;
    use tower::ServiceExt;

    const MODES: [DeploymentMode; 2] = [DeploymentMode::Standalone, DeploymentMode::Serverless];

    fn router(mode: DeploymentMode, fake: Arc<FakeStorage>) -> Router {
        let config = ApiConfig {
            mode,
            ..ApiConfig::default().with_secret_key("sk_test")
        };
        create_router(Arc::new(AppState::with_storage(config, fake)))
    }

    async fn send(router: Router, method: Method, uri: &str, body: &str) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        router.oneshot(request).await.unwrap()
    }

    async fn json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn assert_cors(response: &Response, methods: &str) {
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], methods);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = send(
            router(DeploymentMode::Standalone, Arc::default()),
            Method::GET,
            "/health",
            "",
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_preflight_has_cors_in_both_modes() {
        for mode in MODES {
            for operation in [Operation::Upload, Operation::Fetch, Operation::Gateway] {
                let uri = if operation.takes_cid() {
                    format!("{}/{}", operation.route(), CID)
                } else {
                    operation.route().to_string()
                };
                let response =
                    send(router(mode, Arc::default()), Method::OPTIONS, &uri, "").await;

                assert_eq!(response.status(), StatusCode::OK, "{mode:?} {operation}");
                assert_cors(&response, operation.allow_methods());
            }
        }
    }

    #[tokio::test]
    async fn test_both_modes_resolve_gateway() {
        for mode in MODES {
            let fake = Arc::new(FakeStorage::default());
            let uri = format!("/api/ipfs/gateway/{}", CID);
            let response = send(router(mode, fake.clone()), Method::GET, &uri, "").await;

            assert_eq!(response.status(), StatusCode::OK, "{mode:?}");
            assert_cors(&response, "GET, OPTIONS");
            assert!(response.headers().contains_key("x-request-id"));
            assert_eq!(
                json(response).await["url"],
                format!("https://gateway.test/ipfs/{}", CID)
            );
            assert_eq!(fake.call_count(), 1);
        }
    }

    #[rstest]
    #[case::fetch("/api/ipfs/fetch", "GET, OPTIONS")]
    #[case::fetch_slash("/api/ipfs/fetch/", "GET, OPTIONS")]
    #[case::gateway("/api/ipfs/gateway", "GET, OPTIONS")]
    #[case::gateway_slash("/api/ipfs/gateway/", "GET, OPTIONS")]
    #[tokio::test]
    async fn test_missing_cid_is_400_json(#[case] uri: &str, #[case] methods: &str) {
        for mode in MODES {
            let fake = Arc::new(FakeStorage::default());
            let response = send(router(mode, fake.clone()), Method::GET, uri, "").await;

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{mode:?} {uri}");
            assert_cors(&response, methods);
            assert_eq!(json(response).await["error"], "No CID provided");
            assert_eq!(fake.call_count(), 0);
        }
    }

    #[tokio::test]
    async fn test_undecodable_cid_is_invalid_in_both_modes() {
        for mode in MODES {
            let fake = Arc::new(FakeStorage::default());
            let response = send(
                router(mode, fake.clone()),
                Method::GET,
                "/api/ipfs/fetch/%FF",
                "",
            )
            .await;

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{mode:?}");
            assert_cors(&response, "GET, OPTIONS");
            let body = json(response).await;
            assert_eq!(body["error"], "Invalid CID format");
            assert!(body["expectedFormat"].is_string());
            assert_eq!(fake.call_count(), 0);
        }
    }

    #[tokio::test]
    async fn test_missing_secret_has_cors() {
        for mode in MODES {
            let config = ApiConfig {
                mode,
                ..ApiConfig::default()
            };
            let router =
                create_router(Arc::new(AppState::with_storage(config, Arc::new(FakeStorage::default()))));
            let response = send(router, Method::POST, "/api/ipfs/upload", r#"{"title":"x"}"#).await;

            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{mode:?}");
            assert_cors(&response, "POST, OPTIONS");
        }
    }

    #[tokio::test]
    async fn test_upload_wrong_method_has_cors() {
        let response = send(
            router(DeploymentMode::Standalone, Arc::default()),
            Method::PUT,
            "/api/ipfs/upload",
            "",
        )
        .await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_cors(&response, "POST, OPTIONS");
    }

    #[tokio::test]
    async fn test_oversized_body_is_413_with_cors() {
        let config = ApiConfig {
            max_body_size: 16,
            ..ApiConfig::default().with_secret_key("sk_test")
        };
        let router = create_router(Arc::new(AppState::with_storage(
            config,
            Arc::new(FakeStorage::default()),
        )));

        let body = format!(r#"{{"title":"{}"}}"#, "x".repeat(64));
        let response = send(router, Method::POST, "/api/ipfs/upload", &body).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_cors(&response, "POST, OPTIONS");
    }
}
