//! Server startup and lifecycle

use crate::{routes, ApiConfig, AppState};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Run the API server until Ctrl-C
pub async fn run_server(config: ApiConfig) -> anyhow::Result<()> {
    run_server_with_shutdown(config, shutdown_signal()).await
}

/// Run server with graceful shutdown
pub async fn run_server_with_shutdown(
    config: ApiConfig,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let addr = config.bind_addr();
    let mode = config.mode;
    let state = Arc::new(AppState::new(config)?);
    let app = routes::create_router(state);

    let listener = TcpListener::bind(&addr).await?;

    info!("🚀 NewsWave API listening on http://{} ({:?} mode)", addr, mode);
    info!("📦 IPFS endpoints ready under /api/ipfs");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("👋 API shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
