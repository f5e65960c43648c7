// ABOUTME: Inbound HTTP API.
// ABOUTME: Router construction and the serve loop.

pub mod error;
pub mod routes;
pub mod state;

use std::net::SocketAddr;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

pub use error::AppError;
pub use state::AppState;

/// Build the router with every route and middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::health::health))
        .route(
            "/api/github/deploy/{owner}/{repo}",
            post(routes::deploy::deploy),
        )
        .route("/api/docker/pull", get(routes::pull::pull))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    serve_on(state, listener).await
}

/// Serve on an already-bound listener.
pub async fn serve_on(state: AppState, listener: tokio::net::TcpListener) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for ctrl-c; shutdown only by kill");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
