//! Dashboard: Axum web server exposing the arbitrage scan.
//!
//! Serves the JSON API and the static front-end directory. CORS enabled
//! for GET so the page can be hosted elsewhere during development.

pub mod routes;

use anyhow::{Context, Result};
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::path::Path;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;

use routes::AppState;

/// Build the Axum router with all routes and middleware.
///
/// Any path that is not an API route is looked up under `static_dir`.
pub fn build_router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/arbitrage", get(routes::get_arbitrage))
        .route("/health", get(routes::health))
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until `shutdown` resolves.
pub async fn serve(
    state: AppState,
    static_dir: impl AsRef<Path>,
    addr: SocketAddr,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let app = build_router(state, static_dir);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "Server listening on http://localhost:{}", addr.port());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Server error")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
