//! Dashboard API route handlers.
//!
//! All endpoints return JSON. State is shared via `Arc<ServerState>` and is
//! read-only: each request fetches its own batch and runs its own engine pass.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, Instrument};
use uuid::Uuid;

use crate::data::OddsSource;
use crate::strategy::ArbitrageEngine;
use crate::types::{ArbError, Opportunity};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct ServerState {
    pub engine: ArbitrageEngine,
    pub source: Arc<dyn OddsSource>,
}

impl ServerState {
    pub fn new(engine: ArbitrageEngine, source: Arc<dyn OddsSource>) -> Self {
        Self { engine, source }
    }
}

pub type AppState = Arc<ServerState>;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Failure of a whole request. Per-event exclusions never get here.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        let status = match err.downcast_ref::<ArbError>() {
            Some(ArbError::DataSourceUnavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: format!("{err:#}"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse { error: self.message })).into_response()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /api/arbitrage
pub async fn get_arbitrage(
    State(state): State<AppState>,
) -> Result<Json<Vec<Opportunity>>, ApiError> {
    let pass_id = Uuid::new_v4();
    let span = tracing::info_span!("arbitrage_pass", %pass_id, source = state.source.name());

    async move {
        let events = state.source.fetch_events().await.map_err(|e| {
            error!(error = %e, "Odds fetch failed");
            ApiError::from(e)
        })?;

        let report = state.engine.scan(&events);
        info!(
            events = events.len(),
            opportunities = report.opportunities.len(),
            "Arbitrage pass served"
        );
        Ok::<_, ApiError>(Json(report.opportunities))
    }
    .instrument(span)
    .await
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
