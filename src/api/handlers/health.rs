//! Liveness endpoint

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ApiState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub jokes: usize,
    pub uptime_seconds: u64,
    pub started_at: DateTime<Utc>,
}

/// GET /health
pub async fn health_check(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        jokes: state.store.len().await,
        uptime_seconds: state.uptime_secs(),
        started_at: state.started_at,
    })
}
