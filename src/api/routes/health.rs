//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (content store reachable)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// GET /health/live
///
/// Kubernetes liveness probe.
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Kubernetes readiness probe.
/// Returns 200 if the content store answers a trivial query.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    match check_content_store(&state).await {
        true => StatusCode::OK,
        false => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// GET /health
///
/// Full health status with component details.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let content_ok = check_content_store(&state).await;

    Json(HealthResponse {
        status: if content_ok { "healthy" } else { "degraded" }.to_string(),
        content_store: if content_ok { "ok" } else { "error" }.to_string(),
        auth: if state.session.is_enabled() {
            "enabled"
        } else {
            "disabled"
        }
        .to_string(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn check_content_store(state: &AppState) -> bool {
    match state.builder.store().ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Content store health check failed: {}", e);
            false
        }
    }
}
