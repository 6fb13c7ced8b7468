//! Health check handler.
//!
//! Returns a liveness payload only; the service has no external
//! dependencies to probe once the dataset is loaded.

use crate::handlers::iso_timestamp;
use crate::models::HealthResponse;
use crate::routes::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;

/// `GET /api/health`
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        timestamp: iso_timestamp(state.clock.as_ref()),
    })
}
