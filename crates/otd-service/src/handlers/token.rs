//! Token issuance handler.
//!
//! Hands out short-lived rolling tokens so browser clients do not have
//! to bundle the hash routine themselves. Responses must never be
//! cached: a cached token is an expired token.

use crate::models::TokenEnvelope;
use crate::routes::AppState;
use axum::{extract::State, http::header, response::IntoResponse, Json};
use common::token;
use std::sync::Arc;
use tracing::instrument;

/// `GET /api/token`
#[instrument(skip_all, name = "otd.token.issue")]
pub async fn issue_token(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let now = state.clock.now_unix();
    let token = token::issue(&state.config.api_secret, now);

    (
        [
            (header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
            (header::PRAGMA, "no-cache"),
            (header::EXPIRES, "0"),
        ],
        Json(TokenEnvelope {
            success: true,
            token: token.to_string(),
            timestamp: now,
            expires_in: state.config.token_max_age_secs,
        }),
    )
}
