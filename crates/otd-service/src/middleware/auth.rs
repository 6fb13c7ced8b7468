//! Token authentication middleware for protected routes.
//!
//! Accepts the rolling token either as `Authorization: Bearer <token>`
//! or as a `?token=` query parameter, and verifies it against the shared
//! secret with the configured validity window.
//!
//! # Response
//!
//! - 401 if the token is missing or expired
//! - 403 if the token is malformed or its hash does not match
//! - Continues to the next handler otherwise

use crate::errors::OtdError;
use crate::routes::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::IntoResponse,
};
use common::token::{self, TokenError};
use std::sync::Arc;
use tracing::instrument;

/// Pull the token out of the Authorization header or the query string.
fn extract_token(req: &Request) -> Option<String> {
    let bearer = req
        .headers()
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    req.uri().query().and_then(|query| {
        query.split('&').find_map(|pair| {
            pair.split_once('=')
                .and_then(|(name, value)| (name == "token").then(|| value.to_string()))
        })
    })
}

/// Authentication middleware for the token-gated API routes.
#[instrument(skip_all, name = "otd.middleware.auth")]
pub async fn require_token(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<impl IntoResponse, OtdError> {
    let Some(raw) = extract_token(&req) else {
        tracing::debug!(target: "otd.middleware.auth", "Missing authentication token");
        return Err(OtdError::TokenRequired);
    };

    let now = state.clock.now_unix();
    match token::verify(
        &raw,
        &state.config.api_secret,
        now,
        state.config.token_max_age_secs,
    ) {
        Ok(()) => Ok(next.run(req).await),
        Err(TokenError::Expired) => {
            tracing::debug!(target: "otd.middleware.auth", "Expired authentication token");
            Err(OtdError::TokenExpired)
        }
        Err(TokenError::Malformed | TokenError::SignatureMismatch) => {
            tracing::debug!(target: "otd.middleware.auth", "Invalid authentication token");
            Err(OtdError::InvalidToken)
        }
    }
}
