//! Optional request-signature verification.
//!
//! Clients may sign requests with `x-timestamp` and `x-signature`
//! headers, where the signature is HMAC-SHA256 over the timestamp
//! concatenated with the request body (an empty body canonicalizes to
//! `{}` so GET requests sign a stable payload). Verification runs only
//! when BOTH headers are present; requests without them pass through
//! untouched.

use crate::errors::OtdError;
use crate::routes::AppState;
use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use ring::hmac;
use std::sync::Arc;
use tracing::instrument;

/// Accepted clock skew between client and server, seconds.
const SIGNATURE_WINDOW_SECS: i64 = 300;

/// Upper bound on a signed body; batch requests are tiny.
const MAX_SIGNED_BODY_BYTES: usize = 64 * 1024;

/// Canonical body for signing when the request carries none.
const EMPTY_BODY_CANONICAL: &[u8] = b"{}";

#[instrument(skip_all, name = "otd.middleware.signature")]
pub async fn verify_signature(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, OtdError> {
    let timestamp = header_value(&req, "x-timestamp");
    let signature = header_value(&req, "x-signature");

    // Signing is opt-in: enforced only when both headers arrive
    let (Some(timestamp), Some(signature)) = (timestamp, signature) else {
        return Ok(next.run(req).await);
    };

    let request_time: i64 = timestamp.parse().map_err(|_| {
        tracing::debug!(target: "otd.middleware.signature", "Non-numeric x-timestamp");
        OtdError::InvalidSignature("Invalid request timestamp".to_string())
    })?;

    let now = state.clock.now_unix();
    if (now - request_time).abs() > SIGNATURE_WINDOW_SECS {
        tracing::debug!(
            target: "otd.middleware.signature",
            skew = now - request_time,
            "Request timestamp outside the accepted window"
        );
        return Err(OtdError::InvalidSignature(
            "Request timestamp expired".to_string(),
        ));
    }

    // The signature covers the body, so buffer it and rebuild the
    // request for the downstream handler.
    let (parts, body) = req.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_SIGNED_BODY_BYTES)
        .await
        .map_err(|_| OtdError::BadRequest("Request body too large".to_string()))?;

    let mut payload = Vec::with_capacity(timestamp.len() + bytes.len().max(2));
    payload.extend_from_slice(timestamp.as_bytes());
    if bytes.is_empty() {
        payload.extend_from_slice(EMPTY_BODY_CANONICAL);
    } else {
        payload.extend_from_slice(&bytes);
    }

    let key = hmac::Key::new(hmac::HMAC_SHA256, state.config.signing_secret.as_bytes());
    let provided = hex::decode(&signature).map_err(|_| {
        OtdError::InvalidSignature("Invalid request signature".to_string())
    })?;

    hmac::verify(&key, &payload, &provided).map_err(|_| {
        tracing::debug!(target: "otd.middleware.signature", "HMAC verification failed");
        OtdError::InvalidSignature("Invalid request signature".to_string())
    })?;

    let req = Request::from_parts(parts, Body::from(bytes));
    Ok(next.run(req).await)
}

fn header_value(req: &Request, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string)
}

/// Compute the hex signature for a timestamp/body pair. Shared with
/// tests and any in-process caller that wants to sign requests.
#[must_use]
pub fn sign_payload(signing_secret: &str, timestamp: &str, body: &[u8]) -> String {
    let key = hmac::Key::new(hmac::HMAC_SHA256, signing_secret.as_bytes());
    let mut payload = Vec::with_capacity(timestamp.len() + body.len().max(2));
    payload.extend_from_slice(timestamp.as_bytes());
    if body.is_empty() {
        payload.extend_from_slice(EMPTY_BODY_CANONICAL);
    } else {
        payload.extend_from_slice(body);
    }
    hex::encode(hmac::sign(&key, &payload).as_ref())
}
