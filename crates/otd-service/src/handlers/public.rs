//! Unauthenticated data handlers.
//!
//! - `GET /api/public-history/{date}` - per-date lookup, no token
//! - `GET /api/today` - record for the server's current UTC date
//!
//! Unlike the token-gated endpoint, these synthesize an empty record for
//! valid-but-absent dates instead of returning 404.

use crate::errors::OtdError;
use crate::handlers::iso_timestamp;
use crate::models::{HistoryEnvelope, TodayEnvelope};
use crate::routes::AppState;
use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Datelike, Utc};
use common::datekey::DateKey;
use std::sync::Arc;
use tracing::instrument;

/// `GET /api/public-history/{MM-DD or MonthName-DD}`
///
/// Accepts both the canonical and the SEO date form. A date that parses
/// as neither is 404 (distinct from "no data", which is a 200 with an
/// empty record).
#[instrument(skip(state), name = "otd.public.history")]
pub async fn public_history(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> Result<impl IntoResponse, OtdError> {
    let key = DateKey::parse(&date)
        .or_else(|_| DateKey::parse_seo(&date))
        .map_err(|_| {
            OtdError::NotFound(format!(
                "Invalid date format. Use MM-DD or Month-DD format (e.g., August-21), received: {date}"
            ))
        })?;

    let record = state.store.record_or_empty(&key);
    let total = record.totals();

    Ok((
        [(header::CACHE_CONTROL, "public, max-age=1800")],
        Json(HistoryEnvelope {
            success: true,
            date: key.to_string(),
            timestamp: iso_timestamp(state.clock.as_ref()),
            data: record,
            total,
        }),
    ))
}

/// `GET /api/today`
#[instrument(skip_all, name = "otd.public.today")]
pub async fn today(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, OtdError> {
    let now = state.clock.now_unix();
    let server_time = DateTime::<Utc>::from_timestamp(now, 0).ok_or(OtdError::Internal)?;

    let month = u8::try_from(server_time.month()).map_err(|_| OtdError::Internal)?;
    let day = u8::try_from(server_time.day()).map_err(|_| OtdError::Internal)?;
    let key = DateKey::new(month, day).ok_or(OtdError::Internal)?;

    let record = state.store.record_or_empty(&key);
    let total = record.totals();

    Ok((
        [(header::CACHE_CONTROL, "public, max-age=300")],
        Json(TodayEnvelope {
            success: true,
            date: key.to_string(),
            server_date: iso_timestamp(state.clock.as_ref()),
            data: record,
            total,
        }),
    ))
}
