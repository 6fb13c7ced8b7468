//! Token-gated history lookup handlers.
//!
//! - `GET /api/history/{MM-DD}` - single date
//! - `POST /api/history/batch` - up to 7 dates per request
//!
//! Both sit behind the token middleware; the single-date endpoint is
//! strict (400 on bad format, 404 on no data) while the batch endpoint
//! silently skips keys that fail validation or have no data.

use crate::errors::OtdError;
use crate::handlers::iso_timestamp;
use crate::models::{BatchEnvelope, BatchRequest, HistoryEnvelope};
use crate::routes::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use common::datekey::DateKey;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::instrument;

/// Maximum dates per batch request.
const MAX_BATCH_DATES: usize = 7;

/// `GET /api/history/{MM-DD}`
///
/// # Response
///
/// - 200 with the record and per-section totals
/// - 400 when the date does not match `MM-DD`
/// - 404 when the date is well-formed but has no data
#[instrument(skip(state), name = "otd.history.get")]
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> Result<impl IntoResponse, OtdError> {
    let key = DateKey::parse(&date).map_err(|_| {
        tracing::debug!(target: "otd.handlers.history", date = %date, "Rejected date format");
        OtdError::BadRequest("Invalid date format. Use MM-DD format (e.g., 08-20)".to_string())
    })?;

    let record = state
        .store
        .get(&key)
        .cloned()
        .ok_or_else(|| OtdError::NotFound(format!("No data available for this date: {key}")))?;

    let total = record.totals();
    Ok((
        [(header::CACHE_CONTROL, "public, max-age=3600")],
        Json(HistoryEnvelope {
            success: true,
            date: key.to_string(),
            timestamp: iso_timestamp(state.clock.as_ref()),
            data: record,
            total,
        }),
    ))
}

/// `POST /api/history/batch`
///
/// Body: `{"dates": ["08-20", ...]}`, at most 7 entries.
///
/// Individual keys that fail validation or have no data are skipped;
/// they simply do not appear in the result mapping. The envelope
/// reports both the requested and the found count.
#[instrument(skip_all, name = "otd.history.batch")]
pub async fn batch_history(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, OtdError> {
    // Deserialize manually so a malformed body is 400, not Axum's 422
    let request: BatchRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(target: "otd.handlers.history", error = %e, "Invalid batch body");
        OtdError::BadRequest("Dates array is required".to_string())
    })?;

    if request.dates.is_empty() {
        return Err(OtdError::BadRequest("Dates array is required".to_string()));
    }

    if request.dates.len() > MAX_BATCH_DATES {
        return Err(OtdError::BadRequest(format!(
            "Maximum {MAX_BATCH_DATES} dates allowed per batch request"
        )));
    }

    let mut data = BTreeMap::new();
    for raw in &request.dates {
        let Ok(key) = DateKey::parse(raw) else {
            continue;
        };
        if let Some(record) = state.store.get(&key) {
            data.insert(key.to_string(), record.clone());
        }
    }

    Ok(Json(BatchEnvelope {
        success: true,
        timestamp: iso_timestamp(state.clock.as_ref()),
        requested: request.dates.len(),
        found: data.len(),
        data,
    }))
}
