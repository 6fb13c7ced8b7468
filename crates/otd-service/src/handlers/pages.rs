//! Server-rendered per-date pages.
//!
//! `GET /history/{MonthName-DD}/?lang=` is the SEO surface. The page is
//! rendered from the embedded template with the record for the date;
//! absent dates still render (with localized placeholders) so crawlers
//! always get a complete document.

use crate::errors::OtdError;
use crate::handlers::LangQuery;
use crate::render;
use crate::routes::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderName},
    response::{IntoResponse, Response},
};
use common::datekey::DateKey;
use common::locale::Locale;
use std::sync::Arc;
use tracing::instrument;

/// `GET /history/{MonthName-DD}` (with or without trailing slash)
#[instrument(skip(state, query), name = "otd.pages.history")]
pub async fn history_page(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
    Query(query): Query<LangQuery>,
) -> Result<Response, OtdError> {
    let key = DateKey::parse_seo(&date).map_err(|_| {
        tracing::debug!(target: "otd.handlers.pages", date = %date, "Unparseable SEO date");
        OtdError::NotFound(format!(
            "Invalid date format. Use Month-DD format (e.g., August-21), received: {date}"
        ))
    })?;

    let locale = Locale::from_param(query.lang.as_deref());
    let record = state.store.record_or_empty(&key);

    let html = render::render_page(
        render::PAGE_TEMPLATE,
        &date,
        key,
        &record,
        locale,
        &state.config.base_url,
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (header::CACHE_CONTROL, "public, max-age=3600, s-maxage=7200"),
            (header::CONTENT_LANGUAGE, locale.as_str()),
            (HeaderName::from_static("x-robots-tag"), "index, follow"),
        ],
        html,
    )
        .into_response())
}
