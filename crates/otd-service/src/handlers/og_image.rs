//! Social-share image generation.
//!
//! `GET /api/og-image/{MM-DD}?lang=` returns a 1200x630 SVG card for
//! the date. Browsers and most crawlers accept SVG for Open Graph
//! images, which keeps this endpoint free of raster dependencies.

use crate::errors::OtdError;
use crate::handlers::LangQuery;
use axum::{
    extract::{Path, Query},
    http::header,
    response::IntoResponse,
};
use common::datekey::DateKey;
use common::locale::{self, Locale};
use tracing::instrument;

/// `GET /api/og-image/{MM-DD}`
#[instrument(skip(query), name = "otd.og_image")]
pub async fn og_image(
    Path(date): Path<String>,
    Query(query): Query<LangQuery>,
) -> Result<impl IntoResponse, OtdError> {
    let key = DateKey::parse(&date)
        .map_err(|_| OtdError::NotFound("Invalid date format".to_string()))?;
    let locale = Locale::from_param(query.lang.as_deref());

    let date_display = match locale {
        Locale::ZhCn => format!("{}月{}日", key.month(), key.day()),
        Locale::EnUs => format!(
            "{} {}",
            locale::month_name(locale, key.month()).unwrap_or_default(),
            key.day()
        ),
    };

    let (title, subtitle) = match locale {
        Locale::ZhCn => (format!("{date_display} - 历史上的今天"), "探索历史，发现精彩"),
        Locale::EnUs => (
            format!("{date_display} - Today in History"),
            "Explore History, Discover the Extraordinary",
        ),
    };

    let svg = render_card(&title, subtitle, &date_display);

    Ok((
        [
            (header::CONTENT_TYPE, "image/svg+xml"),
            (header::CACHE_CONTROL, "public, max-age=86400"),
        ],
        svg,
    ))
}

fn render_card(title: &str, subtitle: &str, date_display: &str) -> String {
    format!(
        r##"<svg width="1200" height="630" xmlns="http://www.w3.org/2000/svg">
    <defs>
        <linearGradient id="bg" x1="0%" y1="0%" x2="100%" y2="100%">
            <stop offset="0%" style="stop-color:#667eea;stop-opacity:1" />
            <stop offset="100%" style="stop-color:#764ba2;stop-opacity:1" />
        </linearGradient>
        <filter id="shadow" x="-20%" y="-20%" width="140%" height="140%">
            <feDropShadow dx="2" dy="4" stdDeviation="3" flood-color="rgba(0,0,0,0.3)"/>
        </filter>
    </defs>

    <rect width="1200" height="630" fill="url(#bg)"/>

    <circle cx="100" cy="100" r="60" fill="rgba(255,255,255,0.1)"/>
    <circle cx="1100" cy="530" r="80" fill="rgba(255,255,255,0.1)"/>
    <circle cx="200" cy="530" r="40" fill="rgba(255,255,255,0.1)"/>

    <rect x="80" y="120" width="1040" height="390" rx="20" fill="rgba(255,255,255,0.95)" filter="url(#shadow)"/>

    <text x="120" y="180" font-family="Arial, sans-serif" font-size="32" font-weight="bold" fill="#2d3748">OnThisDay</text>

    <text x="120" y="260" font-family="Arial, sans-serif" font-size="64" font-weight="bold" fill="#1a202c">{title}</text>

    <text x="120" y="320" font-family="Arial, sans-serif" font-size="28" fill="#4a5568">{subtitle}</text>

    <rect x="120" y="360" width="200" height="60" rx="30" fill="#667eea"/>
    <text x="220" y="400" font-family="Arial, sans-serif" font-size="24" font-weight="bold" fill="white" text-anchor="middle">{date_display}</text>

    <rect x="120" y="450" width="960" height="4" fill="#e2e8f0"/>
    <circle cx="140" cy="452" r="8" fill="#667eea"/>
    <circle cx="1080" cy="452" r="8" fill="#764ba2"/>
</svg>"##
    )
}
