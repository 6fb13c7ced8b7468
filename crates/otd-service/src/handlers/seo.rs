//! Sitemap, robots.txt and the API 404 fallback.
//!
//! Both generated documents are derived from the set of known date
//! keys, so new dataset entries surface to crawlers without code
//! changes.

use crate::errors::OtdError;
use crate::handlers::iso_timestamp;
use crate::routes::AppState;
use axum::{extract::State, http::header, response::IntoResponse};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::instrument;

/// `GET /sitemap.xml`
#[instrument(skip_all, name = "otd.seo.sitemap")]
pub async fn sitemap(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let base_url = &state.config.base_url;
    // YYYY-MM-DD portion of the current timestamp
    let now = iso_timestamp(state.clock.as_ref());
    let lastmod = now.split('T').next().unwrap_or("1970-01-01");

    let mut entries = String::new();
    write_url(&mut entries, base_url, lastmod, "daily", "1.0", None);

    for key in state.store.date_keys() {
        let loc = format!("{base_url}/history/{}/", key.seo_slug());
        write_url(&mut entries, &loc, lastmod, "weekly", "0.8", Some(&loc));
    }

    for key in state.store.date_keys() {
        let loc = format!("{base_url}/history/{}/?lang=en-US", key.seo_slug());
        write_url(&mut entries, &loc, lastmod, "weekly", "0.7", None);
    }

    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"
        xmlns:xhtml="http://www.w3.org/1999/xhtml">
{entries}</urlset>
"#
    );

    (
        [
            (header::CONTENT_TYPE, "application/xml"),
            (header::CACHE_CONTROL, "public, max-age=3600, s-maxage=86400"),
        ],
        xml,
    )
}

/// Append one `<url>` entry. `alternates_for` adds hreflang links for
/// the zh page and its `?lang=en-US` variant.
fn write_url(
    out: &mut String,
    loc: &str,
    lastmod: &str,
    changefreq: &str,
    priority: &str,
    alternates_for: Option<&str>,
) {
    let _ = writeln!(out, "    <url>");
    let _ = writeln!(out, "        <loc>{loc}</loc>");
    let _ = writeln!(out, "        <lastmod>{lastmod}</lastmod>");
    let _ = writeln!(out, "        <changefreq>{changefreq}</changefreq>");
    let _ = writeln!(out, "        <priority>{priority}</priority>");
    if let Some(page) = alternates_for {
        let _ = writeln!(
            out,
            r#"        <xhtml:link rel="alternate" hreflang="zh-CN" href="{page}" />"#
        );
        let _ = writeln!(
            out,
            r#"        <xhtml:link rel="alternate" hreflang="en-US" href="{page}?lang=en-US" />"#
        );
    }
    let _ = writeln!(out, "    </url>");
}

/// `GET /robots.txt`
pub async fn robots(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let base_url = &state.config.base_url;

    let body = format!(
        "# OnThisDay - 历史上的今天
# Generated robots.txt for SEO optimization

User-agent: *
Allow: /
Allow: /history/

# Block API endpoints from crawling
Disallow: /api/

# Allow important files
Allow: /sitemap.xml
Allow: /robots.txt

# Sitemap location
Sitemap: {base_url}/sitemap.xml

# Crawl delay (adjust based on server capacity)
Crawl-delay: 1

# Specific rules for major search engines
User-agent: Googlebot
Allow: /
Crawl-delay: 1

User-agent: Bingbot
Allow: /
Crawl-delay: 1

User-agent: Baiduspider
Allow: /
Crawl-delay: 2

# Block common bot patterns that might be abusive
User-agent: AhrefsBot
Disallow: /

User-agent: MJ12bot
Disallow: /

User-agent: DotBot
Disallow: /
"
    );

    (
        [
            (header::CONTENT_TYPE, "text/plain"),
            (header::CACHE_CONTROL, "public, max-age=86400"),
        ],
        body,
    )
}

/// Fallback for unknown routes: a JSON 404 in the standard error shape.
pub async fn endpoint_not_found() -> OtdError {
    OtdError::NotFound("Endpoint not found, please check the API documentation".to_string())
}
