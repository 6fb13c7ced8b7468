//! HTTP routes for the OnThisDay service.
//!
//! Defines the Axum router and application state.

use crate::config::Config;
use crate::handlers;
use crate::middleware::{rate_limit, require_token, verify_signature, RateLimiter};
use crate::store::HistoryStore;
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use common::clock::Clock;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The immutable date-keyed dataset.
    pub store: Arc<HistoryStore>,

    /// Service configuration.
    pub config: Config,

    /// Time source for tokens, rate limiting and the today endpoint.
    pub clock: Arc<dyn Clock>,
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/api/*` - the JSON API, rate limited per IP
///   - public: health, token, public-history, today, og-image
///   - token-gated (+ optional request signing): history, history/batch
/// - `/history/{MonthName-DD}` - server-rendered pages
/// - `/sitemap.xml`, `/robots.txt` - generated SEO documents
/// - JSON 404 fallback for everything else
/// - CORS allow-list, TraceLayer, 30 second request timeout
pub fn build_routes(state: Arc<AppState>) -> Router {
    let limiter = Arc::new(RateLimiter::new(
        state.config.rate_limit_max,
        Duration::from_secs(state.config.rate_limit_window_secs),
        Arc::clone(&state.clock),
    ));

    // Public API routes (no authentication required)
    let public_api = Router::new()
        .route("/api/health", get(handlers::health_check))
        .route("/api/token", get(handlers::issue_token))
        .route("/api/public-history/:date", get(handlers::public_history))
        .route("/api/today", get(handlers::today))
        .route("/api/og-image/:date", get(handlers::og_image))
        .with_state(state.clone());

    // Token-gated API routes. Layer order (outer to inner): the token
    // check runs first, then the optional signature check.
    let protected_api = Router::new()
        .route("/api/history/:date", get(handlers::get_history))
        .route("/api/history/batch", post(handlers::batch_history))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            verify_signature,
        ))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_token))
        .with_state(state.clone());

    // The whole /api surface shares the per-IP rate limit
    let api = public_api
        .merge(protected_api)
        .layer(middleware::from_fn_with_state(limiter, rate_limit));

    // SEO surface: server-rendered pages, sitemap, robots
    let pages = Router::new()
        .route("/history/:date", get(handlers::history_page))
        .route("/history/:date/", get(handlers::history_page))
        .route("/sitemap.xml", get(handlers::sitemap))
        .route("/robots.txt", get(handlers::robots))
        .with_state(state.clone());

    api.merge(pages)
        .fallback(handlers::endpoint_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(cors_layer(&state.config))
}

/// CORS allow-list of known frontend origins.
fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::USER_AGENT,
            HeaderName::from_static("x-timestamp"),
            HeaderName::from_static("x-signature"),
        ])
        .allow_credentials(true)
}
