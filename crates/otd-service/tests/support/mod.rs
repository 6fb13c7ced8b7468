//! Shared test harness: application state over the embedded dataset
//! with a pinned manual clock.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use common::clock::{Clock, ManualClock};
use http_body_util::BodyExt;
use otd_service::config::Config;
use otd_service::routes::{self, AppState};
use otd_service::store::HistoryStore;
use std::collections::HashMap;
use std::sync::Arc;

/// 2024-08-24T11:46:40Z, a date the embedded dataset covers.
pub const TEST_UNIX: i64 = 1_724_500_000;

/// The shared secret of the default test config.
pub fn api_secret() -> String {
    Config::from_vars(&HashMap::new())
        .expect("default config loads")
        .api_secret
}

/// Application state with a manual clock pinned at [`TEST_UNIX`].
pub fn test_state() -> (Arc<ManualClock>, Arc<AppState>) {
    test_state_with_vars(&HashMap::new())
}

/// Same, with config overrides.
pub fn test_state_with_vars(vars: &HashMap<String, String>) -> (Arc<ManualClock>, Arc<AppState>) {
    let clock = Arc::new(ManualClock::at_unix(TEST_UNIX));
    let config = Config::from_vars(vars).expect("test config loads");
    let store = HistoryStore::load_embedded().expect("embedded dataset loads");

    let state = Arc::new(AppState {
        store: Arc::new(store),
        config,
        clock: Arc::clone(&clock) as Arc<dyn Clock>,
    });

    (clock, state)
}

/// Router over the default test state.
pub fn test_app() -> Router {
    let (_clock, state) = test_state();
    routes::build_routes(state)
}

/// A GET request with optional bearer token.
pub fn get_request(uri: &str, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request builds")
}

/// A freshly issued, valid token for the default test secret.
pub fn fresh_token(clock: &ManualClock) -> String {
    common::token::issue(&api_secret(), clock.now_unix()).to_string()
}

/// Read a response body as JSON.
pub async fn response_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is JSON")
}

/// Read a response body as text.
pub async fn response_text(response: Response) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("body is UTF-8")
}
