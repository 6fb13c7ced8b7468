//! Integration tests for the token-gated history endpoints.
//!
//! Covers `GET /api/history/{MM-DD}` and `POST /api/history/batch`:
//! authentication outcomes (missing/expired/invalid token), date
//! validation, not-found semantics and the batch constraints.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod support;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::time::Duration;
use support::{fresh_token, get_request, response_json, test_app, test_state};
use tower::util::ServiceExt;

#[tokio::test]
async fn history_with_valid_token_returns_record() {
    let (clock, state) = test_state();
    let app = otd_service::routes::build_routes(state);
    let token = fresh_token(&clock);

    let response = app
        .oneshot(get_request("/api/history/08-24", Some(token.as_str())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("cache-control")
            .and_then(|v| v.to_str().ok()),
        Some("public, max-age=3600")
    );

    let body = response_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["date"], "08-24");
    assert!(body["data"]["events"].as_array().unwrap().len() > 0);
    assert_eq!(
        body["total"]["events"],
        body["data"]["events"].as_array().unwrap().len()
    );
}

#[tokio::test]
async fn history_accepts_query_token() {
    let (clock, state) = test_state();
    let app = otd_service::routes::build_routes(state);
    let token = fresh_token(&clock);

    let response = app
        .oneshot(get_request(
            &format!("/api/history/08-24?token={token}"),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn history_without_token_is_401() {
    let response = test_app()
        .oneshot(get_request("/api/history/08-24", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get("www-authenticate").is_some());

    let body = response_json(response).await;
    assert_eq!(body["error"]["code"], "TOKEN_REQUIRED");
}

#[tokio::test]
async fn history_with_garbage_token_is_403() {
    let response = test_app()
        .oneshot(get_request("/api/history/08-24", Some("123.bogus")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = response_json(response).await;
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn history_with_expired_token_is_401() {
    let (clock, state) = test_state();
    let app = otd_service::routes::build_routes(state);

    let token = fresh_token(&clock);
    // One second past the 5-minute window
    clock.advance(Duration::from_secs(301));

    let response = app
        .oneshot(get_request("/api/history/08-24", Some(token.as_str())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = response_json(response).await;
    assert_eq!(body["error"]["code"], "TOKEN_EXPIRED");
}

#[tokio::test]
async fn history_token_still_valid_at_window_boundary() {
    let (clock, state) = test_state();
    let app = otd_service::routes::build_routes(state);

    let token = fresh_token(&clock);
    clock.advance(Duration::from_secs(300));

    let response = app
        .oneshot(get_request("/api/history/08-24", Some(token.as_str())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn history_bad_date_format_is_400() {
    let (clock, state) = test_state();
    let app = otd_service::routes::build_routes(state);
    let token = fresh_token(&clock);

    for bad in ["13-01", "AB-01", "8-20", "0820"] {
        let response = app
            .clone()
            .oneshot(get_request(&format!("/api/history/{bad}"), Some(token.as_str())))
            .await
            .unwrap();

        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "date {bad:?} should be a 400"
        );
        let body = response_json(response).await;
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }
}

#[tokio::test]
async fn history_february_30_is_valid_but_absent() {
    // "02-30" passes the pattern (known gap) but no dataset carries it
    let (clock, state) = test_state();
    let app = otd_service::routes::build_routes(state);
    let token = fresh_token(&clock);

    let response = app
        .oneshot(get_request("/api/history/02-30", Some(token.as_str())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = response_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

fn batch_request(token: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/history/batch")
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn batch_mixed_dates_reports_requested_and_found() {
    let (clock, state) = test_state();
    let app = otd_service::routes::build_routes(state);
    let token = fresh_token(&clock);

    let response = app
        .oneshot(batch_request(
            &token,
            serde_json::json!({"dates": ["08-20", "99-99"]}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["requested"], 2);
    assert_eq!(body["found"], 1);
    assert!(body["data"]["08-20"].is_object());
    assert!(body["data"].get("99-99").is_none());
}

#[tokio::test]
async fn batch_of_eight_dates_is_400() {
    let (clock, state) = test_state();
    let app = otd_service::routes::build_routes(state);
    let token = fresh_token(&clock);

    let dates: Vec<String> = (1..=8).map(|d| format!("01-{d:02}")).collect();
    let response = app
        .oneshot(batch_request(&token, serde_json::json!({"dates": dates})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn batch_empty_list_is_400() {
    let (clock, state) = test_state();
    let app = otd_service::routes::build_routes(state);
    let token = fresh_token(&clock);

    let response = app
        .oneshot(batch_request(&token, serde_json::json!({"dates": []})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn batch_malformed_body_is_400_not_422() {
    let (clock, state) = test_state();
    let app = otd_service::routes::build_routes(state);
    let token = fresh_token(&clock);

    let request = Request::builder()
        .method("POST")
        .uri("/api/history/batch")
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", "application/json")
        .body(Body::from("not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn batch_without_token_is_401() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/history/batch")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"dates": ["08-20"]}"#))
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
