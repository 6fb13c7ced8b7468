//! OnThisDay service error types.
//!
//! All errors map to appropriate HTTP status codes via the `IntoResponse`
//! impl. Error messages returned to clients are intentionally generic to
//! avoid leaking internal details. Actual errors are logged server-side.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Seconds clients should wait after hitting the rate limit.
const RATE_LIMIT_RETRY_AFTER_SECS: u64 = 60;

/// OnThisDay service error type.
///
/// Maps to appropriate HTTP status codes:
/// - BadRequest: 400 Bad Request
/// - TokenRequired, TokenExpired, InvalidSignature: 401 Unauthorized
/// - InvalidToken: 403 Forbidden
/// - NotFound: 404 Not Found
/// - RateLimitExceeded: 429 Too Many Requests (with a retry hint)
/// - Internal: 500 Internal Server Error
#[derive(Debug, Error)]
pub enum OtdError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Authentication token required")]
    TokenRequired,

    #[error("Authentication token expired")]
    TokenExpired,

    #[error("Invalid authentication token")]
    InvalidToken,

    #[error("Invalid request signature: {0}")]
    InvalidSignature(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Internal server error")]
    Internal,
}

impl OtdError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            OtdError::BadRequest(_) => 400,
            OtdError::TokenRequired | OtdError::TokenExpired | OtdError::InvalidSignature(_) => 401,
            OtdError::InvalidToken => 403,
            OtdError::NotFound(_) => 404,
            OtdError::RateLimitExceeded => 429,
            OtdError::Internal => 500,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
    #[serde(rename = "retryAfter", skip_serializing_if = "Option::is_none")]
    retry_after: Option<u64>,
}

impl IntoResponse for OtdError {
    fn into_response(self) -> Response {
        let (status, code, message, retry_after) = match &self {
            OtdError::BadRequest(reason) => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                reason.clone(),
                None,
            ),
            OtdError::TokenRequired => (
                StatusCode::UNAUTHORIZED,
                "TOKEN_REQUIRED",
                "Authentication token required".to_string(),
                None,
            ),
            OtdError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "TOKEN_EXPIRED",
                "Authentication token expired".to_string(),
                None,
            ),
            OtdError::InvalidToken => (
                StatusCode::FORBIDDEN,
                "INVALID_TOKEN",
                "Invalid authentication token".to_string(),
                None,
            ),
            OtdError::InvalidSignature(reason) => (
                StatusCode::UNAUTHORIZED,
                "INVALID_SIGNATURE",
                reason.clone(),
                None,
            ),
            OtdError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                resource.clone(),
                None,
            ),
            OtdError::RateLimitExceeded => (
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMIT_EXCEEDED",
                "Too many requests, please try again later".to_string(),
                Some(RATE_LIMIT_RETRY_AFTER_SECS),
            ),
            OtdError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal server error, please try again later".to_string(),
                None,
            ),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                retry_after,
            },
        };

        let mut response = (status, Json(error_response)).into_response();

        // Advertise the bearer scheme on 401 responses
        if status == StatusCode::UNAUTHORIZED {
            if let Ok(header_value) =
                "Bearer realm=\"onthisday-api\", error=\"invalid_token\"".parse()
            {
                response
                    .headers_mut()
                    .insert("WWW-Authenticate", header_value);
            }
        }

        response
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http_body_util::BodyExt;

    async fn read_body_json(body: Body) -> serde_json::Value {
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_display_bad_request() {
        let error = OtdError::BadRequest("bad date".to_string());
        assert_eq!(format!("{}", error), "Bad request: bad date");
    }

    #[test]
    fn test_display_not_found() {
        let error = OtdError::NotFound("no data".to_string());
        assert_eq!(format!("{}", error), "Not found: no data");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(OtdError::BadRequest("x".to_string()).status_code(), 400);
        assert_eq!(OtdError::TokenRequired.status_code(), 401);
        assert_eq!(OtdError::TokenExpired.status_code(), 401);
        assert_eq!(OtdError::InvalidToken.status_code(), 403);
        assert_eq!(OtdError::InvalidSignature("x".to_string()).status_code(), 401);
        assert_eq!(OtdError::NotFound("x".to_string()).status_code(), 404);
        assert_eq!(OtdError::RateLimitExceeded.status_code(), 429);
        assert_eq!(OtdError::Internal.status_code(), 500);
    }

    #[tokio::test]
    async fn test_into_response_bad_request() {
        let error = OtdError::BadRequest("Invalid date format. Use MM-DD format".to_string());
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_json = read_body_json(response.into_body()).await;
        assert_eq!(body_json["error"]["code"], "BAD_REQUEST");
        assert_eq!(
            body_json["error"]["message"],
            "Invalid date format. Use MM-DD format"
        );
    }

    #[tokio::test]
    async fn test_into_response_token_required_has_www_authenticate() {
        let response = OtdError::TokenRequired.into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let www_auth = response.headers().get("WWW-Authenticate");
        assert!(www_auth.is_some());
        assert!(www_auth
            .unwrap()
            .to_str()
            .unwrap()
            .contains("Bearer realm=\"onthisday-api\""));

        let body_json = read_body_json(response.into_body()).await;
        assert_eq!(body_json["error"]["code"], "TOKEN_REQUIRED");
    }

    #[tokio::test]
    async fn test_into_response_invalid_token_is_403() {
        let response = OtdError::InvalidToken.into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body_json = read_body_json(response.into_body()).await;
        assert_eq!(body_json["error"]["code"], "INVALID_TOKEN");
        assert_eq!(body_json["error"]["message"], "Invalid authentication token");
    }

    #[tokio::test]
    async fn test_into_response_rate_limit_carries_retry_hint() {
        let response = OtdError::RateLimitExceeded.into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        let body_json = read_body_json(response.into_body()).await;
        assert_eq!(body_json["error"]["code"], "RATE_LIMIT_EXCEEDED");
        assert_eq!(body_json["error"]["retryAfter"], 60);
    }

    #[tokio::test]
    async fn test_into_response_internal_is_generic() {
        let response = OtdError::Internal.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body_json = read_body_json(response.into_body()).await;
        assert_eq!(body_json["error"]["code"], "INTERNAL_ERROR");
        // retryAfter omitted when not a rate-limit error
        assert!(body_json["error"].get("retryAfter").is_none());
    }
}
