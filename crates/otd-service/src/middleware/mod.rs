//! Request middleware: token authentication, optional request signing
//! and per-IP rate limiting.

pub mod auth;
pub mod rate_limit;
pub mod signature;

pub use auth::require_token;
pub use rate_limit::{rate_limit, RateLimiter};
pub use signature::verify_signature;
