//! OnThisDay HTTP Service Library
//!
//! Serves bilingual "today in history" data (events, birthdays and
//! deaths keyed by calendar date) over a small read-only JSON API, plus
//! server-rendered per-date HTML pages and the sitemap/robots endpoints
//! search engines expect.
//!
//! # Modules
//!
//! - `config` - Service configuration
//! - `errors` - Error types
//! - `handlers` - HTTP request handlers
//! - `middleware` - Token auth, request signing, per-IP rate limiting
//! - `models` - Response envelope types
//! - `render` - Server-side HTML template rendering
//! - `routes` - Router assembly and application state
//! - `store` - The immutable date-keyed data store

pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod render;
pub mod routes;
pub mod store;
