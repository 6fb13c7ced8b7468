//! OnThisDay client core.
//!
//! The data-fetching side of the site, independent of any rendering
//! target: a TTL cache over per-date records and the fetch
//! orchestration that fills it: public endpoints first, the
//! token-authenticated endpoint as a fallback, stale data as a last
//! resort. UI adapters call [`HistoryClient::get_data_for_date`] and
//! always get a record back; network failure never surfaces past this
//! layer.

#![warn(clippy::pedantic)]

/// Module for the TTL cache over fetched records
pub mod cache;

/// Module for the fetch orchestration client
pub mod client;

pub use cache::{CacheEntry, DataCache, DEFAULT_CACHE_TTL};
pub use client::{ClientError, HistoryClient};
