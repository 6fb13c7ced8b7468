//! Fetch orchestration over the OnThisDay endpoints.
//!
//! For each requested date the client tries, in order: the cache, the
//! today endpoint (only when the requested date is the client's current
//! date and the client is on the home page), the public per-date
//! endpoint, then the token-authenticated endpoint with a freshly
//! issued rolling token. Whatever succeeds first is cached. When
//! everything fails the caller still gets a record: stale cache if one
//! exists, the empty shape otherwise.
//!
//! # Security
//!
//! - Timeouts prevent hanging connections
//! - Failures are logged and degrade silently; no error crosses this API

use crate::cache::{DataCache, DEFAULT_CACHE_TTL};
use common::clock::{Clock, SystemClock};
use common::datekey::DateKey;
use common::record::HistoryRecord;
use common::token;
use serde::Deserialize;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Total request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Connect timeout in seconds.
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Delay before adjacent dates are prefetched.
const DEFAULT_PRELOAD_DELAY: Duration = Duration::from_secs(1);

/// Errors building the client. Fetching itself never errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Response envelope common to the data endpoints.
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    success: bool,
    #[serde(default)]
    data: Option<HistoryRecord>,
}

/// Data-fetching client with a TTL cache.
pub struct HistoryClient {
    http: reqwest::Client,
    base_url: String,
    api_secret: String,
    cache: Mutex<DataCache>,
    clock: Arc<dyn Clock>,
    on_home_page: bool,
    preload_delay: Duration,
}

impl HistoryClient {
    /// Create a client against `base_url` with the system clock.
    ///
    /// # Errors
    ///
    /// `ClientError::Http` if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Result<Self, ClientError> {
        Self::with_clock(base_url, api_secret, Arc::new(SystemClock))
    }

    /// Create a client with an injected clock (tests pin time here).
    ///
    /// # Errors
    ///
    /// `ClientError::Http` if the HTTP client cannot be built.
    pub fn with_clock(
        base_url: impl Into<String>,
        api_secret: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;

        let base_url = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();

        Ok(Self {
            http,
            base_url,
            api_secret: api_secret.into(),
            cache: Mutex::new(DataCache::new(DEFAULT_CACHE_TTL, Arc::clone(&clock))),
            clock,
            on_home_page: false,
            preload_delay: DEFAULT_PRELOAD_DELAY,
        })
    }

    /// Mark whether the client is serving the home page; only there does
    /// the today endpoint participate in the fallback chain.
    #[must_use]
    pub fn on_home_page(mut self, on_home_page: bool) -> Self {
        self.on_home_page = on_home_page;
        self
    }

    /// Replace the cache TTL (default 5 minutes).
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache = Mutex::new(DataCache::new(ttl, Arc::clone(&self.clock)));
        self
    }

    /// Replace the preload delay (default 1 second).
    #[must_use]
    pub fn with_preload_delay(mut self, delay: Duration) -> Self {
        self.preload_delay = delay;
        self
    }

    /// Fetch the record for a date. Infallible: some record always
    /// comes back, possibly stale or empty.
    #[instrument(skip(self), name = "otd.client.get_data_for_date")]
    pub async fn get_data_for_date(&self, month: u8, day: u8) -> HistoryRecord {
        let Some(key) = DateKey::new(month, day) else {
            debug!(target: "otd.client", month, day, "Not a date key");
            return HistoryRecord::empty();
        };
        let cache_key = key.to_string();

        if let Some(record) = self.lock_cache().get_fresh(&cache_key) {
            return record;
        }

        if self.on_home_page && Some(key) == self.today_key() {
            if let Some(record) = self.fetch_today().await {
                return self.store(cache_key, record);
            }
        }

        if let Some(record) = self.fetch_public(key).await {
            return self.store(cache_key, record);
        }

        if let Some(record) = self.fetch_authenticated(key).await {
            return self.store(cache_key, record);
        }

        warn!(target: "otd.client", date = %key, "Every endpoint failed, degrading");
        self.lock_cache()
            .get_stale(&cache_key)
            .unwrap_or_else(HistoryRecord::empty)
    }

    /// Prefetch the previous and next calendar day after a fixed delay,
    /// so neighboring navigation hits the cache.
    ///
    /// Returns the spawned task handle; callers may drop it.
    pub fn preload_adjacent_dates(
        self: &Arc<Self>,
        month: u8,
        day: u8,
    ) -> tokio::task::JoinHandle<()> {
        let client = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(client.preload_delay).await;

            let Some(key) = DateKey::new(month, day) else {
                return;
            };
            if let Some(prev) = key.prev() {
                let _ = client.get_data_for_date(prev.month(), prev.day()).await;
            }
            if let Some(next) = key.next() {
                let _ = client.get_data_for_date(next.month(), next.day()).await;
            }
        })
    }

    /// The client's current UTC date.
    fn today_key(&self) -> Option<DateKey> {
        use chrono::{DateTime, Datelike, Utc};
        let now = DateTime::<Utc>::from_timestamp(self.clock.now_unix(), 0)?;
        let month = u8::try_from(now.month()).ok()?;
        let day = u8::try_from(now.day()).ok()?;
        DateKey::new(month, day)
    }

    async fn fetch_today(&self) -> Option<HistoryRecord> {
        let url = format!("{}/api/today", self.base_url);
        self.fetch_envelope(self.http.get(&url), "today").await
    }

    async fn fetch_public(&self, key: DateKey) -> Option<HistoryRecord> {
        let url = format!("{}/api/public-history/{}", self.base_url, key.seo_slug());
        self.fetch_envelope(self.http.get(&url), "public-history")
            .await
    }

    async fn fetch_authenticated(&self, key: DateKey) -> Option<HistoryRecord> {
        let token = token::issue(&self.api_secret, self.clock.now_unix());
        let url = format!("{}/api/history/{key}", self.base_url);
        let request = self
            .http
            .get(&url)
            .header("Authorization", format!("Bearer {token}"));
        self.fetch_envelope(request, "history").await
    }

    /// Run one request in the fallback chain. Any failure (transport,
    /// timeout, non-2xx, bad body) is logged and mapped to `None`.
    async fn fetch_envelope(
        &self,
        request: reqwest::RequestBuilder,
        endpoint: &'static str,
    ) -> Option<HistoryRecord> {
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                debug!(target: "otd.client", endpoint, error = %e, "Request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            debug!(
                target: "otd.client",
                endpoint,
                status = %response.status(),
                "Non-success response"
            );
            return None;
        }

        match response.json::<ApiEnvelope>().await {
            Ok(envelope) if envelope.success => envelope.data,
            Ok(_) => {
                debug!(target: "otd.client", endpoint, "Unsuccessful envelope");
                None
            }
            Err(e) => {
                debug!(target: "otd.client", endpoint, error = %e, "Undecodable body");
                None
            }
        }
    }

    fn store(&self, cache_key: String, record: HistoryRecord) -> HistoryRecord {
        self.lock_cache().insert(cache_key, record.clone());
        record
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, DataCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use common::clock::ManualClock;

    #[test]
    fn invalid_date_yields_empty_without_io() {
        let client = HistoryClient::new("http://localhost:0", "secret").unwrap();
        let record = tokio_test_block_on(client.get_data_for_date(13, 40));
        assert!(record.is_empty());
    }

    // Minimal block_on so this stays a plain #[test]; network paths are
    // covered by the wiremock integration tests.
    fn tokio_test_block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(future)
    }

    #[test]
    fn today_key_follows_the_injected_clock() {
        let clock = Arc::new(ManualClock::at_unix(1_724_500_000)); // 2024-08-24
        let client = HistoryClient::with_clock(
            "http://localhost:0",
            "secret",
            Arc::clone(&clock) as Arc<dyn Clock>,
        )
        .unwrap();

        assert_eq!(client.today_key().map(|k| k.to_string()), Some("08-24".to_string()));
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = HistoryClient::new("http://localhost:0/", "secret").unwrap();
        assert_eq!(client.base_url, "http://localhost:0");
    }
}
