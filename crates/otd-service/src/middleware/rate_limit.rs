//! Fixed-window per-IP rate limiting for the API routes.
//!
//! Each peer address gets a counter that resets when its window
//! elapses; requests beyond the per-window maximum are rejected with
//! 429 and a retry hint. Windows reset lazily on the next request;
//! there is no background sweep.

use crate::errors::OtdError;
use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::IntoResponse,
};
use common::clock::Clock;
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::instrument;

struct Bucket {
    window_start_millis: i64,
    count: u32,
}

/// Fixed-window request counter keyed by peer IP.
pub struct RateLimiter {
    max_requests: u32,
    window_millis: i64,
    clock: Arc<dyn Clock>,
    buckets: Mutex<HashMap<IpAddr, Bucket>>,
}

impl RateLimiter {
    /// Create a limiter allowing `max_requests` per `window` per IP.
    #[must_use]
    pub fn new(max_requests: u32, window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            max_requests,
            window_millis: i64::try_from(window.as_millis()).unwrap_or(i64::MAX),
            clock,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Count a request from `ip`.
    ///
    /// # Errors
    ///
    /// `OtdError::RateLimitExceeded` once the window's budget is spent.
    pub fn check(&self, ip: IpAddr) -> Result<(), OtdError> {
        let now = self.clock.now_millis();
        let mut buckets = self
            .buckets
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let bucket = buckets.entry(ip).or_insert(Bucket {
            window_start_millis: now,
            count: 0,
        });

        if now - bucket.window_start_millis >= self.window_millis {
            bucket.window_start_millis = now;
            bucket.count = 0;
        }

        if bucket.count >= self.max_requests {
            tracing::warn!(target: "otd.middleware.rate_limit", %ip, "Rate limit exceeded");
            return Err(OtdError::RateLimitExceeded);
        }

        bucket.count += 1;
        Ok(())
    }
}

/// Rate-limiting middleware over the API routes.
///
/// The peer address comes from the `ConnectInfo` extension; requests
/// without one (a misconfigured serve loop) pass through unlimited
/// rather than failing closed.
#[instrument(skip_all, name = "otd.middleware.rate_limit")]
pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request,
    next: Next,
) -> Result<impl IntoResponse, OtdError> {
    let Some(ip) = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip())
    else {
        tracing::debug!(target: "otd.middleware.rate_limit", "No peer address, skipping");
        return Ok(next.run(req).await);
    };

    limiter.check(ip)?;
    Ok(next.run(req).await)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use common::clock::ManualClock;

    fn limiter(max: u32, window_secs: u64) -> (Arc<ManualClock>, RateLimiter) {
        let clock = Arc::new(ManualClock::at_unix(1_700_000_000));
        let limiter = RateLimiter::new(
            max,
            Duration::from_secs(window_secs),
            Arc::clone(&clock) as Arc<dyn Clock>,
        );
        (clock, limiter)
    }

    fn ip(last: u8) -> IpAddr {
        IpAddr::from([127, 0, 0, last])
    }

    #[test]
    fn allows_up_to_the_maximum() {
        let (_clock, limiter) = limiter(10, 60);
        for _ in 0..10 {
            assert!(limiter.check(ip(1)).is_ok());
        }
        assert!(matches!(
            limiter.check(ip(1)),
            Err(OtdError::RateLimitExceeded)
        ));
    }

    #[test]
    fn window_resets_after_elapsing() {
        let (clock, limiter) = limiter(2, 60);
        assert!(limiter.check(ip(1)).is_ok());
        assert!(limiter.check(ip(1)).is_ok());
        assert!(limiter.check(ip(1)).is_err());

        clock.advance(Duration::from_secs(60));
        assert!(limiter.check(ip(1)).is_ok());
    }

    #[test]
    fn budget_is_per_ip() {
        let (_clock, limiter) = limiter(1, 60);
        assert!(limiter.check(ip(1)).is_ok());
        assert!(limiter.check(ip(2)).is_ok());
        assert!(limiter.check(ip(1)).is_err());
        assert!(limiter.check(ip(2)).is_err());
    }

    #[test]
    fn partial_window_does_not_reset() {
        let (clock, limiter) = limiter(1, 60);
        assert!(limiter.check(ip(1)).is_ok());
        clock.advance(Duration::from_secs(59));
        assert!(limiter.check(ip(1)).is_err());
    }
}
