//! Clock abstraction.
//!
//! Token issuance, the client cache and the today endpoint all depend on
//! wall-clock time. Owning components receive a [`Clock`] by reference
//! instead of calling time APIs directly, so tests can pin and advance
//! time deterministically.

use chrono::Utc;

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current Unix timestamp in whole seconds.
    fn now_unix(&self) -> i64;

    /// Current Unix timestamp in milliseconds.
    fn now_millis(&self) -> i64;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> i64 {
        Utc::now().timestamp()
    }

    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

#[cfg(any(test, feature = "test-utils"))]
mod manual {
    use super::Clock;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::time::Duration;

    /// Test clock that only moves when told to.
    #[derive(Debug, Default)]
    pub struct ManualClock {
        millis: AtomicI64,
    }

    impl ManualClock {
        /// Create a clock pinned at the given Unix timestamp (seconds).
        #[must_use]
        pub fn at_unix(secs: i64) -> Self {
            Self {
                millis: AtomicI64::new(secs * 1000),
            }
        }

        /// Advance the clock by `delta`.
        pub fn advance(&self, delta: Duration) {
            self.millis
                .fetch_add(i64::try_from(delta.as_millis()).unwrap_or(i64::MAX), Ordering::SeqCst);
        }

        /// Pin the clock to the given Unix timestamp (seconds).
        pub fn set_unix(&self, secs: i64) {
            self.millis.store(secs * 1000, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now_unix(&self) -> i64 {
            self.millis.load(Ordering::SeqCst) / 1000
        }

        fn now_millis(&self) -> i64 {
            self.millis.load(Ordering::SeqCst)
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub use manual::ManualClock;
