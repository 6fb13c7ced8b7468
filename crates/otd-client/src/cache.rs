//! Time-bounded cache of fetched records.
//!
//! A plain map from canonical date key to the record and its fetch
//! time. Entries are invalidated lazily on read; there is no eviction
//! sweep. Stale entries are kept around deliberately: when every
//! endpoint fails they are better than nothing.

use common::clock::Clock;
use common::record::HistoryRecord;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// How long a cached record counts as fresh (5 minutes).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// One cached response.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The fetched record.
    pub record: HistoryRecord,

    /// When it was fetched, Unix milliseconds.
    pub fetched_at_millis: i64,
}

/// Map from canonical date key to cached entry, with an injected TTL
/// and clock.
pub struct DataCache {
    entries: HashMap<String, CacheEntry>,
    ttl_millis: i64,
    clock: Arc<dyn Clock>,
}

impl DataCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            ttl_millis: i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX),
            clock,
        }
    }

    /// The cached record for `key` if it is younger than the TTL.
    #[must_use]
    pub fn get_fresh(&self, key: &str) -> Option<HistoryRecord> {
        let entry = self.entries.get(key)?;
        let age = self.clock.now_millis() - entry.fetched_at_millis;
        (age < self.ttl_millis).then(|| entry.record.clone())
    }

    /// The cached record for `key` regardless of age.
    #[must_use]
    pub fn get_stale(&self, key: &str) -> Option<HistoryRecord> {
        self.entries.get(key).map(|entry| entry.record.clone())
    }

    /// Store a freshly fetched record.
    pub fn insert(&mut self, key: String, record: HistoryRecord) {
        self.entries.insert(
            key,
            CacheEntry {
                record,
                fetched_at_millis: self.clock.now_millis(),
            },
        );
    }

    /// Number of cached entries, fresh or stale.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
