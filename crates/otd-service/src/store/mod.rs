//! The immutable date-keyed data store.
//!
//! Loaded once at process start, from `OTD_DATA_PATH` when configured
//! and the dataset embedded in the binary otherwise, then shared
//! read-only behind an `Arc` for the lifetime of the process. Concurrent
//! reads from in-flight requests need no locking.

use common::datekey::DateKey;
use common::record::HistoryRecord;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{info, warn};

/// Dataset compiled into the binary; used when no path is configured.
const EMBEDDED_DATA: &str = include_str!("../../assets/history_data.json");

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read dataset from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),
}

/// In-memory mapping from date key to its record.
#[derive(Debug)]
pub struct HistoryStore {
    records: HashMap<DateKey, HistoryRecord>,
}

impl HistoryStore {
    /// Load the dataset embedded in the binary.
    ///
    /// # Errors
    ///
    /// `StoreError::Parse` if the embedded JSON is not a valid dataset.
    pub fn load_embedded() -> Result<Self, StoreError> {
        Self::from_json(EMBEDDED_DATA)
    }

    /// Load a dataset from a JSON file on disk.
    ///
    /// # Errors
    ///
    /// `StoreError::Io` when the file cannot be read, `StoreError::Parse`
    /// when it is not a valid dataset.
    pub fn load_from_path(path: &str) -> Result<Self, StoreError> {
        let raw = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Parse a dataset from a JSON string.
    ///
    /// Entries whose key does not canonicalize to `MM-DD` are skipped
    /// with a warning rather than failing the whole load.
    ///
    /// # Errors
    ///
    /// `StoreError::Parse` when the JSON itself is malformed.
    pub fn from_json(raw: &str) -> Result<Self, StoreError> {
        let parsed: HashMap<String, HistoryRecord> = serde_json::from_str(raw)?;

        let mut records = HashMap::with_capacity(parsed.len());
        for (key, record) in parsed {
            match DateKey::parse(&key) {
                Ok(date_key) => {
                    records.insert(date_key, record);
                }
                Err(err) => {
                    warn!(
                        target: "otd.store",
                        key = %key,
                        error = %err,
                        "Skipping dataset entry with invalid date key"
                    );
                }
            }
        }

        info!(target: "otd.store", dates = records.len(), "History dataset loaded");
        Ok(Self { records })
    }

    /// Record for a date key, if the dataset has one.
    #[must_use]
    pub fn get(&self, key: &DateKey) -> Option<&HistoryRecord> {
        self.records.get(key)
    }

    /// Record for a date key, or the well-formed empty record.
    #[must_use]
    pub fn record_or_empty(&self, key: &DateKey) -> HistoryRecord {
        self.records.get(key).cloned().unwrap_or_default()
    }

    /// All known date keys in calendar order (for the sitemap).
    #[must_use]
    pub fn date_keys(&self) -> Vec<DateKey> {
        let mut keys: Vec<DateKey> = self.records.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    /// Number of dates with data.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the dataset is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use common::locale::Locale;

    #[test]
    fn embedded_dataset_loads() {
        let store = HistoryStore::load_embedded().unwrap();
        assert!(!store.is_empty());

        // The canonical sample date is present with all three sections
        let key = DateKey::parse("08-24").unwrap();
        let record = store.get(&key).unwrap();
        assert!(!record.events.is_empty());
        assert!(!record.birthdays.is_empty());
        assert!(!record.deaths.is_empty());
    }

    #[test]
    fn stored_content_round_trips_exactly() {
        let raw = r#"{
            "08-20": {
                "events": [{"year": "1977", "description": "Voyager 2 launches"}],
                "birthdays": [],
                "deaths": []
            }
        }"#;
        let store = HistoryStore::from_json(raw).unwrap();
        let key = DateKey::parse("08-20").unwrap();

        let record = store.get(&key).unwrap();
        assert_eq!(record.events.len(), 1);
        let event = record.events.first().unwrap();
        assert_eq!(event.year, "1977");
        assert_eq!(event.description.resolve(Locale::EnUs), "Voyager 2 launches");
    }

    #[test]
    fn absent_key_yields_empty_record_not_error() {
        let store = HistoryStore::from_json("{}").unwrap();
        let key = DateKey::parse("02-30").unwrap();

        assert!(store.get(&key).is_none());
        let record = store.record_or_empty(&key);
        assert!(record.is_empty());
        assert_eq!(record.totals().events, 0);
    }

    #[test]
    fn invalid_keys_are_skipped_not_fatal() {
        let raw = r#"{
            "08-20": {"events": [], "birthdays": [], "deaths": []},
            "not-a-date": {"events": [], "birthdays": [], "deaths": []}
        }"#;
        let store = HistoryStore::from_json(raw).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let result = HistoryStore::from_json("not json");
        assert!(matches!(result, Err(StoreError::Parse(_))));
    }

    #[test]
    fn date_keys_are_sorted() {
        let store = HistoryStore::load_embedded().unwrap();
        let keys = store.date_keys();
        let rendered: Vec<String> = keys.iter().map(ToString::to_string).collect();
        let mut sorted = rendered.clone();
        sorted.sort();
        assert_eq!(rendered, sorted);
    }
}
