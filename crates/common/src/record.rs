//! The events/birthdays/deaths record types.
//!
//! One [`HistoryRecord`] per date key. Records are static content loaded
//! at process start and never mutated.

use crate::locale::LocalizedText;
use serde::{Deserialize, Serialize};

/// A historical event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Year the event happened, kept as text ("1969", "44 BC").
    pub year: String,

    /// What happened, plain or localized.
    pub description: LocalizedText,

    /// Illustration URL; absent entries render without an image block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A notable person, used for both birthdays and deaths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Name, plain or localized.
    pub name: LocalizedText,

    /// Life span as text ("1879-1955", "1946-").
    pub years: String,

    /// Short biography, plain or localized.
    pub description: LocalizedText,

    /// Portrait URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Everything known about one calendar day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Historical events, store order.
    #[serde(default)]
    pub events: Vec<Event>,

    /// People born on this day.
    #[serde(default)]
    pub birthdays: Vec<Person>,

    /// People who died on this day.
    #[serde(default)]
    pub deaths: Vec<Person>,
}

/// Per-section entry counts, reported alongside the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Number of events.
    pub events: usize,
    /// Number of birthday entries.
    pub birthdays: usize,
    /// Number of death entries.
    pub deaths: usize,
}

impl HistoryRecord {
    /// The well-formed empty record returned for absent dates.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when no section has entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.birthdays.is_empty() && self.deaths.is_empty()
    }

    /// Entry counts for the response envelope.
    #[must_use]
    pub fn totals(&self) -> Totals {
        Totals {
            events: self.events.len(),
            birthdays: self.birthdays.len(),
            deaths: self.deaths.len(),
        }
    }
}
