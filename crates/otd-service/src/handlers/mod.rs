//! HTTP request handlers.

pub mod health;
pub mod history;
pub mod og_image;
pub mod pages;
pub mod public;
pub mod seo;
pub mod token;

pub use health::health_check;
pub use history::{batch_history, get_history};
pub use og_image::og_image;
pub use pages::history_page;
pub use public::{public_history, today};
pub use seo::{endpoint_not_found, robots, sitemap};
pub use token::issue_token;

use chrono::{DateTime, SecondsFormat, Utc};
use common::clock::Clock;
use serde::Deserialize;

/// The `?lang=` query accepted by the localized endpoints.
#[derive(Debug, Deserialize)]
pub struct LangQuery {
    pub lang: Option<String>,
}

/// ISO-8601 timestamp string from the injected clock, matching the
/// wire format the frontend expects ("2024-08-24T12:00:00.000Z").
pub(crate) fn iso_timestamp(clock: &dyn Clock) -> String {
    DateTime::<Utc>::from_timestamp_millis(clock.now_millis())
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use common::clock::ManualClock;

    #[test]
    fn iso_timestamp_renders_utc_millis() {
        let clock = ManualClock::at_unix(1_724_500_000);
        assert_eq!(iso_timestamp(&clock), "2024-08-24T11:46:40.000Z");
    }
}
