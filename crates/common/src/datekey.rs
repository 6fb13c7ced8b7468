//! Canonical calendar date keys.
//!
//! Every lookup in the system is keyed by a zero-padded `MM-DD` string,
//! independent of year. [`DateKey`] canonicalizes both accepted input
//! forms, `MM-DD` for the API and `MonthName-DD` for SEO URLs, before
//! anything touches the store.

use crate::locale::{self, Locale};
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// The fixed validation pattern: month 01-12, day 01-31. Deliberately no
/// month-length or leap-year checking, so "02-30" is accepted.
const DATE_KEY_PATTERN: &str = r"^(0[1-9]|1[0-2])-(0[1-9]|[12][0-9]|3[01])$";

#[allow(clippy::expect_used)] // fixed pattern, covered by tests
static DATE_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DATE_KEY_PATTERN).expect("date-key pattern compiles"));

/// Reference year for calendar arithmetic. A leap year, so "02-29"
/// participates in prev/next navigation.
const REFERENCE_YEAR: i32 = 2024;

/// Errors from date-key parsing.
///
/// `InvalidFormat` (the API form) and `UnrecognizedDate` (the SEO form)
/// are distinct from "no data for this date", which is not an error at
/// this layer at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DateKeyError {
    /// Input did not match the `MM-DD` pattern.
    #[error("invalid date format, expected MM-DD")]
    InvalidFormat,

    /// Input was not a recognizable `MonthName-DD` pair.
    #[error("unrecognized date, expected MonthName-DD")]
    UnrecognizedDate,
}

/// A calendar day identified by month and day only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateKey {
    month: u8,
    day: u8,
}

impl DateKey {
    /// Build a key from 1-based month and day numbers.
    ///
    /// Accepts the same range the pattern does (day 1-31 regardless of
    /// month), returning `None` outside it.
    #[must_use]
    pub fn new(month: u8, day: u8) -> Option<Self> {
        if (1..=12).contains(&month) && (1..=31).contains(&day) {
            Some(Self { month, day })
        } else {
            None
        }
    }

    /// Parse the canonical `MM-DD` form.
    ///
    /// # Errors
    ///
    /// `DateKeyError::InvalidFormat` when the input does not match the
    /// fixed pattern.
    pub fn parse(input: &str) -> Result<Self, DateKeyError> {
        if !DATE_KEY_RE.is_match(input) {
            return Err(DateKeyError::InvalidFormat);
        }
        let (month, day) = input.split_once('-').ok_or(DateKeyError::InvalidFormat)?;
        let month: u8 = month.parse().map_err(|_| DateKeyError::InvalidFormat)?;
        let day: u8 = day.parse().map_err(|_| DateKeyError::InvalidFormat)?;
        Self::new(month, day).ok_or(DateKeyError::InvalidFormat)
    }

    /// Parse the SEO-friendly `MonthName-DD` form (English month name,
    /// case-insensitive, day with or without a leading zero).
    ///
    /// # Errors
    ///
    /// `DateKeyError::UnrecognizedDate` for unknown month names or
    /// non-numeric / out-of-range days.
    pub fn parse_seo(input: &str) -> Result<Self, DateKeyError> {
        let (name, day) = input.split_once('-').ok_or(DateKeyError::UnrecognizedDate)?;
        let month = locale::month_from_name(name).ok_or(DateKeyError::UnrecognizedDate)?;
        let day: u8 = day.parse().map_err(|_| DateKeyError::UnrecognizedDate)?;
        Self::new(month, day).ok_or(DateKeyError::UnrecognizedDate)
    }

    /// 1-based month number.
    #[must_use]
    pub fn month(self) -> u8 {
        self.month
    }

    /// 1-based day number.
    #[must_use]
    pub fn day(self) -> u8 {
        self.day
    }

    /// The SEO URL slug, e.g. "August-21" (day unpadded).
    #[must_use]
    pub fn seo_slug(self) -> String {
        let name = locale::month_name(Locale::EnUs, self.month).unwrap_or("January");
        format!("{}-{}", name, self.day)
    }

    /// The previous calendar day with month/year wrap-around.
    ///
    /// Returns `None` for keys like "02-30" that do not exist on the
    /// reference calendar.
    #[must_use]
    pub fn prev(self) -> Option<Self> {
        let date = self.to_reference_date()?.pred_opt()?;
        Self::from_reference_date(date)
    }

    /// The next calendar day with month/year wrap-around.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        let date = self.to_reference_date()?.succ_opt()?;
        Self::from_reference_date(date)
    }

    /// This key on the fixed reference year, if it names a real day.
    #[must_use]
    pub fn to_reference_date(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(REFERENCE_YEAR, u32::from(self.month), u32::from(self.day))
    }

    fn from_reference_date(date: NaiveDate) -> Option<Self> {
        let month = u8::try_from(date.month()).ok()?;
        let day = u8::try_from(date.day()).ok()?;
        Self::new(month, day)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}
