//! Locales and localized text.
//!
//! The site ships exactly two locales, zh-CN and en-US. Text fields in the
//! dataset are either a plain string or a per-locale mapping; every render
//! path resolves them through [`LocalizedText::resolve`] so the fallback
//! chain lives in one place.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Supported display locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    /// Simplified Chinese (the site default).
    #[default]
    ZhCn,
    /// US English.
    EnUs,
}

impl Locale {
    /// The locale tag as it appears in data and query strings.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::ZhCn => "zh-CN",
            Locale::EnUs => "en-US",
        }
    }

    /// Parse a `?lang=` query value. Anything unrecognized falls back to
    /// the default locale, matching the site's lenient handling.
    #[must_use]
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("en-US") => Locale::EnUs,
            _ => Locale::ZhCn,
        }
    }
}

/// Full month names, January-first.
const MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const MONTHS_ZH: [&str; 12] = [
    "一月",
    "二月",
    "三月",
    "四月",
    "五月",
    "六月",
    "七月",
    "八月",
    "九月",
    "十月",
    "十一月",
    "十二月",
];

/// Weekday names, Sunday-first to match `chrono`'s
/// `num_days_from_sunday` ordering.
const WEEKDAYS_ZH: [&str; 7] = [
    "星期日",
    "星期一",
    "星期二",
    "星期三",
    "星期四",
    "星期五",
    "星期六",
];

const WEEKDAYS_EN: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Full month name for a 1-based month number.
#[must_use]
pub fn month_name(locale: Locale, month: u8) -> Option<&'static str> {
    let names = match locale {
        Locale::ZhCn => &MONTHS_ZH,
        Locale::EnUs => &MONTHS_EN,
    };
    names.get(usize::from(month).checked_sub(1)?).copied()
}

/// 1-based month number for a case-insensitive English month name.
#[must_use]
pub fn month_from_name(name: &str) -> Option<u8> {
    MONTHS_EN
        .iter()
        .position(|m| m.eq_ignore_ascii_case(name))
        .and_then(|idx| u8::try_from(idx + 1).ok())
}

/// Weekday name for a Sunday-first index (0 = Sunday).
#[must_use]
pub fn weekday_name(locale: Locale, sunday_first_index: u32) -> Option<&'static str> {
    let names = match locale {
        Locale::ZhCn => &WEEKDAYS_ZH,
        Locale::EnUs => &WEEKDAYS_EN,
    };
    names.get(sunday_first_index as usize).copied()
}

/// Placeholder shown where a section has no entries.
#[must_use]
pub fn no_data_text(locale: Locale) -> &'static str {
    match locale {
        Locale::ZhCn => "暂无数据",
        Locale::EnUs => "No data available",
    }
}

/// Placeholder shown while data is being fetched.
#[must_use]
pub fn loading_text(locale: Locale) -> &'static str {
    match locale {
        Locale::ZhCn => "加载中...",
        Locale::EnUs => "Loading...",
    }
}

/// A text field that is either a plain string or localized per locale tag.
///
/// The dataset mixes both forms; `#[serde(untagged)]` accepts either
/// without a discriminator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocalizedText {
    /// A single string used for every locale.
    Plain(String),
    /// A mapping from locale tag ("zh-CN" / "en-US") to text.
    Localized(BTreeMap<String, String>),
}

impl LocalizedText {
    /// Resolve the text for a locale.
    ///
    /// Fallback chain for localized values: requested locale, then zh-CN,
    /// then en-US, then whatever variant exists, then the empty string.
    #[must_use]
    pub fn resolve(&self, locale: Locale) -> &str {
        match self {
            LocalizedText::Plain(text) => text,
            LocalizedText::Localized(map) => map
                .get(locale.as_str())
                .or_else(|| map.get(Locale::ZhCn.as_str()))
                .or_else(|| map.get(Locale::EnUs.as_str()))
                .or_else(|| map.values().next())
                .map_or("", String::as_str),
        }
    }

    /// True when no variant carries any text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            LocalizedText::Plain(text) => text.is_empty(),
            LocalizedText::Localized(map) => map.values().all(String::is_empty),
        }
    }
}

impl From<&str> for LocalizedText {
    fn from(text: &str) -> Self {
        LocalizedText::Plain(text.to_string())
    }
}
