//! Common utilities and types shared across OnThisDay components.

#![warn(clippy::pedantic)]

/// Module for clock abstraction (system and test clocks)
pub mod clock;

/// Module for canonical calendar date keys
pub mod datekey;

/// Module for locales, localized text and display names
pub mod locale;

/// Module for the events/birthdays/deaths record types
pub mod record;

/// Module for the rolling-hash access token scheme
pub mod token;
