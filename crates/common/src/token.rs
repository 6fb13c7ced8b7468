//! The rolling-hash access token scheme.
//!
//! A token is `"{timestamp}.{hash}"` where the hash is a non-cryptographic
//! rolling hash of the timestamp concatenated with a shared secret,
//! rendered in lowercase base-36. The server and the distributed client
//! both compute tokens independently, so the hash here is bit-compatible
//! with the JavaScript routine shipped to browsers: UTF-16 code units,
//! wrapping 32-bit `(h << 5) - h + c` accumulation, absolute value.
//!
//! This is an anti-scraping gate, not a security boundary. The secret
//! ships inside client code; anyone who reads it can mint tokens. Real
//! request integrity is the HMAC signing path's job.

use std::fmt;
use thiserror::Error;

/// Default validity window in seconds (5 minutes).
pub const DEFAULT_MAX_AGE_SECS: i64 = 300;

/// Why a token failed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Not a `"timestamp.hash"` pair.
    #[error("malformed token")]
    Malformed,

    /// Timestamp outside the validity window (either direction).
    #[error("token expired")]
    Expired,

    /// Recomputed hash does not match.
    #[error("token signature mismatch")]
    SignatureMismatch,
}

/// A parsed, issued token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Unix timestamp (seconds) the token was issued at.
    pub issued_at: i64,

    /// Base-36 rolling hash of `"{issued_at}{secret}"`.
    pub hash: String,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.issued_at, self.hash)
    }
}

/// Issue a token for the given moment.
#[must_use]
pub fn issue(secret: &str, now_unix: i64) -> Token {
    Token {
        issued_at: now_unix,
        hash: rolling_hash(&format!("{now_unix}{secret}")),
    }
}

/// Verify a serialized token against the shared secret.
///
/// Checks, in order: shape, age window (`|now - issued_at| <= max_age`,
/// both bounds so a badly skewed clock fails the same way on either
/// side), then hash equality.
///
/// # Errors
///
/// One of [`TokenError`]; callers map these onto their 401/403 taxonomy.
pub fn verify(
    raw: &str,
    secret: &str,
    now_unix: i64,
    max_age_secs: i64,
) -> Result<(), TokenError> {
    let (timestamp, hash) = raw.split_once('.').ok_or(TokenError::Malformed)?;
    if timestamp.is_empty() || hash.is_empty() {
        return Err(TokenError::Malformed);
    }
    let issued_at: i64 = timestamp.parse().map_err(|_| TokenError::Malformed)?;

    let age = now_unix - issued_at;
    if age > max_age_secs || age < -max_age_secs {
        return Err(TokenError::Expired);
    }

    let expected = rolling_hash(&format!("{issued_at}{secret}"));
    if expected != hash {
        return Err(TokenError::SignatureMismatch);
    }

    Ok(())
}

/// The rolling hash: wrapping 32-bit `(h << 5) - h + c` over
/// UTF-16 code units, absolute value, lowercase base-36.
fn rolling_hash(payload: &str) -> String {
    let mut hash: i32 = 0;
    for unit in payload.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit));
    }
    to_base36(i64::from(hash).unsigned_abs())
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        if let Some(digit) = char::from_digit((value % 36) as u32, 36) {
            digits.push(digit);
        }
        value /= 36;
    }
    digits.iter().rev().collect()
}
