//! API key validation.

use subtle::ConstantTimeEq;

/// Header carrying the API key on the listener path.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Returns `true` iff `presented` is non-empty and byte-equal to `expected`.
///
/// An absent or empty key never matches, even when `expected` is empty too.
#[must_use]
pub fn validate_api_key(presented: Option<&str>, expected: &str) -> bool {
    match presented {
        Some(key) if !key.is_empty() => key.as_bytes().ct_eq(expected.as_bytes()).into(),
        _ => false,
    }
}
