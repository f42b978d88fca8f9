//! Nil-safe claim lookups.
//!
//! Providers hand back their verified claims as a JSON object. These helpers
//! never fail: a missing claim set, a missing claim, or a claim of the wrong
//! JSON type all produce the same default.

use serde_json::{Map, Value};

/// A verified claim set: claim name to arbitrary JSON value.
pub type Claims = Map<String, Value>;

/// Look up a string claim, or `""` if it is absent or not a string.
pub fn string_claim(claims: Option<&Claims>, name: &str) -> String {
    claims
        .and_then(|c| c.get(name))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Whether a claim is a string exactly equal to `expected`.
pub fn claim_equals(claims: Option<&Claims>, name: &str, expected: &str) -> bool {
    claims
        .and_then(|c| c.get(name))
        .and_then(Value::as_str)
        .is_some_and(|v| v == expected)
}
