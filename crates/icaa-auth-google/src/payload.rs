//! Verified Google ID token payload and the claim extractors applied to it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use icaa_auth::claims::{claim_equals, string_claim};
use icaa_auth::Claims;

/// Hosted domain of a Google Workspace account.
pub const HOSTED_DOMAIN_CLAIM: &str = "hd";
/// Profile picture URL.
pub const PICTURE_CLAIM: &str = "picture";
/// Email address.
pub const EMAIL_CLAIM: &str = "email";

/// The verified contents of a Google ID token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    /// `iss` claim.
    pub issuer: String,
    /// `aud` claim (first entry if the token carries several).
    pub audience: String,
    /// `exp` claim, seconds since the Unix epoch.
    pub expires: i64,
    /// `iat` claim, seconds since the Unix epoch.
    pub issued_at: i64,
    /// `sub` claim.
    pub subject: String,
    /// Every claim in the token, registered claims included.
    pub claims: Claims,
}

impl Payload {
    /// Build a payload from a verified claim set.
    pub fn from_claims(claims: Claims) -> Self {
        let audience = match claims.get("aud") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Array(values)) => values
                .iter()
                .find_map(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            _ => String::new(),
        };

        Self {
            issuer: string_claim(Some(&claims), "iss"),
            audience,
            expires: int_claim(&claims, "exp"),
            issued_at: int_claim(&claims, "iat"),
            subject: string_claim(Some(&claims), "sub"),
            claims,
        }
    }

    /// Look up a claim by name.
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }
}

/// An integer claim such as `exp` or `iat`.
///
/// Whole-valued floats within `i64` range are accepted. Anything else
/// (missing, fractional, out of range, not a number) reads as 0 rather
/// than being clamped to `i64::MIN`/`i64::MAX`.
fn int_claim(claims: &Claims, name: &str) -> i64 {
    let Some(v) = claims.get(name) else {
        return 0;
    };
    if let Some(n) = v.as_i64() {
        return n;
    }
    match v.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => f as i64,
        _ => 0,
    }
}

/// Whether the account's hosted domain is exactly `admin_domain`.
pub fn is_admin(payload: Option<&Payload>, admin_domain: &str) -> bool {
    claim_equals(
        payload.map(|p| &p.claims),
        HOSTED_DOMAIN_CLAIM,
        admin_domain,
    )
}

/// The `picture` claim, or `""`.
pub fn profile_pic_url(payload: Option<&Payload>) -> String {
    string_claim(payload.map(|p| &p.claims), PICTURE_CLAIM)
}

/// The `email` claim, or `""`.
pub fn user_email(payload: Option<&Payload>) -> String {
    string_claim(payload.map(|p| &p.claims), EMAIL_CLAIM)
}

/// The token's expiry, or the zero timestamp (Unix epoch) if there is no payload.
pub fn expires_at(payload: Option<&Payload>) -> DateTime<Utc> {
    payload
        .and_then(|p| DateTime::from_timestamp(p.expires, 0))
        .unwrap_or_default()
}
