//! Google validator configuration.

use serde::{Deserialize, Serialize};

use icaa_auth::AuthError;

use crate::PROVIDER;

/// Google's published JWKS for ID token signing keys.
pub const GOOGLE_CERTS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";

/// Hosted domain whose accounts are administrators unless configured otherwise.
pub const DEFAULT_ADMIN_DOMAIN: &str = "icaa.world";

/// Configuration for [`GoogleValidator`](crate::GoogleValidator).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleConfig {
    /// JWKS endpoint to fetch signing keys from.
    pub certs_url: String,
    /// Hosted domain (`hd` claim) that grants admin status.
    pub admin_domain: String,
    /// Key cache lifetime when the endpoint sends no `Cache-Control: max-age`.
    pub certs_ttl_secs: u64,
    /// Timeout for fetching signing keys. Must be non-zero.
    pub http_timeout_secs: u64,
    /// Shortest gap between refetches caused by tokens with an unknown `kid`.
    pub min_refresh_interval_secs: u64,
    /// Clock skew tolerated when checking `exp`.
    pub leeway_secs: u64,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            certs_url: GOOGLE_CERTS_URL.to_string(),
            admin_domain: DEFAULT_ADMIN_DOMAIN.to_string(),
            certs_ttl_secs: 3600,
            http_timeout_secs: 10,
            min_refresh_interval_secs: 30,
            leeway_secs: 60,
        }
    }
}

impl GoogleConfig {
    /// Parse a config from TOML. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, AuthError> {
        let config: Self =
            toml::from_str(s).map_err(|e| AuthError::init(PROVIDER, format!("bad config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configs the validator can't work with.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.certs_url.trim().is_empty() {
            return Err(AuthError::init(PROVIDER, "certs_url is empty"));
        }
        if self.admin_domain.trim().is_empty() {
            return Err(AuthError::init(PROVIDER, "admin_domain is empty"));
        }
        if self.http_timeout_secs == 0 {
            return Err(AuthError::init(PROVIDER, "http_timeout_secs must be non-zero"));
        }
        Ok(())
    }
}
