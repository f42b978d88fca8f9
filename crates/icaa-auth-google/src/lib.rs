//! Google ID token validation for ICAA services.
//!
//! Implements [`icaa_auth::Validator`] for Google:
//! - [`IdTokenVerifier`]: RS256 signature, expiry, audience and issuer checks
//! - [`CertCache`]: JWKS key caching, honouring `Cache-Control: max-age`
//! - [`payload`]: claim extractors projecting a verified [`Payload`] into an [`AuthToken`]
//!
//! ```no_run
//! use icaa_auth::Validator;
//! use icaa_auth_google::{GoogleConfig, GoogleValidator};
//!
//! # async fn run(bearer: &str) -> Result<(), icaa_auth::AuthError> {
//! let validator = GoogleValidator::new(GoogleConfig::default())?;
//! let token = validator.validate(bearer, "my-client-id.apps.googleusercontent.com").await?;
//! if token.is_admin() {
//!     println!("admin {}", token.user_email());
//! }
//! # Ok(())
//! # }
//! ```

mod certs;
mod config;
pub mod payload;
mod verifier;

#[cfg(test)]
mod test_support;

use std::time::Duration;

use icaa_auth::{AuthError, AuthToken, ValidateFuture, Validator};

pub use certs::{CertCache, Jwk};
pub use config::{GoogleConfig, DEFAULT_ADMIN_DOMAIN, GOOGLE_CERTS_URL};
pub use payload::Payload;
pub use verifier::{IdTokenVerifier, GOOGLE_ISSUERS};

/// Provider name used in errors.
pub(crate) const PROVIDER: &str = "google";

/// Validates Google ID tokens and projects them into [`AuthToken`]s.
///
/// Holds a single [`IdTokenVerifier`]; safe to share across tasks.
pub struct GoogleValidator {
    verifier: IdTokenVerifier,
    admin_domain: String,
}

impl GoogleValidator {
    /// Build a validator that fetches Google's signing keys over HTTPS.
    pub fn new(config: GoogleConfig) -> Result<Self, AuthError> {
        config.validate()?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| AuthError::init(PROVIDER, e.to_string()))?;

        let certs = CertCache::new(
            config.certs_url,
            Duration::from_secs(config.certs_ttl_secs),
            http_client,
        )
        .with_min_refresh_interval(Duration::from_secs(config.min_refresh_interval_secs));

        Ok(Self::with_verifier(
            IdTokenVerifier::new(certs, config.leeway_secs),
            config.admin_domain,
        ))
    }

    /// Wrap an existing verifier (e.g. one over static keys).
    pub fn with_verifier(verifier: IdTokenVerifier, admin_domain: impl Into<String>) -> Self {
        Self {
            verifier,
            admin_domain: admin_domain.into(),
        }
    }

    /// Hosted domain that grants admin status.
    pub fn admin_domain(&self) -> &str {
        &self.admin_domain
    }

    /// Verify `token` for `audience` and project its claims.
    pub async fn validate_token(
        &self,
        token: &str,
        audience: &str,
    ) -> Result<AuthToken<Payload>, AuthError> {
        let payload = self.verifier.verify(token, audience).await.map_err(|e| {
            log::warn!("Google token validation failed: {e}");
            AuthError::Validation(e)
        })?;

        Ok(self.project(payload))
    }

    /// Build the [`AuthToken`] for a verified payload.
    pub fn project(&self, payload: Payload) -> AuthToken<Payload> {
        let p = Some(&payload);
        let expires_at = payload::expires_at(p);
        let is_admin = payload::is_admin(p, &self.admin_domain);
        let profile_pic_url = payload::profile_pic_url(p);
        let user_email = payload::user_email(p);

        AuthToken::new(payload)
            .with_expires_at(expires_at)
            .with_admin(is_admin)
            .with_profile_pic_url(profile_pic_url)
            .with_user_email(user_email)
    }
}

impl Validator for GoogleValidator {
    type Payload = Payload;

    fn validate(&self, token: &str, audience: &str) -> ValidateFuture<'_, Payload> {
        let token = token.to_string();
        let audience = audience.to_string();
        Box::pin(async move { self.validate_token(&token, &audience).await })
    }
}
