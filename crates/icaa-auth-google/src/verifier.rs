//! Google ID token verification.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};

use icaa_auth::{Claims, VerifyError};

use crate::certs::CertCache;
use crate::payload::Payload;

/// Issuers Google signs ID tokens as.
pub const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

/// Verifies Google-signed ID tokens against a [`CertCache`].
///
/// Checks the RS256 signature, `exp` (with leeway), `aud` and `iss`, and
/// returns the verified [`Payload`].
pub struct IdTokenVerifier {
    certs: CertCache,
    leeway_secs: u64,
}

impl IdTokenVerifier {
    /// A verifier that tolerates `leeway_secs` of clock skew on `exp`.
    pub fn new(certs: CertCache, leeway_secs: u64) -> Self {
        Self { certs, leeway_secs }
    }

    /// The key cache backing this verifier.
    pub fn certs(&self) -> &CertCache {
        &self.certs
    }

    /// Verify `token` was issued by Google for `audience`.
    pub async fn verify(&self, token: &str, audience: &str) -> Result<Payload, VerifyError> {
        if token.is_empty() {
            return Err(VerifyError::InvalidFormat("empty token".to_string()));
        }
        if audience.is_empty() {
            return Err(VerifyError::InvalidAudience);
        }

        let header = decode_header(token).map_err(|e| VerifyError::InvalidFormat(e.to_string()))?;
        if header.alg != Algorithm::RS256 {
            return Err(VerifyError::InvalidFormat(format!(
                "unsupported algorithm {:?}",
                header.alg
            )));
        }
        let kid = header
            .kid
            .ok_or_else(|| VerifyError::InvalidFormat("missing kid in JWT header".to_string()))?;

        let key = self.certs.find_key(&kid).await?;
        let decoding_key = key.decoding_key()?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[audience]);
        validation.set_issuer(&GOOGLE_ISSUERS);
        validation.leeway = self.leeway_secs;

        let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => VerifyError::Expired,
                ErrorKind::InvalidAudience => VerifyError::InvalidAudience,
                ErrorKind::InvalidIssuer => VerifyError::InvalidIssuer,
                _ => VerifyError::InvalidSignature(e.to_string()),
            }
        })?;

        Ok(Payload::from_claims(token_data.claims))
    }
}
