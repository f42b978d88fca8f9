//! Auth-specific error types.

/// Errors returned by a [`Validator`](crate::Validator) or while building one.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The provider's verifier could not be constructed.
    #[error("failed to create {provider} id verifier: {message}")]
    Init {
        /// Provider name, e.g. `"google"`.
        provider: &'static str,
        /// What went wrong.
        message: String,
    },

    /// A token was presented and rejected.
    #[error("failed to validate token: {0}")]
    Validation(#[source] VerifyError),
}

impl AuthError {
    /// Build an [`AuthError::Init`].
    pub fn init(provider: &'static str, message: impl Into<String>) -> Self {
        AuthError::Init {
            provider,
            message: message.into(),
        }
    }

    /// Whether this error should result in a 401 (vs. a 500).
    pub fn is_client_error(&self) -> bool {
        match self {
            AuthError::Init { .. } => false,
            AuthError::Validation(e) => e.is_client_error(),
        }
    }

    /// The underlying verification failure, if any.
    pub fn verify_error(&self) -> Option<&VerifyError> {
        match self {
            AuthError::Validation(e) => Some(e),
            AuthError::Init { .. } => None,
        }
    }
}

impl From<VerifyError> for AuthError {
    fn from(e: VerifyError) -> Self {
        AuthError::Validation(e)
    }
}

/// Why a verifier rejected a token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    /// Token format is invalid (not a JWT, missing header fields, ...).
    #[error("invalid token format: {0}")]
    InvalidFormat(String),

    /// Signature verification failed.
    #[error("invalid token signature: {0}")]
    InvalidSignature(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,

    /// Token audience doesn't match the expected audience.
    #[error("invalid audience")]
    InvalidAudience,

    /// Token was not issued by the provider.
    #[error("invalid issuer")]
    InvalidIssuer,

    /// Failed to fetch signing keys from the provider.
    #[error("failed to fetch signing keys: {0}")]
    KeyFetch(String),

    /// No signing key matches the token's kid.
    #[error("no matching key for kid '{0}'")]
    NoMatchingKey(String),
}

impl VerifyError {
    /// Whether the token itself is at fault (vs. the provider being unreachable).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, VerifyError::KeyFetch(_))
    }
}
