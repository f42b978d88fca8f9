//! Generic authentication primitives for ICAA services.
//!
//! Provides:
//! - [`AuthToken`]: Identity projected from a validated token, generic over the provider payload
//! - [`Validator`]: Trait for async token validation (implement per provider)
//! - [`claims`]: Nil-safe claim lookups shared by provider adapters
//! - [`AuthError`] / [`VerifyError`]: Auth-specific error types

pub mod claims;
mod error;
mod token;

use std::future::Future;
use std::pin::Pin;

pub use claims::Claims;
pub use error::{AuthError, VerifyError};
pub use token::AuthToken;

/// Future returned by [`Validator::validate`].
pub type ValidateFuture<'a, P> =
    Pin<Box<dyn Future<Output = Result<AuthToken<P>, AuthError>> + Send + 'a>>;

/// Trait for validating bearer tokens and projecting them into an [`AuthToken`].
///
/// Implement this for each identity provider. Implementations hold no
/// per-request state, so one instance can be shared (e.g. behind an `Arc`)
/// by every request handler. Dropping the returned future cancels the
/// validation.
pub trait Validator: Send + Sync + 'static {
    /// Provider-specific payload carried in [`AuthToken::raw`].
    type Payload: Send;

    /// Validate `token` for `audience`.
    fn validate(&self, token: &str, audience: &str) -> ValidateFuture<'_, Self::Payload>;
}
