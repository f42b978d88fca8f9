//! The validated token handed back to callers.

use chrono::{DateTime, Utc};

/// A verified identity, projected from a provider's token payload.
///
/// Every field is populated when the token is validated; claims the
/// provider did not supply are left at their defaults (empty string,
/// `false`, the zero timestamp). The provider's own payload is kept in
/// [`raw`](Self::raw) for callers that need claims beyond the common ones.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthToken<P> {
    expires_at: DateTime<Utc>,
    profile_pic_url: String,
    is_admin: bool,
    user_email: String,
    raw: P,
}

impl<P> AuthToken<P> {
    /// Start a token around a provider payload, with every common field at its default.
    pub fn new(raw: P) -> Self {
        Self {
            expires_at: DateTime::<Utc>::default(),
            profile_pic_url: String::new(),
            is_admin: false,
            user_email: String::new(),
            raw,
        }
    }

    /// Set the expiry.
    pub fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = expires_at;
        self
    }

    /// Set the profile picture URL.
    pub fn with_profile_pic_url(mut self, url: impl Into<String>) -> Self {
        self.profile_pic_url = url.into();
        self
    }

    /// Set the admin flag.
    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }

    /// Set the user's email.
    pub fn with_user_email(mut self, email: impl Into<String>) -> Self {
        self.user_email = email.into();
        self
    }

    /// When the token stops being valid.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Profile picture URL, or `""` if the provider didn't supply one.
    pub fn profile_pic_url(&self) -> &str {
        &self.profile_pic_url
    }

    /// Whether the holder is an administrator.
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// The user's email, or `""` if the provider didn't supply one.
    pub fn user_email(&self) -> &str {
        &self.user_email
    }

    /// The provider-specific payload.
    pub fn raw(&self) -> &P {
        &self.raw
    }

    /// Consume the token, returning the provider-specific payload.
    pub fn into_raw(self) -> P {
        self.raw
    }

    /// Whether the token has expired as of `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
