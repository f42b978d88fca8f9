//! Google signing key cache.

use std::sync::RwLock;
use std::time::{Duration, Instant};

use jsonwebtoken::DecodingKey;
use reqwest::header::{HeaderMap, CACHE_CONTROL};
use serde::Deserialize;

use icaa_auth::VerifyError;

/// Shortest gap between two fetches triggered by unknown key IDs.
pub const DEFAULT_MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// A single JSON Web Key from the certs endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Jwk {
    /// Key ID, matched against the JWT header's `kid`. Keys without one are skipped.
    #[serde(default)]
    pub kid: String,
    /// Key type. Only `"RSA"` keys are used.
    #[serde(default)]
    pub kty: String,
    /// RSA modulus (base64url-encoded).
    #[serde(default)]
    pub n: String,
    /// RSA exponent (base64url-encoded).
    #[serde(default)]
    pub e: String,
}

impl Jwk {
    /// An RSA key from its base64url-encoded components.
    pub fn rsa(kid: impl Into<String>, n: impl Into<String>, e: impl Into<String>) -> Self {
        Self {
            kid: kid.into(),
            kty: "RSA".to_string(),
            n: n.into(),
            e: e.into(),
        }
    }

    fn is_usable(&self) -> bool {
        !self.kid.is_empty() && self.kty == "RSA" && !self.n.is_empty() && !self.e.is_empty()
    }

    /// Build the key used to check signatures.
    pub fn decoding_key(&self) -> Result<DecodingKey, VerifyError> {
        DecodingKey::from_rsa_components(&self.n, &self.e)
            .map_err(|e| VerifyError::InvalidSignature(format!("bad key '{}': {e}", self.kid)))
    }
}

#[derive(Debug, Deserialize)]
struct JwksResponse {
    keys: Vec<Jwk>,
}

struct CachedKeys {
    keys: Vec<Jwk>,
    fetched_at: Instant,
    /// `None` for static keys, which never expire.
    max_age: Option<Duration>,
}

impl CachedKeys {
    fn is_fresh(&self) -> bool {
        self.max_age
            .is_none_or(|max_age| self.fetched_at.elapsed() <= max_age)
    }

    /// Stale keys may stand in for a failed refresh until they are twice `max_age` old.
    fn is_within_grace(&self) -> bool {
        self.max_age
            .is_none_or(|max_age| self.fetched_at.elapsed() <= max_age.saturating_mul(2))
    }
}

/// Result of a cache lookup.
struct Lookup {
    key: Option<Jwk>,
    fresh: bool,
    within_grace: bool,
}

/// Signing keys fetched from a JWKS endpoint, cached until they go stale.
///
/// Keys live for the `max-age` the endpoint advertises in `Cache-Control`,
/// or for the configured TTL when it doesn't. An unknown `kid` triggers a
/// refetch, which picks up rotated keys, but at most once per minimum
/// refresh interval. If a refetch fails, a stale copy of the requested key
/// is used until it is twice its lifetime old.
pub struct CertCache {
    cached: RwLock<Option<CachedKeys>>,
    last_refresh: RwLock<Option<Instant>>,
    certs_url: String,
    ttl: Duration,
    min_refresh_interval: Duration,
    http_client: Option<reqwest::Client>,
}

impl CertCache {
    /// A cache that fetches keys from `certs_url` with `http_client`.
    pub fn new(certs_url: impl Into<String>, ttl: Duration, http_client: reqwest::Client) -> Self {
        Self {
            cached: RwLock::new(None),
            last_refresh: RwLock::new(None),
            certs_url: certs_url.into(),
            ttl,
            min_refresh_interval: DEFAULT_MIN_REFRESH_INTERVAL,
            http_client: Some(http_client),
        }
    }

    /// A cache pre-loaded with keys that never expire and are never refetched.
    pub fn with_static_keys(keys: Vec<Jwk>) -> Self {
        Self {
            cached: RwLock::new(Some(CachedKeys {
                keys,
                fetched_at: Instant::now(),
                max_age: None,
            })),
            last_refresh: RwLock::new(None),
            certs_url: String::new(),
            ttl: Duration::ZERO,
            min_refresh_interval: DEFAULT_MIN_REFRESH_INTERVAL,
            http_client: None,
        }
    }

    /// Set the shortest gap between refetches caused by unknown key IDs.
    pub fn with_min_refresh_interval(mut self, interval: Duration) -> Self {
        self.min_refresh_interval = interval;
        self
    }

    /// The endpoint keys are fetched from (empty for static keys).
    pub fn certs_url(&self) -> &str {
        &self.certs_url
    }

    /// Find a key by `kid`, fetching/refreshing the cache as needed.
    pub async fn find_key(&self, kid: &str) -> Result<Jwk, VerifyError> {
        let lookup = self.lookup_cached(kid);
        if lookup.fresh {
            if let Some(key) = lookup.key {
                log::debug!("Signing key '{kid}' served from cache");
                return Ok(key);
            }
            if self.refreshed_recently() {
                log::debug!("Unknown kid '{kid}', keys refreshed recently; not refetching");
                return Err(VerifyError::NoMatchingKey(kid.to_string()));
            }
        }

        if self.http_client.is_none() {
            return lookup
                .key
                .ok_or_else(|| VerifyError::NoMatchingKey(kid.to_string()));
        }

        if let Err(e) = self.refresh_keys().await {
            return match lookup.key {
                Some(stale) if lookup.within_grace => {
                    log::warn!("Signing key refresh failed, using stale key '{kid}': {e}");
                    Ok(stale)
                }
                _ => Err(e),
            };
        }

        self.lookup_cached(kid)
            .key
            .ok_or_else(|| VerifyError::NoMatchingKey(kid.to_string()))
    }

    fn lookup_cached(&self, kid: &str) -> Lookup {
        let missing = Lookup {
            key: None,
            fresh: false,
            within_grace: false,
        };
        let Ok(cache) = self.cached.read() else {
            return missing;
        };
        match cache.as_ref() {
            Some(cached) => Lookup {
                key: cached.keys.iter().find(|k| k.kid == kid).cloned(),
                fresh: cached.is_fresh(),
                within_grace: cached.is_within_grace(),
            },
            None => missing,
        }
    }

    fn refreshed_recently(&self) -> bool {
        self.last_refresh
            .read()
            .ok()
            .and_then(|last| *last)
            .is_some_and(|at| at.elapsed() < self.min_refresh_interval)
    }

    async fn refresh_keys(&self) -> Result<(), VerifyError> {
        let client = self.http_client.as_ref().ok_or_else(|| {
            VerifyError::KeyFetch("no HTTP client (static keys mode)".to_string())
        })?;

        if let Ok(mut last) = self.last_refresh.write() {
            *last = Some(Instant::now());
        }

        let response = client
            .get(&self.certs_url)
            .send()
            .await
            .map_err(|e| VerifyError::KeyFetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(VerifyError::KeyFetch(format!(
                "certs endpoint returned HTTP {}",
                response.status()
            )));
        }

        let max_age = cache_max_age(response.headers()).unwrap_or(self.ttl);
        let body: JwksResponse = response
            .json()
            .await
            .map_err(|e| VerifyError::KeyFetch(format!("certs response parse failed: {e}")))?;

        let keys: Vec<Jwk> = body.keys.into_iter().filter(Jwk::is_usable).collect();
        log::debug!(
            "Fetched {} signing keys from {}, cached for {}s",
            keys.len(),
            self.certs_url,
            max_age.as_secs()
        );

        let mut cache = self
            .cached
            .write()
            .map_err(|e| VerifyError::KeyFetch(e.to_string()))?;

        *cache = Some(CachedKeys {
            keys,
            fetched_at: Instant::now(),
            max_age: Some(max_age),
        });

        Ok(())
    }
}

/// The `max-age` directive of a `Cache-Control` header.
fn cache_max_age(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(CACHE_CONTROL)?
        .to_str()
        .ok()?
        .split(',')
        .find_map(|directive| directive.trim().strip_prefix("max-age="))
        .and_then(|secs| secs.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}
