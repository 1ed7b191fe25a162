//! Caching fetch orchestrator.
//!
//! [`HttpCache`] wraps a [`Transport`] with the policy-driven cache:
//!
//! 1. derive the key and resolve the TTL for the requested URL;
//! 2. when the TTL is positive, serve a fresh entry the validator accepts;
//! 3. otherwise fetch, and write through when the TTL is positive and the
//!    validator accepts the new body.
//!
//! There is no per-key coordination. Concurrent misses for one URL may
//! each fetch and each write; the last write wins.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use httpcache_core::cache::compute_cache_key;
use httpcache_core::{AppConfig, CacheDb, EntryCache, Error, PolicySet, Store};

use crate::fetch::{FetchClient, FetchConfig, Transport};

/// Caller-supplied content check. Returning `false` means the body must not
/// be served from, or written to, the cache.
pub type Validator = dyn Fn(&[u8]) -> bool + Send + Sync;

/// Body returned by [`HttpCache::get_with_final_url`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    pub body: Bytes,
    /// Post-redirect URL. Empty for entries cached before it was recorded.
    pub final_url: String,
    /// Whether the body came from the cache rather than the network.
    pub from_cache: bool,
}

/// HTTP client with a persistent, policy-driven response cache.
#[derive(Clone)]
pub struct HttpCache {
    entries: EntryCache,
    transport: Arc<dyn Transport>,
}

impl HttpCache {
    /// Assemble a client from its collaborators.
    pub fn new(store: Arc<dyn Store>, policies: PolicySet, transport: Arc<dyn Transport>) -> Self {
        Self { entries: EntryCache::new(store, Arc::new(policies)), transport }
    }

    /// Open an independent client with its own store at `store_path`.
    pub async fn open(
        store_path: impl AsRef<Path>, policies: PolicySet, fetch_config: FetchConfig,
    ) -> Result<Self, Error> {
        let transport = FetchClient::new(fetch_config)?;
        let store = CacheDb::open(store_path).await?;
        Ok(Self::new(Arc::new(store), policies, Arc::new(transport)))
    }

    /// Build a client from application configuration.
    ///
    /// Creates `cache_dir` if needed and loads `policies_file`.
    ///
    /// # Errors
    ///
    /// Policy load failures are returned so the caller can decide whether to
    /// abort startup.
    pub async fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let policies = PolicySet::load(config.policies_file.as_deref())?;
        std::fs::create_dir_all(&config.cache_dir)?;

        tracing::info!(
            store = %config.store_path().display(),
            policies = policies.len(),
            "opening http cache"
        );

        Self::open(config.store_path(), policies, FetchConfig::from(config)).await
    }

    /// TTL the current policies assign to `url`.
    pub fn resolve_ttl(&self, url: &str) -> Duration {
        self.entries.policies().resolve_ttl(url)
    }

    pub fn policies(&self) -> &PolicySet {
        self.entries.policies()
    }

    /// Fetch `url`, serving from the cache when possible.
    pub async fn get(&self, url: &str) -> Result<Bytes, Error> {
        Ok(self.get_with_final_url(url, None).await?.body)
    }

    /// Fetch `url` and report the post-redirect URL.
    ///
    /// A cached entry the `validator` rejects is deleted and re-fetched. A
    /// fresh body the validator rejects is still returned but not cached.
    ///
    /// # Errors
    ///
    /// Only transport errors are returned; cache faults degrade to a fetch.
    pub async fn get_with_final_url(&self, url: &str, validator: Option<&Validator>) -> Result<CachedResponse, Error> {
        let key = compute_cache_key(url);
        let ttl = self.resolve_ttl(url);
        let cacheable = !ttl.is_zero();

        if cacheable && let Some(entry) = self.entries.read(&key).await {
            if validator.is_none_or(|accepts| accepts(entry.data.as_slice())) {
                tracing::debug!(url, "cache hit");
                return Ok(CachedResponse { body: Bytes::from(entry.data), final_url: entry.final_url, from_cache: true });
            }

            tracing::debug!(url, "cached entry rejected by validator");
            if let Err(e) = self.entries.delete(&key).await {
                tracing::warn!(url, "failed to delete rejected cache entry: {e}");
            }
        }

        let response = self.transport.fetch(url).await?;
        let final_url = response.final_url.to_string();
        let body = response.bytes;

        let accepted = validator.is_none_or(|accepts| accepts(body.as_ref()));
        if !accepted {
            tracing::debug!(url, "fetched content rejected by validator, not caching");
        } else if cacheable {
            self.entries.write(&key, &body, url, &final_url, ttl).await;
            tracing::debug!(url, ttl_secs = ttl.as_secs(), "cached response");
        }

        Ok(CachedResponse { body, final_url, from_cache: false })
    }

    /// Drop the cached entry for `url`, fresh or not.
    pub async fn delete_url(&self, url: &str) -> Result<(), Error> {
        self.entries.delete(&compute_cache_key(url)).await
    }

    /// Release the store handle.
    pub async fn close(&self) -> Result<(), Error> {
        self.entries.close().await
    }
}
