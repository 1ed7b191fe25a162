//! Expiry-aware cache entry access on top of a [`Store`].
//!
//! Reads never fail: store faults and undecodable entries are reported as
//! misses. Writes never fail either, since the caller already holds the
//! fetched body. Expired entries are deleted when a read encounters them.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use super::entry::{CacheEntry, Freshness};
use super::store::Store;
use crate::Error;
use crate::policy::PolicySet;

/// Cache Store Adapter: serializes entries and enforces read-time expiry.
#[derive(Clone)]
pub struct EntryCache {
    store: Arc<dyn Store>,
    policies: Arc<PolicySet>,
}

impl EntryCache {
    pub fn new(store: Arc<dyn Store>, policies: Arc<PolicySet>) -> Self {
        Self { store, policies }
    }

    /// Policies used to judge freshness on read.
    pub fn policies(&self) -> &PolicySet {
        &self.policies
    }

    /// Look up a fresh entry.
    ///
    /// Freshness is judged against the TTL the current policies give the
    /// entry's requested URL, not the TTL in force when it was written.
    pub async fn read(&self, key: &str) -> Option<CacheEntry> {
        let bytes = match self.store.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key, "cache read failed, treating as miss: {e}");
                return None;
            }
        };

        let entry = match CacheEntry::from_bytes(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(key, "undecodable cache entry, treating as miss: {e}");
                return None;
            }
        };

        let ttl = self.policies.resolve_ttl(&entry.url);
        if entry.is_expired(ttl, Utc::now()) {
            tracing::debug!(key, url = %entry.url, "cache entry expired");
            if let Err(e) = self.store.delete(key).await {
                tracing::warn!(key, "failed to delete expired cache entry: {e}");
            }
            return None;
        }

        Some(entry)
    }

    /// Store `data` fetched for `requested_url` now.
    pub async fn write(&self, key: &str, data: &[u8], requested_url: &str, final_url: &str, ttl: Duration) {
        let entry = CacheEntry::new(data.to_vec(), requested_url, final_url, ttl, Utc::now());

        let encoded = match entry.to_bytes() {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::warn!(key, "failed to encode cache entry: {e}");
                return;
            }
        };

        if let Err(e) = self.store.put(key, encoded).await {
            tracing::warn!(key, "failed to store cache entry: {e}");
        }
    }

    /// Remove an entry regardless of its freshness.
    pub async fn delete(&self, key: &str) -> Result<(), Error> {
        self.store.delete(key).await
    }

    /// Inspect an entry without deleting it, expired or not.
    ///
    /// # Errors
    ///
    /// Unlike [`EntryCache::read`], store and decode failures are returned.
    pub async fn peek(&self, key: &str) -> Result<Option<(CacheEntry, Freshness)>, Error> {
        let Some(bytes) = self.store.get(key).await? else {
            return Ok(None);
        };
        let entry = CacheEntry::from_bytes(&bytes)?;
        let freshness = entry.freshness(self.policies.resolve_ttl(&entry.url), Utc::now());
        Ok(Some((entry, freshness)))
    }

    /// Release the underlying store.
    pub async fn close(&self) -> Result<(), Error> {
        self.store.close().await
    }
}
