//! Process-wide [`HttpCache`] instance.
//!
//! Prefer constructing an [`HttpCache`] and passing it around. This module
//! exists for callers that want one shared client configured from the
//! environment. The slot is guarded by an async mutex held only while
//! acquiring or shutting down, so concurrent first callers trigger exactly
//! one initialization and all observe the same instance.

use std::sync::Arc;

use httpcache_core::{AppConfig, ConfigError, Error};
use tokio::sync::Mutex;

use crate::cached::HttpCache;

static INSTANCE: Mutex<Option<Arc<HttpCache>>> = Mutex::const_new(None);

/// Shared client configured by [`AppConfig::load`].
pub async fn acquire() -> Result<Arc<HttpCache>, Error> {
    acquire_with(AppConfig::load).await
}

/// Shared client, initialized from `load` if no instance is live.
///
/// `load` only runs when the slot is empty. A failed initialization leaves
/// the slot empty so a later call retries.
pub async fn acquire_with<F>(load: F) -> Result<Arc<HttpCache>, Error>
where
    F: FnOnce() -> Result<AppConfig, ConfigError>,
{
    let mut slot = INSTANCE.lock().await;
    if let Some(client) = slot.as_ref() {
        return Ok(Arc::clone(client));
    }

    let config = load()?;
    let client = Arc::new(HttpCache::from_config(&config).await?);
    *slot = Some(Arc::clone(&client));
    Ok(client)
}

/// Close the shared client's store and empty the slot.
///
/// The next [`acquire`] builds a new instance from scratch. Clones of the
/// old `Arc` still work but every cache operation on them misses.
pub async fn shutdown() -> Result<(), Error> {
    let client = INSTANCE.lock().await.take();
    match client {
        Some(client) => client.close().await,
        None => Ok(()),
    }
}

/// Whether a shared client is currently live.
pub async fn is_initialized() -> bool {
    INSTANCE.lock().await.is_some()
}
