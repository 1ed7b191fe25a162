//! Opaque persisted key-value store interface.

use async_trait::async_trait;

use crate::Error;

/// Byte-string key-value store backing the cache.
///
/// Implementations serialize their own internal access; callers perform no
/// additional locking.
#[async_trait]
pub trait Store: Send + Sync {
    /// Fetch the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Error>;

    /// Store `value` under `key`, replacing any previous value.
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), Error>;

    /// Remove `key`. Removing a missing key succeeds.
    async fn delete(&self, key: &str) -> Result<(), Error>;

    /// Release the underlying handle. Later calls fail.
    async fn close(&self) -> Result<(), Error>;
}
