//! Content-addressed cache key generation.

use sha2::{Digest, Sha256};

/// Compute the cache key for a requested URL.
///
/// The key is the hex-encoded SHA-256 of the URL bytes exactly as given;
/// the post-redirect URL never participates.
pub fn compute_cache_key(url: &str) -> String {
    hex::encode(Sha256::digest(url.as_bytes()))
}
