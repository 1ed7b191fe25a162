//! Persistent, policy-aware HTTP response cache.
//!
//! This module provides:
//!
//! - Content-addressed keys using SHA-256 hashing of the requested URL
//! - The opaque [`Store`] interface and its SQLite backend ([`CacheDb`])
//! - Automatic schema migrations and WAL mode for concurrent access
//! - The [`EntryCache`] adapter that enforces expiry on read and deletes
//!   expired entries lazily

pub mod connection;
pub mod entries;
pub mod entry;
pub mod hash;
pub mod migrations;
pub mod store;

pub use crate::Error;

pub use connection::CacheDb;
pub use entries::EntryCache;
pub use entry::{CacheEntry, Freshness};
pub use hash::compute_cache_key;
pub use store::Store;
