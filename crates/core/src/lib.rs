//! Core types and shared functionality for httpcache.
//!
//! This crate provides:
//! - Policy loading and first-match TTL resolution
//! - Content-addressed cache keys
//! - The persisted key-value store and its SQLite backend
//! - The expiry-aware cache entry adapter
//! - Unified error types and configuration

pub mod cache;
pub mod config;
pub mod error;
pub mod policy;

pub use cache::{CacheDb, CacheEntry, EntryCache, Freshness, Store};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use policy::{CachePolicy, PolicyError, PolicySet};
