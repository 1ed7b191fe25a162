//! Client code for httpcache.
//!
//! This crate provides the reqwest transport, the caching fetch
//! orchestrator built on `httpcache-core`, and the process-wide instance.

pub mod cached;
pub mod fetch;
pub mod global;

pub use cached::{CachedResponse, HttpCache, Validator};
pub use fetch::{FetchClient, FetchConfig, FetchResponse, Transport};
