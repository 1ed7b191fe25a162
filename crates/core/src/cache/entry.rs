//! Cache entry model and its persisted JSON form.
//!
//! ```json
//! {"data":"aGVsbG8=","url":"https://a/","final_url":"https://b/",
//!  "fetched_at":"2025-01-01T00:00:00Z","expires_at":"2025-01-01T00:10:00Z"}
//! ```
//!
//! `final_url` and `fetched_at` are optional so entries written by older
//! versions still decode. Those entries expire at their stored `expires_at`.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;

/// A cached response body with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    /// The URL that was requested; the policy lookup key.
    pub url: String,
    /// The post-redirect URL. Empty for legacy entries.
    #[serde(default)]
    pub final_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,
    /// Absolute expiry computed at write time.
    #[serde(default)]
    pub expires_at: DateTime<Utc>,
}

/// Expiry status of an entry under a given TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Freshness {
    pub expired: bool,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Create an entry fetched at `now` that nominally lives for `ttl`.
    pub fn new(data: Vec<u8>, url: &str, final_url: &str, ttl: Duration, now: DateTime<Utc>) -> Self {
        Self {
            data,
            url: url.to_string(),
            final_url: final_url.to_string(),
            fetched_at: Some(now),
            expires_at: add_ttl(now, ttl),
        }
    }

    /// The instant after which the entry is stale.
    ///
    /// Entries carrying `fetched_at` are judged against `ttl`, the TTL the
    /// current policies give their URL. Legacy entries use `expires_at`.
    pub fn effective_expiry(&self, ttl: Duration) -> DateTime<Utc> {
        match self.fetched_at {
            Some(fetched_at) => add_ttl(fetched_at, ttl),
            None => self.expires_at,
        }
    }

    pub fn freshness(&self, ttl: Duration, now: DateTime<Utc>) -> Freshness {
        let expires_at = self.effective_expiry(ttl);
        Freshness { expired: now > expires_at, expires_at }
    }

    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        self.freshness(ttl, now).expired
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

fn add_ttl(start: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(ttl)
        .ok()
        .and_then(|delta| start.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

mod base64_bytes {
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    // A nil body was written as `null`.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(encoded) => STANDARD.decode(encoded).map_err(serde::de::Error::custom),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_new_sets_timestamps() {
        let now = at("2025-01-01T00:00:00Z");
        let entry = CacheEntry::new(b"body".to_vec(), "https://a/", "https://b/", Duration::from_secs(60), now);
        assert_eq!(entry.fetched_at, Some(now));
        assert_eq!(entry.expires_at, at("2025-01-01T00:01:00Z"));
    }

    #[test]
    fn test_bytes_preserve_fields() {
        let now = at("2025-01-01T00:00:00Z");
        let entry = CacheEntry::new(vec![0, 159, 255], "https://a/", "https://b/", Duration::from_secs(5), now);
        let decoded = CacheEntry::from_bytes(&entry.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, entry);
    }

    #[test]
    fn test_data_is_base64_on_the_wire() {
        let entry = CacheEntry::new(b"hello".to_vec(), "u", "", Duration::ZERO, Utc::now());
        let json: serde_json::Value = serde_json::from_slice(&entry.to_bytes().unwrap()).unwrap();
        assert_eq!(json["data"], "aGVsbG8=");
    }

    #[test]
    fn test_decode_legacy_entry() {
        let legacy = br#"{"data":"aGk=","url":"http://old.example/","expires_at":"2020-01-01T00:00:00Z"}"#;
        let entry = CacheEntry::from_bytes(legacy).unwrap();
        assert_eq!(entry.data, b"hi");
        assert_eq!(entry.final_url, "");
        assert!(entry.fetched_at.is_none());
        assert!(entry.is_expired(Duration::from_secs(86_400 * 365 * 100), Utc::now()));
    }

    #[test]
    fn test_decode_null_data() {
        let raw = br#"{"data":null,"url":"u","final_url":"","expires_at":"2099-01-01T00:00:00Z"}"#;
        let entry = CacheEntry::from_bytes(raw).unwrap();
        assert!(entry.data.is_empty());
        assert!(!entry.is_expired(Duration::ZERO, Utc::now()));
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(matches!(CacheEntry::from_bytes(b"\x00\x01binary"), Err(Error::Codec(_))));
        assert!(matches!(CacheEntry::from_bytes(br#"{"data":"!!!","url":"u"}"#), Err(Error::Codec(_))));
    }

    #[test]
    fn test_expiry_uses_supplied_ttl() {
        let fetched = at("2025-01-01T00:00:00Z");
        let entry = CacheEntry::new(Vec::new(), "u", "", Duration::from_secs(3600), fetched);
        let now = at("2025-01-01T00:10:00Z");

        // Stored expires_at says fresh for an hour; a 5 minute policy wins.
        assert!(entry.is_expired(Duration::from_secs(300), now));
        assert!(!entry.is_expired(Duration::from_secs(900), now));
    }

    #[test]
    fn test_expiry_boundary_is_exclusive() {
        let fetched = at("2025-01-01T00:00:00Z");
        let entry = CacheEntry::new(Vec::new(), "u", "", Duration::from_secs(60), fetched);
        assert!(!entry.is_expired(Duration::from_secs(60), at("2025-01-01T00:01:00Z")));
        assert!(entry.is_expired(Duration::from_secs(60), at("2025-01-01T00:01:01Z")));
    }

    #[test]
    fn test_freshness_reports_effective_expiry() {
        let fetched = at("2025-01-01T00:00:00Z");
        let entry = CacheEntry::new(Vec::new(), "u", "", Duration::from_secs(60), fetched);
        let freshness = entry.freshness(Duration::from_secs(120), at("2025-01-01T00:01:30Z"));
        assert!(!freshness.expired);
        assert_eq!(freshness.expires_at, at("2025-01-01T00:02:00Z"));
    }
}
