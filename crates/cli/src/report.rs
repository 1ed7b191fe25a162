//! Human-readable rendering of a cache entry.

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use httpcache_core::{CacheEntry, Freshness};

const RULE_WIDTH: usize = 80;

/// Render the metadata block printed for one entry.
pub fn render(key: &str, entry: &CacheEntry, freshness: &Freshness, now: DateTime<Utc>, preview_chars: usize) -> String {
    let mut lines = vec![format!("Cache Key: {key}"), format!("Original URL: {}", entry.url)];
    if !entry.final_url.is_empty() && entry.final_url != entry.url {
        lines.push(format!("Final URL: {}", entry.final_url));
    }
    lines.push(match entry.fetched_at {
        Some(fetched_at) => format!("Fetched At: {}", fetched_at.to_rfc3339_opts(SecondsFormat::Secs, true)),
        None => "Fetched At: unknown (legacy entry)".to_string(),
    });
    lines.push(format!("Expires At: {}", freshness.expires_at.to_rfc3339_opts(SecondsFormat::Secs, true)));
    lines.push(format!("Time Until Expiration: {}", format_delta(freshness.expires_at - now)));
    lines.push(format!("Data Size: {} bytes", entry.data.len()));
    lines.push(format!("Preview: {}", preview(&entry.data, preview_chars)));
    lines.push("-".repeat(RULE_WIDTH));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// First `limit` characters of the body, lossily decoded.
pub fn preview(data: &[u8], limit: usize) -> String {
    let text = String::from_utf8_lossy(data);
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(limit).collect();
    if chars.next().is_some() { format!("{head}...") } else { head }
}

/// Compact signed duration such as `1h2m3s` or `-45s`, rounded to seconds.
pub fn format_delta(delta: TimeDelta) -> String {
    let total = delta.num_seconds();
    if total == 0 {
        return "0s".to_string();
    }

    let sign = if total < 0 { "-" } else { "" };
    let secs = total.unsigned_abs();
    let (days, rem) = (secs / 86_400, secs % 86_400);
    let (hours, rem) = (rem / 3600, rem % 3600);
    let (minutes, seconds) = (rem / 60, rem % 60);

    let parts: String = [(days, "d"), (hours, "h"), (minutes, "m"), (seconds, "s")]
        .into_iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{value}{unit}"))
        .collect();
    format!("{sign}{parts}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_format_delta() {
        assert_eq!(format_delta(TimeDelta::zero()), "0s");
        assert_eq!(format_delta(TimeDelta::seconds(3723)), "1h2m3s");
        assert_eq!(format_delta(TimeDelta::seconds(-45)), "-45s");
        assert_eq!(format_delta(TimeDelta::days(2)), "2d");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        assert_eq!(preview("héllo".as_bytes(), 2), "hé...");
        assert_eq!(preview(b"short", 200), "short");
    }

    #[test]
    fn test_render_fresh_entry() {
        let fetched = at("2025-01-01T00:00:00Z");
        let entry = CacheEntry::new(b"body".to_vec(), "http://a/", "http://b/", Duration::from_secs(600), fetched);
        let freshness = entry.freshness(Duration::from_secs(600), at("2025-01-01T00:05:00Z"));

        let text = render("abc", &entry, &freshness, at("2025-01-01T00:05:00Z"), 200);
        assert!(text.contains("Cache Key: abc"));
        assert!(text.contains("Original URL: http://a/"));
        assert!(text.contains("Final URL: http://b/"));
        assert!(text.contains("Fetched At: 2025-01-01T00:00:00Z"));
        assert!(text.contains("Expires At: 2025-01-01T00:10:00Z"));
        assert!(text.contains("Time Until Expiration: 5m"));
        assert!(text.contains("Data Size: 4 bytes"));
    }

    #[test]
    fn test_render_hides_identical_final_url() {
        let entry = CacheEntry::new(Vec::new(), "http://a/", "http://a/", Duration::ZERO, Utc::now());
        let freshness = entry.freshness(Duration::ZERO, Utc::now());
        let text = render("k", &entry, &freshness, Utc::now(), 10);
        assert!(!text.contains("Final URL"));
    }

    #[test]
    fn test_render_legacy_entry() {
        let entry = CacheEntry::from_bytes(br#"{"data":"","url":"http://old/","expires_at":"2020-01-01T00:00:00Z"}"#).unwrap();
        let now = at("2020-01-01T00:01:00Z");
        let freshness = entry.freshness(Duration::from_secs(600), now);

        let text = render("k", &entry, &freshness, now, 10);
        assert!(freshness.expired);
        assert!(text.contains("legacy entry"));
        assert!(text.contains("Time Until Expiration: -1m"));
    }

    #[test]
    fn test_render_line_layout() {
        let now = at("2025-01-01T00:00:00Z");
        let entry = CacheEntry::new(b"x".to_vec(), "http://a/", "http://a/", Duration::from_secs(60), now);
        let freshness = entry.freshness(Duration::from_secs(60), now);

        let text = render("k", &entry, &freshness, now, 10);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "Cache Key: k");
        assert_eq!(lines[6], "Preview: x");
        assert_eq!(lines[7], "-".repeat(RULE_WIDTH));
        assert!(text.ends_with('\n'));
    }
}
