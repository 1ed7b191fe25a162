//! Ordered URL-pattern to TTL policies.
//!
//! A policy file holds one `pattern=duration` rule per line:
//!
//! ```text
//! # news sites change often
//! .*\.example\.com=5m
//! ^https://static\.=7d   # assets
//! .*\.test\.com=0        # never cache
//! ```
//!
//! Rules are evaluated top to bottom and the first regex that matches
//! anywhere in the URL decides the TTL. A catch-all `.*` rule with
//! [`DEFAULT_TTL`] is always appended last, so resolution never fails.

pub mod duration;

use std::path::{Path, PathBuf};
use std::time::Duration;

use regex::Regex;

pub use duration::{DurationParseError, parse_duration};

/// TTL of the catch-all policy appended after every explicit rule.
pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

/// Pattern of the catch-all policy.
pub const DEFAULT_PATTERN: &str = ".*";

/// Error type for policy loading. Any error aborts the whole load.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("failed to read policies file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: invalid policy format (expected pattern=duration): {text}")]
    MissingSeparator { line: usize, text: String },

    #[error("line {line}: invalid regex pattern: {source}")]
    InvalidPattern {
        line: usize,
        #[source]
        source: regex::Error,
    },

    #[error("line {line}: invalid duration: {source}")]
    InvalidDuration {
        line: usize,
        #[source]
        source: DurationParseError,
    },
}

/// A single pattern/TTL rule.
#[derive(Debug, Clone)]
pub struct CachePolicy {
    pub pattern: Regex,
    pub ttl: Duration,
}

impl CachePolicy {
    pub fn new(pattern: Regex, ttl: Duration) -> Self {
        Self { pattern, ttl }
    }

    fn catch_all() -> Self {
        let pattern = Regex::new(DEFAULT_PATTERN).expect("catch-all pattern compiles");
        Self { pattern, ttl: DEFAULT_TTL }
    }

    /// Whether this rule applies to `url` (unanchored search).
    pub fn matches(&self, url: &str) -> bool {
        self.pattern.is_match(url)
    }
}

/// Ordered policy list terminated by the catch-all rule.
#[derive(Debug, Clone)]
pub struct PolicySet {
    policies: Vec<CachePolicy>,
}

impl Default for PolicySet {
    fn default() -> Self {
        Self { policies: vec![CachePolicy::catch_all()] }
    }
}

impl PolicySet {
    /// Build a set from explicit rules, keeping their order and appending
    /// the catch-all last.
    pub fn new(explicit: Vec<CachePolicy>) -> Self {
        let mut policies = explicit;
        policies.push(CachePolicy::catch_all());
        Self { policies }
    }

    /// Parse policy text.
    ///
    /// # Errors
    ///
    /// Returns the first malformed line as a `PolicyError`; no partial set
    /// is produced.
    pub fn parse(text: &str) -> Result<Self, PolicyError> {
        let mut explicit = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let mut line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(hash) = line.find('#') {
                line = line[..hash].trim();
            }

            let Some(sep) = line.rfind('=') else {
                return Err(PolicyError::MissingSeparator { line: line_no, text: line.to_string() });
            };
            let pattern = line[..sep].trim();
            let ttl = line[sep + 1..].trim();

            let pattern =
                Regex::new(pattern).map_err(|source| PolicyError::InvalidPattern { line: line_no, source })?;
            let ttl = parse_duration(ttl).map_err(|source| PolicyError::InvalidDuration { line: line_no, source })?;

            explicit.push(CachePolicy::new(pattern, ttl));
        }

        Ok(Self::new(explicit))
    }

    /// Load policies from a file.
    ///
    /// `None` or a file that does not exist yields the default-only set.
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::Read` for any other I/O failure, and parse
    /// errors from [`PolicySet::parse`].
    pub fn load(path: Option<&Path>) -> Result<Self, PolicyError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no policies file at {}, using default policy", path.display());
                return Ok(Self::default());
            }
            Err(source) => return Err(PolicyError::Read { path: path.to_path_buf(), source }),
        };

        let set = Self::parse(&text)?;
        tracing::debug!(policies = set.len(), "loaded cache policies from {}", path.display());
        Ok(set)
    }

    /// Resolve the TTL for `url`. A zero TTL means "do not cache".
    pub fn resolve_ttl(&self, url: &str) -> Duration {
        self.policies
            .iter()
            .find(|policy| policy.matches(url))
            .map_or(DEFAULT_TTL, |policy| policy.ttl)
    }

    /// All rules in evaluation order, catch-all included.
    pub fn policies(&self) -> &[CachePolicy] {
        &self.policies
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Always false; the catch-all is always present.
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}
