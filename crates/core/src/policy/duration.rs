//! TTL duration parsing for policy files.
//!
//! Accepts compound forms such as `1h30m`, fractional components like
//! `1.5h`, and a bare `0`. Units: `ns`, `us`/`µs`, `ms`, `s`, `m`, `h`, `d`.

use std::time::Duration;

use thiserror::Error;

/// Error type for duration parsing
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DurationParseError {
    #[error("empty duration string")]
    Empty,

    #[error("expected number before unit in {0:?}")]
    MissingNumber(String),

    #[error("missing unit after number in {0:?}")]
    MissingUnit(String),

    #[error("invalid number: {0}")]
    InvalidNumber(String),

    #[error("unknown unit {unit:?} in {input:?}")]
    UnknownUnit { unit: String, input: String },

    #[error("duration out of range: {0:?}")]
    Overflow(String),
}

/// Parse a policy TTL into a `Duration`.
///
/// Components are summed, so `1h30m` is ninety minutes. Whitespace between
/// components and signs are not accepted.
pub fn parse_duration(s: &str) -> Result<Duration, DurationParseError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(DurationParseError::Empty);
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }

    let mut total = Duration::ZERO;
    let mut rest = s;

    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_len == 0 {
            return Err(DurationParseError::MissingNumber(s.to_string()));
        }
        let (number, tail) = rest.split_at(number_len);

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        if unit_len == 0 {
            return Err(DurationParseError::MissingUnit(s.to_string()));
        }
        let (unit, tail) = tail.split_at(unit_len);

        let value: f64 = number
            .parse()
            .map_err(|_| DurationParseError::InvalidNumber(number.to_string()))?;

        let unit_secs = match unit {
            "ns" => 1e-9,
            "us" | "µs" => 1e-6,
            "ms" => 1e-3,
            "s" => 1.0,
            "m" => 60.0,
            "h" => 3600.0,
            "d" => 86_400.0,
            _ => return Err(DurationParseError::UnknownUnit { unit: unit.to_string(), input: s.to_string() }),
        };

        let component = Duration::try_from_secs_f64(value * unit_secs)
            .map_err(|_| DurationParseError::Overflow(s.to_string()))?;
        total = total
            .checked_add(component)
            .ok_or_else(|| DurationParseError::Overflow(s.to_string()))?;
        rest = tail;
    }

    Ok(total)
}
