//! Duration strings.
//!
//! Accepts `<int>s`, `<int>ms` and `<int>m`, and falls back to a compound
//! form made of several `<int><unit>` groups (`1m30s`, `1h5m10s500ms`).
//! Units: `h`, `m`, `s`, `ms`.

use std::time::Duration;

/// Error returned when a duration string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DurationParseError {
    #[error("empty duration")]
    Empty,
    #[error("invalid duration `{0}`: expected <int>s, <int>ms, <int>m or a compound such as 1m30s")]
    Invalid(String),
    #[error("duration `{0}` is too large")]
    Overflow(String),
}

/// Parse a duration string such as `5s`, `250ms`, `2m` or `1m30s`.
pub fn parse_duration(input: &str) -> Result<Duration, DurationParseError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(DurationParseError::Empty);
    }

    if let Some(value) = simple(s) {
        return value.ok_or_else(|| DurationParseError::Overflow(s.to_string()));
    }

    compound(s)
}

/// Single `<int><unit>` group. `None` means "not this form".
fn simple(s: &str) -> Option<Option<Duration>> {
    // `ms` must be tried before `s` and `m`.
    if let Some(n) = s.strip_suffix("ms").and_then(digits) {
        return Some(Some(Duration::from_millis(n)));
    }
    if let Some(n) = s.strip_suffix('s').and_then(digits) {
        return Some(Some(Duration::from_secs(n)));
    }
    if let Some(n) = s.strip_suffix('m').and_then(digits) {
        return Some(n.checked_mul(60).map(Duration::from_secs));
    }
    None
}

fn digits(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn compound(s: &str) -> Result<Duration, DurationParseError> {
    let invalid = || DurationParseError::Invalid(s.to_string());
    let overflow = || DurationParseError::Overflow(s.to_string());

    let mut total = Duration::ZERO;
    let mut rest = s;

    while !rest.is_empty() {
        let split = rest.find(|c: char| !c.is_ascii_digit()).ok_or_else(invalid)?;
        let (number, tail) = rest.split_at(split);
        let value = digits(number).ok_or_else(invalid)?;

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_len);

        let part = match unit {
            "h" => value.checked_mul(3600).map(Duration::from_secs),
            "m" => value.checked_mul(60).map(Duration::from_secs),
            "s" => Some(Duration::from_secs(value)),
            "ms" => Some(Duration::from_millis(value)),
            _ => return Err(invalid()),
        }
        .ok_or_else(overflow)?;

        total = total.checked_add(part).ok_or_else(overflow)?;
        rest = tail;
    }

    Ok(total)
}

/// Render a duration in the syntax accepted by [`parse_duration`].
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis % 1000 == 0 {
        format!("{}s", millis / 1000)
    } else {
        format!("{}ms", millis)
    }
}

/// Serde adapter for duration strings in config files.
pub mod as_str {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_duration(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_units() {
        assert_eq!(parse_duration("5s").unwrap(), Duration::from_secs(5));
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
        assert_eq!(parse_duration(" 10s ").unwrap(), Duration::from_secs(10));
    }

    #[test]
    fn test_compound_fallback() {
        assert_eq!(parse_duration("1m30s").unwrap(), Duration::from_secs(90));
        assert_eq!(
            parse_duration("1h5m10s500ms").unwrap(),
            Duration::from_millis(3_910_500)
        );
        assert_eq!(parse_duration("1s500ms").unwrap(), Duration::from_millis(1500));
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse_duration(""), Err(DurationParseError::Empty));
        assert!(matches!(parse_duration("5"), Err(DurationParseError::Invalid(_))));
        assert!(matches!(parse_duration("s"), Err(DurationParseError::Invalid(_))));
        assert!(matches!(parse_duration("5d"), Err(DurationParseError::Invalid(_))));
        assert!(matches!(parse_duration("-5s"), Err(DurationParseError::Invalid(_))));
        assert!(matches!(parse_duration("1.5s"), Err(DurationParseError::Invalid(_))));
    }

    #[test]
    fn test_overflow() {
        let huge = format!("{}m", u64::MAX);
        assert!(matches!(parse_duration(&huge), Err(DurationParseError::Overflow(_))));
    }

    #[test]
    fn test_format_round_trips_through_parser() {
        for d in [Duration::from_secs(5), Duration::from_millis(1500)] {
            assert_eq!(parse_duration(&format_duration(d)).unwrap(), d);
        }
    }
}
