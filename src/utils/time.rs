//! Time and timestamp utilities
//!
//! All persisted timestamps are ISO-8601 UTC strings with microsecond
//! precision, e.g. `2026-10-19T08:15:02.123456Z`.

use chrono::{DateTime, Duration, SecondsFormat, Utc};

/// Format a UTC instant the way the store persists it
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Current time as an ISO-8601 UTC string
pub fn now_iso8601() -> String {
    format_timestamp(Utc::now())
}

/// Parse a persisted timestamp; `None` when the string is not RFC 3339
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// A timestamp strictly later than `previous`.
///
/// Two saves inside the same microsecond, or a wall clock stepping backwards,
/// would otherwise leave `updated_at` unchanged.
pub fn next_timestamp(previous: &str) -> String {
    let now = Utc::now();
    match parse_timestamp(previous) {
        Some(prev) if now <= prev => format_timestamp(prev + Duration::microseconds(1)),
        _ => format_timestamp(now),
    }
}

/// Human-friendly age such as `3m ago`, used by the CLI views
pub fn humanize_since(value: &str) -> String {
    let Some(at) = parse_timestamp(value) else {
        return "never".to_string();
    };
    let secs = (Utc::now() - at).num_seconds().max(0);
    match secs {
        0..=59 => format!("{}s ago", secs),
        60..=3599 => format!("{}m ago", secs / 60),
        3600..=86399 => format!("{}h ago", secs / 3600),
        _ => format!("{}d ago", secs / 86400),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_format() {
        let now = now_iso8601();
        assert!(now.ends_with('Z'));
        assert!(parse_timestamp(&now).is_some());
    }

    #[test]
    fn test_next_timestamp_advances_past_future_value() {
        let future = format_timestamp(Utc::now() + Duration::hours(1));
        let next = next_timestamp(&future);
        assert!(next > future);
        assert_eq!(
            parse_timestamp(&next).unwrap() - parse_timestamp(&future).unwrap(),
            Duration::microseconds(1)
        );
    }

    #[test]
    fn test_next_timestamp_ignores_garbage() {
        let next = next_timestamp("not a date");
        assert!(parse_timestamp(&next).is_some());
    }

    #[test]
    fn test_humanize_since() {
        let ten_minutes_ago = format_timestamp(Utc::now() - Duration::minutes(10));
        assert_eq!(humanize_since(&ten_minutes_ago), "10m ago");
        assert_eq!(humanize_since(""), "never");
    }
}
