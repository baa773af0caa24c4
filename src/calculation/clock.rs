//! Fixed-pattern time parsing and formatting for badge exports.
//!
//! The badge hardware exports timestamps as `DD/MM/YYYY HH:MM`. Parsing is
//! lenient only about surrounding whitespace; anything else returns `None`
//! so the caller can degrade the row to a review flag.

use chrono::{NaiveDateTime, TimeDelta};

/// The timestamp pattern used by the badge export.
pub const BADGE_DATETIME_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Parses a badge timestamp string.
///
/// # Examples
///
/// ```
/// use attendance_engine::calculation::parse_datetime;
///
/// let parsed = parse_datetime("03/02/2025 07:31").unwrap();
/// assert_eq!(parsed.to_string(), "2025-02-03 07:31:00");
///
/// assert!(parse_datetime("2025-02-03 07:31").is_none());
/// assert!(parse_datetime("").is_none());
/// ```
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), BADGE_DATETIME_FORMAT).ok()
}

/// Formats a timestamp back into the badge export pattern.
///
/// # Examples
///
/// ```
/// use attendance_engine::calculation::{format_datetime, parse_datetime};
///
/// let parsed = parse_datetime("03/02/2025 07:31").unwrap();
/// assert_eq!(format_datetime(parsed), "03/02/2025 07:31");
/// ```
pub fn format_datetime(value: NaiveDateTime) -> String {
    value.format(BADGE_DATETIME_FORMAT).to_string()
}

/// Whole minutes from `start` to `end`; negative when `end` precedes
/// `start`.
///
/// # Examples
///
/// ```
/// use attendance_engine::calculation::{minutes_between, parse_datetime};
///
/// let start = parse_datetime("03/02/2025 07:30").unwrap();
/// let end = parse_datetime("03/02/2025 15:30").unwrap();
/// assert_eq!(minutes_between(start, end), 480);
/// assert_eq!(minutes_between(end, start), -480);
/// ```
pub fn minutes_between(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    (end - start).num_minutes()
}

/// Adds whole minutes to a timestamp.
pub fn add_minutes(value: NaiveDateTime, minutes: i64) -> NaiveDateTime {
    value + TimeDelta::minutes(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_surrounding_whitespace() {
        let parsed = parse_datetime("  03/02/2025 07:31  ").unwrap();
        assert_eq!(format_datetime(parsed), "03/02/2025 07:31");
    }

    #[test]
    fn test_parse_rejects_iso_and_garbage() {
        assert!(parse_datetime("2025-02-03T07:31:00").is_none());
        assert!(parse_datetime("03/02/2025").is_none());
        assert!(parse_datetime("not a time").is_none());
    }

    #[test]
    fn test_parse_rejects_impossible_dates() {
        assert!(parse_datetime("31/02/2025 08:00").is_none());
        assert!(parse_datetime("03/13/2025 08:00").is_none());
    }

    #[test]
    fn test_minutes_between_spans_midnight() {
        let start = parse_datetime("03/02/2025 22:00").unwrap();
        let end = parse_datetime("04/02/2025 06:00").unwrap();
        assert_eq!(minutes_between(start, end), 480);
    }

    #[test]
    fn test_add_minutes() {
        let start = parse_datetime("03/02/2025 08:10").unwrap();
        assert_eq!(format_datetime(add_minutes(start, 5)), "03/02/2025 08:15");
        assert_eq!(format_datetime(add_minutes(start, -40)), "03/02/2025 07:30");
    }

    #[test]
    fn test_round_trip_preserves_minute_precision() {
        let raw = "28/02/2025 23:59";
        let parsed = parse_datetime(raw).unwrap();
        assert_eq!(format_datetime(parsed), raw);
    }
}
