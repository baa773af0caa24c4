//! Work-calendar day model and day-type classification.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a calendar day for payroll purposes.
///
/// Holiday and collective-leave classification take precedence over the
/// plain workday flag: a day can be flagged as a workday in the calendar
/// and still be treated as a holiday downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayType {
    /// Ordinary billable workday.
    Workday,
    /// Public holiday.
    Holiday,
    /// Company-wide collective leave day.
    CollectiveLeave,
    /// Weekend or other non-billable day.
    NonWorkday,
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DayType::Workday => "WORKDAY",
            DayType::Holiday => "HOLIDAY",
            DayType::CollectiveLeave => "COLLECTIVE_LEAVE",
            DayType::NonWorkday => "NON_WORKDAY",
        };
        write!(f, "{}", s)
    }
}

/// One resolved day of the work calendar.
///
/// The intake layer resolves `is_collective_leave` from the raw calendar
/// note before the day reaches the engine; the engine never parses
/// calendar text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    /// The calendar date.
    pub date: NaiveDate,
    /// Whether the calendar bills this day as a workday.
    pub is_workday: bool,
    /// Whether this day is a public holiday.
    pub is_holiday: bool,
    /// Whether this day is company-wide collective leave.
    pub is_collective_leave: bool,
}

impl CalendarDay {
    /// Classifies the day, holiday and collective leave taking precedence
    /// over the workday flag.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::models::{CalendarDay, DayType};
    /// use chrono::NaiveDate;
    ///
    /// let day = CalendarDay {
    ///     date: NaiveDate::from_ymd_opt(2025, 2, 17).unwrap(),
    ///     is_workday: true,
    ///     is_holiday: true,
    ///     is_collective_leave: false,
    /// };
    /// assert_eq!(day.day_type(), DayType::Holiday);
    /// ```
    pub fn day_type(&self) -> DayType {
        if self.is_holiday {
            DayType::Holiday
        } else if self.is_collective_leave {
            DayType::CollectiveLeave
        } else if self.is_workday {
            DayType::Workday
        } else {
            DayType::NonWorkday
        }
    }

    /// Returns true for Monday through Friday.
    ///
    /// Holiday and collective-leave pay is gated on the weekday: a holiday
    /// falling on a weekend is not auto-paid.
    pub fn is_weekday(&self) -> bool {
        is_weekday(self.date)
    }
}

/// Returns true when the date falls on Monday through Friday.
pub fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn calendar_day(date_str: &str, workday: bool, holiday: bool, cl: bool) -> CalendarDay {
        CalendarDay {
            date: make_date(date_str),
            is_workday: workday,
            is_holiday: holiday,
            is_collective_leave: cl,
        }
    }

    #[test]
    fn test_holiday_wins_over_workday_flag() {
        let day = calendar_day("2025-02-17", true, true, false);
        assert_eq!(day.day_type(), DayType::Holiday);
    }

    #[test]
    fn test_collective_leave_wins_over_workday_flag() {
        let day = calendar_day("2025-02-18", true, false, true);
        assert_eq!(day.day_type(), DayType::CollectiveLeave);
    }

    #[test]
    fn test_holiday_wins_over_collective_leave() {
        let day = calendar_day("2025-02-19", false, true, true);
        assert_eq!(day.day_type(), DayType::Holiday);
    }

    #[test]
    fn test_plain_workday() {
        let day = calendar_day("2025-02-20", true, false, false);
        assert_eq!(day.day_type(), DayType::Workday);
    }

    #[test]
    fn test_weekend_is_non_workday() {
        // 2025-02-22 is a Saturday
        let day = calendar_day("2025-02-22", false, false, false);
        assert_eq!(day.day_type(), DayType::NonWorkday);
        assert!(!day.is_weekday());
    }

    #[test]
    fn test_is_weekday_monday_through_friday() {
        // 2025-02-17 is a Monday, 2025-02-21 a Friday
        assert!(calendar_day("2025-02-17", true, false, false).is_weekday());
        assert!(calendar_day("2025-02-21", true, false, false).is_weekday());
        assert!(!calendar_day("2025-02-23", false, false, false).is_weekday());
    }

    #[test]
    fn test_day_type_serializes_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&DayType::Workday).unwrap(),
            "\"WORKDAY\""
        );
        assert_eq!(
            serde_json::to_string(&DayType::CollectiveLeave).unwrap(),
            "\"COLLECTIVE_LEAVE\""
        );
        assert_eq!(
            serde_json::to_string(&DayType::NonWorkday).unwrap(),
            "\"NON_WORKDAY\""
        );
    }

    #[test]
    fn test_day_type_display_matches_serialization() {
        assert_eq!(DayType::Holiday.to_string(), "HOLIDAY");
        assert_eq!(DayType::CollectiveLeave.to_string(), "COLLECTIVE_LEAVE");
    }
}
