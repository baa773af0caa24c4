//! Raw badge-clock event model and its coded enums.
//!
//! Events arrive from the badge hardware export with integer codes for the
//! shift arrangement and the event kind. The codes are modeled as closed
//! enums with an explicit `Unrecognized` arm, so out-of-range values survive
//! intake and are flagged for review instead of being rejected.

use serde::{Deserialize, Serialize};

/// Shift arrangement code attached to a badge event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum ShiftType {
    /// Single continuous shift (code 0).
    Default,
    /// Split shift, exempt from lateness discipline (code 1).
    Split,
    /// Any other code; forces `needs_review` downstream.
    Unrecognized(i64),
}

impl ShiftType {
    /// Returns the raw integer code.
    pub fn code(&self) -> i64 {
        (*self).into()
    }

    /// Returns true when the code is one of the known values.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, ShiftType::Unrecognized(_))
    }
}

impl Default for ShiftType {
    fn default() -> Self {
        ShiftType::Default
    }
}

impl From<i64> for ShiftType {
    fn from(code: i64) -> Self {
        match code {
            0 => ShiftType::Default,
            1 => ShiftType::Split,
            other => ShiftType::Unrecognized(other),
        }
    }
}

impl From<ShiftType> for i64 {
    fn from(value: ShiftType) -> Self {
        match value {
            ShiftType::Default => 0,
            ShiftType::Split => 1,
            ShiftType::Unrecognized(code) => code,
        }
    }
}

/// Event kind code attached to a badge event.
///
/// Codes follow the badge export convention: 0 is a regular scan pair,
/// 3/9 are sick-leave variants, 7 marks work performed on a holiday, and
/// 90 is a misscan that must stay visible for audit but never counts.
///
/// # Example
///
/// ```
/// use attendance_engine::models::EventType;
///
/// assert_eq!(EventType::from(7), EventType::HolidayWork);
/// assert_eq!(EventType::from(42), EventType::Unrecognized(42));
/// assert_eq!(EventType::Misscan.code(), 90);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum EventType {
    /// Regular attendance scan pair (code 0).
    Regular,
    /// Sick leave paid at 70% (code 3).
    Sick,
    /// Annual leave (code 4).
    AnnualLeave,
    /// Public holiday marker (code 5).
    Holiday,
    /// Declared work-from-home day (code 6).
    WorkFromHome,
    /// Work performed on a holiday, paid at the 150% premium (code 7).
    HolidayWork,
    /// Maternity leave (code 8).
    Maternity,
    /// Sick leave covered by HZZO at 100% (code 9).
    SickHzzo,
    /// Misscan; visible for audit, excluded from every total (code 90).
    Misscan,
    /// Any other code; forces `needs_review` downstream.
    Unrecognized(i64),
}

impl EventType {
    /// Returns the raw integer code.
    pub fn code(&self) -> i64 {
        (*self).into()
    }

    /// Returns true when the code is one of the known values.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, EventType::Unrecognized(_))
    }
}

impl Default for EventType {
    fn default() -> Self {
        EventType::Regular
    }
}

impl From<i64> for EventType {
    fn from(code: i64) -> Self {
        match code {
            0 => EventType::Regular,
            3 => EventType::Sick,
            4 => EventType::AnnualLeave,
            5 => EventType::Holiday,
            6 => EventType::WorkFromHome,
            7 => EventType::HolidayWork,
            8 => EventType::Maternity,
            9 => EventType::SickHzzo,
            90 => EventType::Misscan,
            other => EventType::Unrecognized(other),
        }
    }
}

impl From<EventType> for i64 {
    fn from(value: EventType) -> Self {
        match value {
            EventType::Regular => 0,
            EventType::Sick => 3,
            EventType::AnnualLeave => 4,
            EventType::Holiday => 5,
            EventType::WorkFromHome => 6,
            EventType::HolidayWork => 7,
            EventType::Maternity => 8,
            EventType::SickHzzo => 9,
            EventType::Misscan => 90,
            EventType::Unrecognized(code) => code,
        }
    }
}

/// One raw clock-in/clock-out row as exported by the badge system.
///
/// Timestamps are kept as the export's `DD/MM/YYYY HH:MM` strings; parsing
/// happens during interval normalization so unparsable rows degrade to a
/// review flag instead of failing intake.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Identifier of the person who badged.
    pub person_id: i64,
    /// Clock-in timestamp string (`DD/MM/YYYY HH:MM`). Required.
    pub clock_in: String,
    /// Clock-out timestamp string. Absent for an open interval.
    #[serde(default)]
    pub clock_out: Option<String>,
    /// Shift arrangement code.
    #[serde(default)]
    pub shift_type: ShiftType,
    /// Event kind code.
    #[serde(default)]
    pub event_type: EventType,
    /// Free-text note attached by the operator or the badge terminal.
    #[serde(default)]
    pub note: String,
    /// Address of the badge reader that recorded the event, when known.
    #[serde(default)]
    pub device_location: Option<String>,
}
