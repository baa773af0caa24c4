//! Normalized interval model.
//!
//! One `Interval` is derived from each `RawEvent` and never mutated after
//! normalization, except for the duplicate/conflict flags flipped by the
//! dedup pass.

use crate::models::{EventType, ShiftType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Anomaly and classification flags carried by an interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalFlags {
    /// Clock-in after the nominal start on a workday.
    pub late_arrival: bool,
    /// Clock-out before the nominal end on a workday.
    pub early_leave: bool,
    /// Clock-out missing.
    pub open_interval: bool,
    /// Same dedup signature already seen earlier in the input.
    pub duplicate: bool,
    /// Duplicate signatures with differing notes (set on both rows).
    pub conflict: bool,
    /// Any anomaly that a human should look at.
    pub needs_review: bool,
}

/// One normalized clock-in/clock-out interval.
///
/// Raw timestamps are kept as the export strings for audit; durations and
/// lateness figures are whole minutes. `event_key` is a content hash of the
/// material fields and identifies the interval independently of calendar
/// context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    /// Identifier of the person who badged.
    pub person_id: i64,
    /// Work date derived from the clock-in; `None` when the clock-in
    /// string was unparsable.
    pub work_date: Option<NaiveDate>,
    /// Whether the calendar bills the work date as a workday.
    pub is_workday: bool,
    /// Whether the work date is a public holiday.
    pub is_holiday: bool,
    /// Whether the work date is collective leave.
    pub is_collective_leave: bool,
    /// Clock-in exactly as exported.
    pub clock_in_raw: String,
    /// Clock-in after arrival normalization; the payroll start on
    /// workdays.
    pub clock_in_normalized: String,
    /// Clock-out exactly as exported. Absent for an open interval.
    pub clock_out_raw: Option<String>,
    /// Event kind code.
    pub event_type: EventType,
    /// Shift arrangement code.
    pub shift_type: ShiftType,
    /// Free-text note from the badge row.
    pub note: String,
    /// Badge reader address, when recorded.
    pub device_location: Option<String>,
    /// Whole minutes between raw clock-in and clock-out, floored at zero.
    pub duration_raw_minutes: i64,
    /// Whole minutes between the normalized start and clock-out, floored
    /// at zero; equals the raw duration on non-workdays and for WFH.
    pub duration_effective_minutes: i64,
    /// Exact minutes of lateness past the nominal start.
    pub late_minutes_raw: i64,
    /// Lateness after the grace-then-snap rule.
    pub late_minutes_normalized: i64,
    /// Minutes left before the nominal end.
    pub early_leave_minutes_raw: i64,
    /// Early leave is never normalized; kept for schema symmetry.
    pub early_leave_minutes_normalized: i64,
    /// Split shifts are exempt from all lateness discipline.
    pub is_split_shift: bool,
    /// Declared work-from-home attendance.
    pub is_wfh: bool,
    /// Misscan; excluded from all totals and reason derivation.
    pub is_ignored: bool,
    /// Anomaly flags.
    pub flags: IntervalFlags,
    /// SHA-256 hex digest of the material fields.
    pub event_key: String,
}

impl Interval {
    /// Returns true when the interval has a clock-out.
    pub fn is_closed(&self) -> bool {
        self.clock_out_raw.is_some()
    }

    /// Returns true when the interval participates in daily and period
    /// totals. Duplicates and misscans stay visible but never count.
    pub fn counts_toward_totals(&self) -> bool {
        !self.flags.duplicate && !self.is_ignored
    }
}
