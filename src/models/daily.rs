//! Per-day attendance record and reason codes.

use crate::models::{DayType, PersonMode};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How a day's attendance figures came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceOrigin {
    /// Built from real badge events.
    BadgeEvents,
    /// Seeded from the calendar (holiday or collective-leave skeleton).
    CalendarAuto,
    /// Standardized from a manual entry such as a sick-leave row.
    ManualStandardized,
}

/// Payroll reason attached to a day's dominant paid bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceReason {
    /// Sick leave paid at 70%.
    SickLeave,
    /// Sick leave covered by HZZO at 100%.
    #[serde(rename = "SICK_LEAVE_HZZO_100")]
    SickLeaveHzzo100,
    /// Work performed on a holiday, paid at 150%.
    #[serde(rename = "WORK_ON_HOLIDAY_150")]
    WorkOnHoliday150,
    /// Auto-paid public holiday at 100%.
    #[serde(rename = "HOLIDAY_100")]
    Holiday100,
    /// Auto-paid collective leave at 100%.
    #[serde(rename = "COLLECTIVE_LEAVE_100")]
    CollectiveLeave100,
    /// Workday without any badge activity and no known cause.
    UnknownAbsence,
}

/// Deterministic anomaly and disciplinary code attached to a day.
///
/// Codes serialize in a fixed priority order: the missing-day marker
/// first, then data-integrity errors, policy markers, the anti-gaming
/// marker, and finally informational discipline codes. Ties within one
/// priority bucket break lexicographically by serialized name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    /// Workday with no badge activity at all.
    MissingDay,
    /// Interval without a clock-out.
    OpenInterval,
    /// Clock-out precedes clock-in.
    NegativeDuration,
    /// Closed interval longer than the configured maximum.
    ExcessiveDuration,
    /// Shift-type code outside the known set.
    UnknownShiftType,
    /// Event-type code outside the known set.
    UnknownEventType,
    /// Second occurrence of an identical dedup signature.
    DuplicateInterval,
    /// Duplicate signatures carrying different notes.
    ConflictingInterval,
    /// Split-shift interval shorter than the configured minimum.
    SplitShiftShort,
    /// Declared work-from-home recorded by an on-site badge reader.
    WfhConflict,
    /// Shortest closed interval of the day is implausibly short.
    SuspiciousShortInterval,
    /// Arrived after the nominal start.
    LateArrival,
    /// Left before the nominal end.
    EarlyLeave,
    /// Lateness debt accumulated on this day.
    WorktimeDeficit,
}

impl ReasonCode {
    /// Serialization priority bucket; lower sorts first.
    pub fn priority(&self) -> u8 {
        match self {
            ReasonCode::MissingDay => 0,
            ReasonCode::OpenInterval
            | ReasonCode::NegativeDuration
            | ReasonCode::ExcessiveDuration
            | ReasonCode::UnknownShiftType
            | ReasonCode::UnknownEventType
            | ReasonCode::DuplicateInterval
            | ReasonCode::ConflictingInterval => 1,
            ReasonCode::SplitShiftShort | ReasonCode::WfhConflict => 2,
            ReasonCode::SuspiciousShortInterval => 3,
            ReasonCode::LateArrival | ReasonCode::EarlyLeave | ReasonCode::WorktimeDeficit => 4,
        }
    }

    /// The serialized SCREAMING_SNAKE_CASE name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::MissingDay => "MISSING_DAY",
            ReasonCode::OpenInterval => "OPEN_INTERVAL",
            ReasonCode::NegativeDuration => "NEGATIVE_DURATION",
            ReasonCode::ExcessiveDuration => "EXCESSIVE_DURATION",
            ReasonCode::UnknownShiftType => "UNKNOWN_SHIFT_TYPE",
            ReasonCode::UnknownEventType => "UNKNOWN_EVENT_TYPE",
            ReasonCode::DuplicateInterval => "DUPLICATE_INTERVAL",
            ReasonCode::ConflictingInterval => "CONFLICTING_INTERVAL",
            ReasonCode::SplitShiftShort => "SPLIT_SHIFT_SHORT",
            ReasonCode::WfhConflict => "WFH_CONFLICT",
            ReasonCode::SuspiciousShortInterval => "SUSPICIOUS_SHORT_INTERVAL",
            ReasonCode::LateArrival => "LATE_ARRIVAL",
            ReasonCode::EarlyLeave => "EARLY_LEAVE",
            ReasonCode::WorktimeDeficit => "WORKTIME_DEFICIT",
        }
    }

    /// Informational discipline codes, as opposed to actionable review
    /// codes.
    pub fn is_info(&self) -> bool {
        matches!(
            self,
            ReasonCode::LateArrival | ReasonCode::EarlyLeave | ReasonCode::WorktimeDeficit
        )
    }
}

/// One person-day of aggregated attendance.
///
/// Created by folding intervals and calendar skeletons; mutated only during
/// the single aggregation pass and finalized afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Identifier of the person.
    pub person_id: i64,
    /// The day being aggregated.
    pub work_date: NaiveDate,
    /// Day classification; holiday and collective leave win over workday.
    pub day_type: DayType,
    /// How the figures came to exist.
    pub attendance_origin: AttendanceOrigin,
    /// Payroll reason for the dominant paid bucket, when one applies.
    pub attendance_reason: Option<AttendanceReason>,

    /// Number of intervals seen, including duplicates and misscans.
    pub interval_count: i64,
    /// On-site minutes between raw clock stamps, overlap-guarded.
    pub on_site_minutes_raw: i64,
    /// On-site minutes from the normalized start, overlap-guarded; the
    /// payroll basis on workdays.
    pub on_site_minutes_effective: i64,
    /// Declared work-from-home minutes, raw, overlap-guarded.
    pub wfh_minutes: i64,
    /// Sum of exact lateness minutes.
    pub late_minutes_raw_total: i64,
    /// Sum of grace-then-snap normalized lateness minutes.
    pub late_minutes_normalized_total: i64,
    /// Sum of exact early-leave minutes.
    pub early_leave_minutes_raw_total: i64,
    /// Early leave is never normalized; mirror of the raw sum.
    pub early_leave_minutes_normalized_total: i64,
    /// Discipline debt in minutes, scaled by the configured multiplier.
    pub late_debt_minutes: i64,
    /// Minutes worked past the nominal end on a workday.
    pub after_shift_minutes: i64,
    /// Early-arrival minutes that qualify as an overtime signal.
    pub early_overtime_minutes: i64,

    /// Auto-paid holiday minutes (100%).
    pub paid_holiday_100_minutes: i64,
    /// Auto-paid collective-leave minutes (100%).
    pub paid_collective_leave_100_minutes: i64,
    /// Sick-leave minutes paid at 70%.
    pub paid_sick_70_minutes: i64,
    /// HZZO-covered sick-leave minutes paid at 100%.
    pub paid_sick_hzzo_100_minutes: i64,
    /// Workplace-injury minutes paid at 100%. Placeholder: no event code
    /// feeds it, kept for payroll schema parity.
    pub paid_injury_100_minutes: i64,
    /// Maternity-compensation minutes paid at 100%. Placeholder, as above.
    pub paid_maternity_100_minutes: i64,
    /// Minutes paid at the 150% premium rate (non-workday work and
    /// holiday-work events).
    pub premium_150_minutes: i64,

    /// Payroll basis for on-site work: effective minutes on workdays, raw
    /// minutes otherwise.
    pub basis_on_site_minutes: i64,
    /// Payroll basis for work-from-home minutes.
    pub basis_wfh_minutes: i64,
    /// Presence KPI, capped at one nominal day.
    pub work_minutes: i64,
    /// After-shift plus qualified early-arrival minutes.
    pub overtime_signal_minutes: i64,

    /// Workday without any badge activity.
    pub missing_attendance_day: bool,
    /// A human must act on this day.
    pub needs_action: bool,
    /// A human should look at this day.
    pub needs_review: bool,
    /// Any lateness or early leave occurred.
    pub has_late_or_early_leave: bool,
    /// Any on-site presence was recorded.
    pub is_present_on_site: bool,
    /// The day is covered by a paid non-work bucket (sick variants).
    pub is_paid_non_work_attendance: bool,
    /// Workday with lateness or early leave; feeds the period counter.
    pub lateness_day: bool,

    /// All reason codes for the day, in priority order.
    pub reason_codes: Vec<ReasonCode>,
    /// Actionable data-quality subset of `reason_codes`.
    pub review_reason_codes: Vec<ReasonCode>,
    /// Informational discipline subset of `reason_codes`.
    pub info_reason_codes: Vec<ReasonCode>,

    /// Organizational group code, copied from the roster.
    pub group_code: Option<String>,
    /// Family name, copied from the roster.
    pub last_name: String,
    /// Given name, copied from the roster.
    pub first_name: String,
    /// Skeleton participation mode, copied from the roster.
    pub person_mode: PersonMode,
}

impl DailyRecord {
    /// Creates a zero-valued record for one person-day.
    pub fn new(person_id: i64, work_date: NaiveDate) -> Self {
        DailyRecord {
            person_id,
            work_date,
            day_type: DayType::NonWorkday,
            attendance_origin: AttendanceOrigin::BadgeEvents,
            attendance_reason: None,
            interval_count: 0,
            on_site_minutes_raw: 0,
            on_site_minutes_effective: 0,
            wfh_minutes: 0,
            late_minutes_raw_total: 0,
            late_minutes_normalized_total: 0,
            early_leave_minutes_raw_total: 0,
            early_leave_minutes_normalized_total: 0,
            late_debt_minutes: 0,
            after_shift_minutes: 0,
            early_overtime_minutes: 0,
            paid_holiday_100_minutes: 0,
            paid_collective_leave_100_minutes: 0,
            paid_sick_70_minutes: 0,
            paid_sick_hzzo_100_minutes: 0,
            paid_injury_100_minutes: 0,
            paid_maternity_100_minutes: 0,
            premium_150_minutes: 0,
            basis_on_site_minutes: 0,
            basis_wfh_minutes: 0,
            work_minutes: 0,
            overtime_signal_minutes: 0,
            missing_attendance_day: false,
            needs_action: false,
            needs_review: false,
            has_late_or_early_leave: false,
            is_present_on_site: false,
            is_paid_non_work_attendance: false,
            lateness_day: false,
            reason_codes: Vec::new(),
            review_reason_codes: Vec::new(),
            info_reason_codes: Vec::new(),
            group_code: None,
            last_name: String::new(),
            first_name: String::new(),
            person_mode: PersonMode::Full,
        }
    }

    /// Returns true when at least one interval was folded into this day.
    pub fn has_intervals(&self) -> bool {
        self.interval_count > 0
    }

    /// Sum of all paid non-work buckets (holiday, collective leave, sick
    /// variants, injury, maternity). The 150% premium is not part of it.
    pub fn nonwork_paid_minutes(&self) -> i64 {
        self.paid_holiday_100_minutes
            + self.paid_collective_leave_100_minutes
            + self.paid_sick_70_minutes
            + self.paid_sick_hzzo_100_minutes
            + self.paid_injury_100_minutes
            + self.paid_maternity_100_minutes
    }

    /// Returns true when the day carries any review or action flag.
    pub fn has_review_or_action(&self) -> bool {
        self.needs_review || self.needs_action || self.missing_attendance_day
    }
}
