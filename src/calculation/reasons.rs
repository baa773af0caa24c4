//! Deterministic reason-code derivation.
//!
//! Every flagged day gets a stable, ordered set of codes explaining what a
//! reviewer will find there. Codes are derived from the intervals and the
//! finalized daily record; misscans are invisible here. The anti-gaming
//! check (an implausibly short closed interval) is the one derivation that
//! can still flip a day to needs-review.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::calculation::clock;
use crate::config::PolicyConfig;
use crate::models::{DailyRecord, EventType, Interval, ReasonCode};

/// Derives and assigns reason codes for every daily record in place.
pub fn assign_reason_codes(
    daily: &mut BTreeMap<(i64, NaiveDate), DailyRecord>,
    intervals: &[Interval],
    policy: &PolicyConfig,
) {
    let mut by_day: HashMap<(i64, NaiveDate), Vec<&Interval>> = HashMap::new();
    for interval in intervals {
        if interval.is_ignored {
            continue;
        }
        let Some(work_date) = interval.work_date else {
            continue;
        };
        by_day
            .entry((interval.person_id, work_date))
            .or_default()
            .push(interval);
    }

    let empty: Vec<&Interval> = Vec::new();
    for (key, record) in daily.iter_mut() {
        let day_intervals = by_day.get(key).unwrap_or(&empty);
        let mut codes = derive_codes(record, day_intervals, policy);

        codes.sort_by_key(|code| (code.priority(), code.as_str()));
        codes.dedup();

        record.review_reason_codes = codes
            .iter()
            .copied()
            .filter(|code| !code.is_info())
            .collect();
        record.info_reason_codes = codes.iter().copied().filter(|code| code.is_info()).collect();
        record.reason_codes = codes;
    }
}

fn derive_codes(
    record: &mut DailyRecord,
    day_intervals: &[&Interval],
    policy: &PolicyConfig,
) -> Vec<ReasonCode> {
    let discipline = policy.discipline();
    let site = policy.site();
    let mut codes = Vec::new();

    if record.missing_attendance_day {
        codes.push(ReasonCode::MissingDay);
    }

    for interval in day_intervals {
        if interval.flags.open_interval {
            codes.push(ReasonCode::OpenInterval);
        }
        if has_negative_span(interval) {
            codes.push(ReasonCode::NegativeDuration);
        }
        if interval.duration_raw_minutes > discipline.excessive_duration_minutes {
            codes.push(ReasonCode::ExcessiveDuration);
        }
        if !interval.shift_type.is_recognized() {
            codes.push(ReasonCode::UnknownShiftType);
        }
        if !interval.event_type.is_recognized() {
            codes.push(ReasonCode::UnknownEventType);
        }
        if interval.flags.duplicate {
            codes.push(ReasonCode::DuplicateInterval);
        }

        let wfh_contradiction =
            interval.is_wfh && site.is_onsite_reader(interval.device_location.as_deref());
        if wfh_contradiction {
            codes.push(ReasonCode::WfhConflict);
        }
        if interval.flags.conflict && !wfh_contradiction {
            codes.push(ReasonCode::ConflictingInterval);
        }

        if interval.is_split_shift
            && interval.duration_raw_minutes > 0
            && interval.duration_raw_minutes < discipline.split_shift_min_minutes
        {
            codes.push(ReasonCode::SplitShiftShort);
        }
    }

    if suspiciously_short(record, day_intervals, &codes, discipline.suspicious_short_max_minutes) {
        codes.push(ReasonCode::SuspiciousShortInterval);
        record.needs_review = true;
    }

    if record.late_minutes_raw_total > 0 {
        codes.push(ReasonCode::LateArrival);
    }
    if record.early_leave_minutes_raw_total > 0 {
        codes.push(ReasonCode::EarlyLeave);
    }
    if record.late_debt_minutes > 0 {
        codes.push(ReasonCode::WorktimeDeficit);
    }

    codes
}

/// Re-derives the negative span from the raw strings rather than trusting
/// a flag: a zeroed duration alone cannot distinguish a negative span from
/// a zero-length one.
fn has_negative_span(interval: &Interval) -> bool {
    let Some(start) = clock::parse_datetime(&interval.clock_in_raw) else {
        return false;
    };
    let Some(end) = interval
        .clock_out_raw
        .as_deref()
        .and_then(clock::parse_datetime)
    else {
        return false;
    };
    end < start
}

/// A day whose shortest closed interval is implausibly short, while real
/// badge evidence exists and nothing is still open, looks like a badge-only
/// appearance and goes to review.
fn suspiciously_short(
    record: &DailyRecord,
    day_intervals: &[&Interval],
    codes: &[ReasonCode],
    max_minutes: i64,
) -> bool {
    if !record.has_intervals() || record.missing_attendance_day {
        return false;
    }
    if codes.contains(&ReasonCode::OpenInterval) {
        return false;
    }
    let has_regular_closed = day_intervals
        .iter()
        .any(|interval| interval.event_type == EventType::Regular && interval.is_closed());
    if !has_regular_closed {
        return false;
    }
    day_intervals
        .iter()
        .filter(|interval| interval.is_closed())
        .map(|interval| interval.duration_raw_minutes)
        .min()
        .is_some_and(|shortest| shortest <= max_minutes)
}
