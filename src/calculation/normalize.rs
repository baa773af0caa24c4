//! Badge event normalization.
//!
//! Turns one raw badge event into one [`Interval`] with calendar context,
//! normalized lateness, effective duration and data-quality flags. Rules:
//!
//! - Lateness inside the grace window snaps to the flat 30-minute bucket and
//!   the shift is treated as starting on time.
//! - Lateness beyond the grace window keeps its exact size and the effective
//!   start moves to clock-in plus the big-late offset.
//! - Split shifts and work-from-home events keep their raw timing; lateness
//!   and early-leave normalization never applies to them.
//! - Anomalies (open, negative, zero-length, excessive, unparsable) never
//!   reject the event; they zero the affected durations and raise flags.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use sha2::{Digest, Sha256};

use crate::calculation::clock;
use crate::config::PolicyConfig;
use crate::models::{CalendarDay, EventType, Interval, IntervalFlags, RawEvent, ShiftType};

/// Stable audit identity for a raw badge event.
///
/// Hashes the event fields that make it unique from the importer's point of
/// view; the same row always hashes to the same key across runs.
///
/// # Examples
///
/// ```
/// use attendance_engine::calculation::event_key;
/// use attendance_engine::models::RawEvent;
///
/// let event = RawEvent {
///     person_id: 1012,
///     clock_in: "03/02/2025 07:28".to_string(),
///     clock_out: Some("03/02/2025 15:31".to_string()),
///     ..Default::default()
/// };
///
/// let key = event_key(&event);
/// assert_eq!(key.len(), 64);
/// assert_eq!(key, event_key(&event));
/// ```
pub fn event_key(event: &RawEvent) -> String {
    let clock_out = event.clock_out.as_deref().unwrap_or("");
    let payload = format!(
        "{}|{}|{}|{}|{}",
        event.person_id,
        event.clock_in,
        clock_out,
        event.event_type.code(),
        event.note
    );
    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    hex::encode(hasher.finalize())
}

/// Normalizes every raw event in input order.
pub fn normalize_events(
    events: &[RawEvent],
    calendar: &BTreeMap<NaiveDate, CalendarDay>,
    policy: &PolicyConfig,
) -> Vec<Interval> {
    events
        .iter()
        .map(|event| normalize_event(event, calendar, policy))
        .collect()
}

/// Normalizes a single raw badge event into an interval.
///
/// The calendar map provides workday, holiday and collective-leave context
/// for the clock-in date; dates absent from the calendar count as
/// non-workdays. Normalization is total: malformed events come back as
/// flagged intervals, never as errors.
pub fn normalize_event(
    event: &RawEvent,
    calendar: &BTreeMap<NaiveDate, CalendarDay>,
    policy: &PolicyConfig,
) -> Interval {
    let mut flags = IntervalFlags::default();
    let is_ignored = event.event_type == EventType::Misscan;
    let is_split_shift = event.shift_type == ShiftType::Split;

    if !event.shift_type.is_recognized() || !event.event_type.is_recognized() {
        flags.needs_review = true;
    }

    let clock_out_raw = event
        .clock_out
        .clone()
        .filter(|value| !value.trim().is_empty());

    let Some(clock_in) = clock::parse_datetime(&event.clock_in) else {
        flags.needs_review = true;
        return Interval {
            person_id: event.person_id,
            work_date: None,
            is_workday: false,
            is_holiday: false,
            is_collective_leave: false,
            clock_in_raw: event.clock_in.clone(),
            clock_in_normalized: event.clock_in.clone(),
            clock_out_raw,
            event_type: event.event_type,
            shift_type: event.shift_type,
            note: event.note.clone(),
            device_location: event.device_location.clone(),
            duration_raw_minutes: 0,
            duration_effective_minutes: 0,
            late_minutes_raw: 0,
            late_minutes_normalized: 0,
            early_leave_minutes_raw: 0,
            early_leave_minutes_normalized: 0,
            is_split_shift,
            is_wfh: policy.site().is_wfh_note(&event.note)
                || event.event_type == EventType::WorkFromHome,
            is_ignored,
            flags,
            event_key: event_key(event),
        };
    };

    let work_date = clock_in.date();
    let calendar_day = calendar.get(&work_date).copied();
    let is_workday = calendar_day.map(|day| day.is_workday).unwrap_or(false);
    let is_holiday = calendar_day.map(|day| day.is_holiday).unwrap_or(false);
    let is_collective_leave = calendar_day
        .map(|day| day.is_collective_leave)
        .unwrap_or(false);

    let is_wfh =
        policy.site().is_wfh_note(&event.note) || event.event_type == EventType::WorkFromHome;
    if is_wfh && policy.site().is_onsite_reader(event.device_location.as_deref()) {
        flags.conflict = true;
        flags.needs_review = true;
    }

    let discipline = policy.discipline();
    let mut duration_raw = 0;
    let mut clock_out_parsed = None;
    match clock_out_raw.as_deref() {
        None => {
            flags.open_interval = true;
            flags.needs_review = true;
        }
        Some(raw_out) => match clock::parse_datetime(raw_out) {
            None => flags.needs_review = true,
            Some(out) if out < clock_in => flags.needs_review = true,
            Some(out) => {
                clock_out_parsed = Some(out);
                duration_raw = clock::minutes_between(clock_in, out);
                if duration_raw == 0 {
                    flags.needs_review = true;
                }
                if duration_raw > discipline.excessive_duration_minutes {
                    flags.needs_review = true;
                }
            }
        },
    }

    if is_split_shift && duration_raw > 0 && duration_raw < discipline.split_shift_min_minutes {
        flags.needs_review = true;
    }

    // Lateness and early-leave normalization only applies to on-site
    // default-shift work on calendar workdays.
    let normalizes = is_workday && !is_wfh && !is_split_shift;
    let mut late_minutes_raw = 0;
    let mut late_minutes_normalized = 0;
    let mut early_leave_minutes_raw = 0;
    let mut early_leave_minutes_normalized = 0;
    let mut normalized_start = clock_in;

    if normalizes {
        let nominal_start = work_date.and_time(policy.workday().start_time);
        let nominal_end = work_date.and_time(policy.workday().end_time);
        let delta_start = clock::minutes_between(nominal_start, clock_in);

        if delta_start <= 0 {
            normalized_start = nominal_start;
        } else if delta_start <= discipline.late_grace_max_minutes {
            late_minutes_raw = delta_start;
            late_minutes_normalized = discipline.late_bucket_minutes;
            normalized_start = nominal_start;
            flags.late_arrival = true;
        } else {
            late_minutes_raw = delta_start;
            late_minutes_normalized = delta_start;
            normalized_start = clock::add_minutes(clock_in, discipline.big_late_offset_minutes);
            flags.late_arrival = true;
        }

        if let Some(out) = clock_out_parsed {
            let shortfall = clock::minutes_between(out, nominal_end);
            if shortfall > 0 {
                early_leave_minutes_raw = shortfall;
                early_leave_minutes_normalized = shortfall;
                flags.early_leave = true;
            }
        }
    }

    let mut duration_effective = duration_raw;
    if normalizes {
        duration_effective = match clock_out_parsed {
            Some(out) if normalized_start > out => {
                flags.needs_review = true;
                0
            }
            Some(out) => clock::minutes_between(normalized_start, out),
            None => 0,
        };
    }

    let clock_in_normalized = if normalizes {
        clock::format_datetime(normalized_start)
    } else {
        clock::format_datetime(clock_in)
    };

    Interval {
        person_id: event.person_id,
        work_date: Some(work_date),
        is_workday,
        is_holiday,
        is_collective_leave,
        clock_in_raw: event.clock_in.clone(),
        clock_in_normalized,
        clock_out_raw,
        event_type: event.event_type,
        shift_type: event.shift_type,
        note: event.note.clone(),
        device_location: event.device_location.clone(),
        duration_raw_minutes: duration_raw,
        duration_effective_minutes: duration_effective,
        late_minutes_raw,
        late_minutes_normalized,
        early_leave_minutes_raw,
        early_leave_minutes_normalized,
        is_split_shift,
        is_wfh,
        is_ignored,
        flags,
        event_key: event_key(event),
    }
}
