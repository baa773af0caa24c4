//! Daily attendance aggregation.
//!
//! Folds flagged intervals into one record per person per day, seeds
//! calendar skeletons for holidays and collective leave, creates missing-day
//! records for expected-but-absent people, and finalizes day type, paid
//! buckets and derived presence figures.
//!
//! Overlap guarding: presence minutes accumulate against a high-watermark
//! per person-day, so two intervals covering the same wall-clock span never
//! count the same minute twice. An interval fully swallowed by the
//! watermark contributes zero and marks the day for review.

use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::calculation::clock;
use crate::config::PolicyConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceOrigin, AttendanceReason, CalendarDay, DailyRecord, DayType, EventType, Interval,
    Period, Person, PersonMode, is_weekday,
};

/// High-watermark ends for one person-day, kept outside the record so the
/// serialized output never carries fold state.
#[derive(Debug, Default, Clone, Copy)]
struct Watermarks {
    on_site_raw_end: Option<NaiveDateTime>,
    on_site_effective_end: Option<NaiveDateTime>,
    wfh_end: Option<NaiveDateTime>,
}

/// Aggregates flagged intervals into finalized per-day records.
///
/// The returned map is keyed by `(person_id, work_date)` and therefore
/// iterates in a stable order. Intervals without a work date or outside the
/// period contribute nothing here; they stay visible in the interval
/// results.
pub fn aggregate_daily(
    intervals: &[Interval],
    calendar: &BTreeMap<NaiveDate, CalendarDay>,
    people: &BTreeMap<i64, Person>,
    period: &Period,
    policy: &PolicyConfig,
) -> EngineResult<BTreeMap<(i64, NaiveDate), DailyRecord>> {
    let mut records: BTreeMap<(i64, NaiveDate), DailyRecord> = BTreeMap::new();

    seed_calendar_skeletons(&mut records, calendar, people, period);
    fold_intervals(&mut records, intervals, period, policy)?;
    create_missing_day_records(&mut records, calendar, people, period);
    finalize_records(&mut records, calendar, people, policy);
    check_accumulators(&records)?;
    filter_records(&mut records);

    Ok(records)
}

fn period_days(period: &Period) -> impl Iterator<Item = NaiveDate> {
    let last = period.date_to;
    period
        .date_from
        .iter_days()
        .take_while(move |date| *date <= last)
}

/// Every full-mode person gets a skeleton record for each holiday and
/// collective-leave date of the period, whether or not they badged.
fn seed_calendar_skeletons(
    records: &mut BTreeMap<(i64, NaiveDate), DailyRecord>,
    calendar: &BTreeMap<NaiveDate, CalendarDay>,
    people: &BTreeMap<i64, Person>,
    period: &Period,
) {
    for date in period_days(period) {
        let Some(day) = calendar.get(&date) else {
            continue;
        };
        if !(day.is_holiday || day.is_collective_leave) {
            continue;
        }
        for person in people.values().filter(|person| !person.is_slim()) {
            records.entry((person.id, date)).or_insert_with(|| {
                let mut record = DailyRecord::new(person.id, date);
                record.attendance_origin = AttendanceOrigin::CalendarAuto;
                record
            });
        }
    }
}

fn fold_intervals(
    records: &mut BTreeMap<(i64, NaiveDate), DailyRecord>,
    intervals: &[Interval],
    period: &Period,
    policy: &PolicyConfig,
) -> EngineResult<()> {
    let workday = policy.workday();
    let discipline = policy.discipline();
    let mut watermarks: HashMap<(i64, NaiveDate), Watermarks> = HashMap::new();

    for interval in intervals {
        let Some(work_date) = interval.work_date else {
            continue;
        };
        if !period.contains(work_date) {
            continue;
        }

        let key = (interval.person_id, work_date);
        let record = records
            .entry(key)
            .or_insert_with(|| DailyRecord::new(interval.person_id, work_date));
        record.interval_count += 1;

        if interval.is_ignored {
            continue;
        }
        if interval.flags.needs_review {
            record.needs_review = true;
        }
        if interval.flags.duplicate {
            continue;
        }

        // Sick variants standardize to a paid bucket and skip presence.
        match interval.event_type {
            EventType::Sick => {
                record.paid_sick_70_minutes +=
                    standardized_sick_minutes(interval, workday.minutes_per_day);
                record.attendance_origin = AttendanceOrigin::ManualStandardized;
                record.is_paid_non_work_attendance = true;
                if record.attendance_reason.is_none() {
                    record.attendance_reason = Some(AttendanceReason::SickLeave);
                }
                continue;
            }
            EventType::SickHzzo => {
                record.paid_sick_hzzo_100_minutes +=
                    standardized_sick_minutes(interval, workday.minutes_per_day);
                record.attendance_origin = AttendanceOrigin::ManualStandardized;
                record.is_paid_non_work_attendance = true;
                if record.attendance_reason.is_none() {
                    record.attendance_reason = Some(AttendanceReason::SickLeaveHzzo100);
                }
                continue;
            }
            _ => {}
        }

        let is_holiday_work = interval.event_type == EventType::HolidayWork;
        if is_holiday_work {
            record.premium_150_minutes += interval.duration_raw_minutes.max(0);
            if record.attendance_reason.is_none() {
                record.attendance_reason = Some(AttendanceReason::WorkOnHoliday150);
            }
        }

        let start = clock::parse_datetime(&interval.clock_in_raw);
        let end = interval
            .clock_out_raw
            .as_deref()
            .and_then(clock::parse_datetime);
        let marks = watermarks.entry(key).or_default();

        if interval.is_wfh {
            if let (Some(start), Some(end)) = (start, end) {
                if end > start {
                    let (minutes, swallowed) = guarded_add(start, end, &mut marks.wfh_end);
                    record.wfh_minutes += minutes;
                    if swallowed {
                        record.needs_review = true;
                    }
                }
            }
            continue;
        }

        if let (Some(start), Some(end)) = (start, end) {
            if end > start {
                let (raw_minutes, swallowed) = guarded_add(start, end, &mut marks.on_site_raw_end);
                record.on_site_minutes_raw += raw_minutes;
                if swallowed {
                    record.needs_review = true;
                }

                // Holiday work is paid through the premium bucket; it never
                // enters the effective basis.
                if !is_holiday_work {
                    let effective_start = if interval.is_workday && !interval.is_split_shift {
                        clock::parse_datetime(&interval.clock_in_normalized).unwrap_or(start)
                    } else {
                        start
                    };
                    let (effective_minutes, _) =
                        guarded_add(effective_start, end, &mut marks.on_site_effective_end);
                    record.on_site_minutes_effective += effective_minutes;
                }
            }
        }

        if is_holiday_work {
            continue;
        }

        if interval.is_workday && !interval.is_split_shift {
            record.late_minutes_raw_total += interval.late_minutes_raw;
            record.late_minutes_normalized_total += interval.late_minutes_normalized;
            record.early_leave_minutes_raw_total += interval.early_leave_minutes_raw;
            record.early_leave_minutes_normalized_total += interval.early_leave_minutes_normalized;
            if interval.late_minutes_raw > 0 || interval.early_leave_minutes_raw > 0 {
                record.has_late_or_early_leave = true;
            }

            let debt_base = interval.late_minutes_normalized + interval.early_leave_minutes_raw;
            if debt_base > 0 {
                let scaled = (Decimal::from(debt_base) * discipline.late_debt_multiplier).floor();
                let debt = scaled
                    .to_i64()
                    .ok_or_else(|| EngineError::InvariantViolation {
                        person_id: interval.person_id,
                        work_date,
                        detail: format!("late debt does not fit a minute count: {scaled}"),
                    })?;
                record.late_debt_minutes += debt;
            }

            if let (Some(start), Some(end)) = (start, end) {
                let nominal_start = work_date.and_time(workday.start_time);
                let nominal_end = work_date.and_time(workday.end_time);

                let early_arrival = clock::minutes_between(start, nominal_start).max(0);
                if early_arrival > discipline.early_overtime_threshold_minutes {
                    record.early_overtime_minutes +=
                        (early_arrival - discipline.early_overtime_deduct_minutes).max(0);
                }
                record.after_shift_minutes += clock::minutes_between(nominal_end, end).max(0);
            }
        }
    }

    Ok(())
}

/// Sick rows carry their manual span when one was entered, capped at one
/// nominal day; spanless rows standardize to the full day.
fn standardized_sick_minutes(interval: &Interval, minutes_per_day: i64) -> i64 {
    if interval.duration_raw_minutes > 0 {
        interval.duration_raw_minutes.min(minutes_per_day)
    } else {
        minutes_per_day
    }
}

fn guarded_add(
    start: NaiveDateTime,
    end: NaiveDateTime,
    watermark: &mut Option<NaiveDateTime>,
) -> (i64, bool) {
    let clamped = match *watermark {
        Some(mark) if mark > start => mark,
        _ => start,
    };
    let minutes = if clamped < end {
        clock::minutes_between(clamped, end)
    } else {
        0
    };
    let swallowed = clamped > start && clamped >= end;
    let advanced = match *watermark {
        Some(mark) if mark > end => mark,
        _ => end,
    };
    *watermark = Some(advanced);
    (minutes, swallowed)
}

/// Full-mode people are expected on every plain workday of the period; a
/// workday without a single interval becomes an actionable missing-day
/// record.
fn create_missing_day_records(
    records: &mut BTreeMap<(i64, NaiveDate), DailyRecord>,
    calendar: &BTreeMap<NaiveDate, CalendarDay>,
    people: &BTreeMap<i64, Person>,
    period: &Period,
) {
    for date in period_days(period) {
        let Some(day) = calendar.get(&date) else {
            continue;
        };
        if day.day_type() != DayType::Workday {
            continue;
        }
        for person in people.values().filter(|person| !person.is_slim()) {
            let record = records.entry((person.id, date)).or_insert_with(|| {
                let mut record = DailyRecord::new(person.id, date);
                record.attendance_origin = AttendanceOrigin::CalendarAuto;
                record
            });
            if !record.has_intervals() {
                record.missing_attendance_day = true;
                record.needs_action = true;
                if record.attendance_reason.is_none() {
                    record.attendance_reason = Some(AttendanceReason::UnknownAbsence);
                }
            }
        }
    }
}

fn finalize_records(
    records: &mut BTreeMap<(i64, NaiveDate), DailyRecord>,
    calendar: &BTreeMap<NaiveDate, CalendarDay>,
    people: &BTreeMap<i64, Person>,
    policy: &PolicyConfig,
) {
    let minutes_per_day = policy.workday().minutes_per_day;

    for ((person_id, date), record) in records.iter_mut() {
        record.day_type = calendar
            .get(date)
            .map(|day| day.day_type())
            .unwrap_or(DayType::NonWorkday);

        let person = people.get(person_id);
        if let Some(person) = person {
            record.group_code = person.group_code.clone();
            record.last_name = person.last_name.clone();
            record.first_name = person.first_name.clone();
            record.person_mode = person.mode;
        }
        let auto_paid = person.map(|person| !person.is_slim()).unwrap_or(false);

        match record.day_type {
            DayType::Holiday if auto_paid && is_weekday(*date) => {
                record.paid_holiday_100_minutes = minutes_per_day;
                record.is_paid_non_work_attendance = true;
                if record.attendance_reason.is_none() {
                    record.attendance_reason = Some(AttendanceReason::Holiday100);
                }
                if !record.has_intervals() {
                    record.attendance_origin = AttendanceOrigin::CalendarAuto;
                }
            }
            DayType::CollectiveLeave if auto_paid && is_weekday(*date) => {
                record.paid_collective_leave_100_minutes = minutes_per_day;
                record.is_paid_non_work_attendance = true;
                if record.attendance_reason.is_none() {
                    record.attendance_reason = Some(AttendanceReason::CollectiveLeave100);
                }
                if !record.has_intervals() {
                    record.attendance_origin = AttendanceOrigin::CalendarAuto;
                }
            }
            _ => {}
        }

        // Every on-site minute on a day the calendar does not bill as a
        // workday is premium, net of what holiday-work events already added.
        if record.day_type != DayType::Workday && record.on_site_minutes_raw > 0 {
            let uncovered = record.on_site_minutes_raw - record.premium_150_minutes;
            if uncovered > 0 {
                record.premium_150_minutes += uncovered;
            }
        }

        record.basis_on_site_minutes = if record.day_type == DayType::Workday {
            record.on_site_minutes_effective
        } else {
            record.on_site_minutes_raw
        };
        record.basis_wfh_minutes = record.wfh_minutes;
        record.work_minutes =
            (record.basis_on_site_minutes + record.basis_wfh_minutes).min(minutes_per_day);
        record.overtime_signal_minutes =
            (record.after_shift_minutes + record.early_overtime_minutes).max(0);
        record.is_present_on_site = record.on_site_minutes_raw > 0;
        record.lateness_day = record.day_type == DayType::Workday && record.has_late_or_early_leave;
    }
}

/// Minute accumulators must never go negative; a negative value means the
/// fold itself is broken and the whole run is untrustworthy.
fn check_accumulators(records: &BTreeMap<(i64, NaiveDate), DailyRecord>) -> EngineResult<()> {
    for ((person_id, date), record) in records.iter() {
        let accumulators = [
            ("interval_count", record.interval_count),
            ("on_site_minutes_raw", record.on_site_minutes_raw),
            ("on_site_minutes_effective", record.on_site_minutes_effective),
            ("wfh_minutes", record.wfh_minutes),
            ("late_minutes_raw_total", record.late_minutes_raw_total),
            (
                "late_minutes_normalized_total",
                record.late_minutes_normalized_total,
            ),
            (
                "early_leave_minutes_raw_total",
                record.early_leave_minutes_raw_total,
            ),
            ("late_debt_minutes", record.late_debt_minutes),
            ("after_shift_minutes", record.after_shift_minutes),
            ("early_overtime_minutes", record.early_overtime_minutes),
            ("paid_holiday_100_minutes", record.paid_holiday_100_minutes),
            (
                "paid_collective_leave_100_minutes",
                record.paid_collective_leave_100_minutes,
            ),
            ("paid_sick_70_minutes", record.paid_sick_70_minutes),
            (
                "paid_sick_hzzo_100_minutes",
                record.paid_sick_hzzo_100_minutes,
            ),
            ("premium_150_minutes", record.premium_150_minutes),
            ("basis_on_site_minutes", record.basis_on_site_minutes),
            ("basis_wfh_minutes", record.basis_wfh_minutes),
            ("work_minutes", record.work_minutes),
            ("overtime_signal_minutes", record.overtime_signal_minutes),
        ];
        for (name, value) in accumulators {
            if value < 0 {
                return Err(EngineError::InvariantViolation {
                    person_id: *person_id,
                    work_date: *date,
                    detail: format!("{name} is negative ({value})"),
                });
            }
        }
    }
    Ok(())
}

/// Slim-mode people only surface on days with real evidence; non-workdays
/// only surface when something happened or something is owed.
fn filter_records(records: &mut BTreeMap<(i64, NaiveDate), DailyRecord>) {
    records.retain(|_, record| {
        if record.person_mode == PersonMode::Slim {
            return record.has_intervals() || record.has_review_or_action();
        }
        if record.day_type == DayType::NonWorkday {
            return record.has_intervals()
                || record.nonwork_paid_minutes() > 0
                || record.premium_150_minutes > 0
                || record.has_review_or_action();
        }
        true
    });
}
