//! Monthly fund-based payroll reconciliation.
//!
//! Each person gets a minute fund of `payable_days * nominal day`. Paid
//! non-work buckets (holiday, collective leave, sick variants) consume the
//! fund off the top; regular workday minutes fill what remains, on-site
//! before work-from-home. Workday minutes beyond the fund become overtime
//! only after the period's lateness debt is netted against them. The 150%
//! premium sits outside the fund and is never reduced.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::config::PolicyConfig;
use crate::models::{
    AttendanceOrigin, AttendanceReason, CalendarDay, DailyRecord, DayType, Interval, Period,
    PeriodRecord, Person,
};

/// The allocation rule applied by [`reconcile_periods`], echoed on every
/// period record for audit.
pub const MONTHLY_OVERTIME_POLICY: &str = "MONTHLY v4: fund = payable_days * 480; regular <= fund - nonwork_paid; premium 150 always paid in full; overtime = max(workday_excess - debt, 0); debt reduces overtime only";

/// Reconciles finalized daily records into one period record per person.
pub fn reconcile_periods(
    daily: &BTreeMap<(i64, NaiveDate), DailyRecord>,
    intervals: &[Interval],
    calendar: &BTreeMap<NaiveDate, CalendarDay>,
    people: &BTreeMap<i64, Person>,
    period: &Period,
    policy: &PolicyConfig,
) -> BTreeMap<i64, PeriodRecord> {
    let minutes_per_day = policy.workday().minutes_per_day;
    let mut periods: BTreeMap<i64, PeriodRecord> = BTreeMap::new();

    for ((person_id, date), day) in daily.iter() {
        let record = periods.entry(*person_id).or_insert_with(|| {
            let mut record = PeriodRecord::new(*person_id, period.date_from, period.date_to);
            record.overtime_policy = MONTHLY_OVERTIME_POLICY.to_string();
            record
        });

        if calendar.get(date).map(|d| d.is_workday).unwrap_or(false) {
            record.workday_days += 1;
        }

        if day.day_type == DayType::Workday {
            record.billable_days += 1;
            record.payable_days += 1;
            record.on_site_minutes_effective_sum += day.basis_on_site_minutes;
            record.wfh_minutes_sum += day.basis_wfh_minutes;
        }
        if day.paid_holiday_100_minutes > 0 {
            record.payable_days += 1;
        }
        if day.paid_collective_leave_100_minutes > 0 {
            record.payable_days += 1;
        }

        record.paid_holiday_100_minutes += day.paid_holiday_100_minutes;
        record.paid_collective_leave_100_minutes += day.paid_collective_leave_100_minutes;
        record.paid_sick_70_minutes += day.paid_sick_70_minutes;
        record.paid_sick_hzzo_100_minutes += day.paid_sick_hzzo_100_minutes;
        record.paid_injury_100_minutes += day.paid_injury_100_minutes;
        record.paid_maternity_100_minutes += day.paid_maternity_100_minutes;
        record.premium_150_minutes += day.premium_150_minutes;

        record.late_debt_minutes_total += day.late_debt_minutes;
        record.late_minutes_raw_total += day.late_minutes_raw_total;
        record.late_minutes_normalized_total += day.late_minutes_normalized_total;
        record.early_leave_minutes_raw_total += day.early_leave_minutes_raw_total;

        if day.is_present_on_site || day.wfh_minutes > 0 {
            record.presence_days += 1;
        }
        if day.lateness_day {
            record.lateness_days += 1;
        }
        if day.missing_attendance_day {
            record.missing_attendance_days += 1;
        }
        if day.attendance_origin == AttendanceOrigin::ManualStandardized {
            record.manual_standardized_days += 1;
        }
        if matches!(
            day.attendance_reason,
            Some(AttendanceReason::SickLeave) | Some(AttendanceReason::SickLeaveHzzo100)
        ) {
            record.sick_days += 1;
        }
        if matches!(
            day.attendance_reason,
            Some(AttendanceReason::Holiday100) | Some(AttendanceReason::CollectiveLeave100)
        ) {
            record.approved_leave_days += 1;
        }
        if day.needs_review {
            record.needs_review_days += 1;
        }
    }

    for interval in intervals {
        let Some(work_date) = interval.work_date else {
            continue;
        };
        if !period.contains(work_date) {
            continue;
        }
        if !interval.counts_toward_totals() || !interval.flags.open_interval {
            continue;
        }
        if let Some(record) = periods.get_mut(&interval.person_id) {
            record.open_intervals_count += 1;
        }
    }

    for (person_id, record) in periods.iter_mut() {
        if let Some(person) = people.get(person_id) {
            record.group_code = person.group_code.clone();
            record.last_name = person.last_name.clone();
            record.first_name = person.first_name.clone();
        }
        allocate(record, minutes_per_day);
    }

    periods
}

/// The deterministic allocation pass for one person.
fn allocate(record: &mut PeriodRecord, minutes_per_day: i64) {
    record.fund_minutes = record.payable_days * minutes_per_day;
    record.raw_workday_minutes = record.on_site_minutes_effective_sum + record.wfh_minutes_sum;
    record.nonwork_paid_minutes = record.paid_holiday_100_minutes
        + record.paid_collective_leave_100_minutes
        + record.paid_sick_70_minutes
        + record.paid_sick_hzzo_100_minutes
        + record.paid_injury_100_minutes
        + record.paid_maternity_100_minutes;

    let regular_cap = (record.fund_minutes - record.nonwork_paid_minutes).max(0);
    record.regular_total_minutes = record.raw_workday_minutes.min(regular_cap);
    record.pay_regular_on_site_minutes = record
        .on_site_minutes_effective_sum
        .min(record.regular_total_minutes);
    record.pay_regular_wfh_minutes = (record.regular_total_minutes
        - record.pay_regular_on_site_minutes)
        .min(record.wfh_minutes_sum);

    record.workday_excess_minutes = (record.raw_workday_minutes - regular_cap).max(0);
    let debt = record.late_debt_minutes_total.max(0);
    record.late_debt_minutes_total = debt;
    record.overtime_minutes = (record.workday_excess_minutes - debt).max(0);
    record.uncovered_debt_minutes = (debt - record.workday_excess_minutes).max(0);

    record.paid_150_total_minutes = record.premium_150_minutes + record.overtime_minutes;

    record.expected_paid_minutes = record.fund_minutes;
    record.total_paid_minutes_base = record.regular_total_minutes + record.nonwork_paid_minutes;
    record.paid_excess_minutes =
        (record.total_paid_minutes_base - record.expected_paid_minutes).max(0);
    record.paid_shortage_minutes =
        (record.expected_paid_minutes - record.total_paid_minutes_base).max(0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IntervalFlags;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn february_2025() -> Period {
        Period {
            date_from: make_date("2025-02-01"),
            date_to: make_date("2025-02-28"),
            label: None,
        }
    }

    fn present_day(person_id: i64, date_str: &str, effective: i64) -> DailyRecord {
        let mut day = DailyRecord::new(person_id, make_date(date_str));
        day.day_type = DayType::Workday;
        day.on_site_minutes_effective = effective;
        day.on_site_minutes_raw = effective;
        day.basis_on_site_minutes = effective;
        day.work_minutes = effective.min(480);
        day.is_present_on_site = effective > 0;
        day.interval_count = 1;
        day
    }

    fn reconcile(daily: Vec<DailyRecord>) -> BTreeMap<i64, PeriodRecord> {
        reconcile_with(daily, Vec::new(), &[])
    }

    fn reconcile_with(
        daily: Vec<DailyRecord>,
        intervals: Vec<Interval>,
        calendar_days: &[CalendarDay],
    ) -> BTreeMap<i64, PeriodRecord> {
        let map: BTreeMap<(i64, NaiveDate), DailyRecord> = daily
            .into_iter()
            .map(|day| ((day.person_id, day.work_date), day))
            .collect();
        let calendar: BTreeMap<NaiveDate, CalendarDay> =
            calendar_days.iter().map(|day| (day.date, *day)).collect();
        reconcile_periods(
            &map,
            &intervals,
            &calendar,
            &BTreeMap::new(),
            &february_2025(),
            &PolicyConfig::default(),
        )
    }

    // ===== MR-001: clean month =====

    #[test]
    fn test_exact_attendance_fills_the_fund_exactly() {
        let daily = vec![
            present_day(1012, "2025-02-03", 480),
            present_day(1012, "2025-02-04", 480),
            present_day(1012, "2025-02-05", 480),
        ];
        let periods = reconcile(daily);
        let record = &periods[&1012];

        assert_eq!(record.payable_days, 3);
        assert_eq!(record.fund_minutes, 1440);
        assert_eq!(record.raw_workday_minutes, 1440);
        assert_eq!(record.regular_total_minutes, 1440);
        assert_eq!(record.workday_excess_minutes, 0);
        assert_eq!(record.overtime_minutes, 0);
        assert_eq!(record.total_paid_minutes_base, 1440);
        assert_eq!(record.paid_excess_minutes, 0);
        assert_eq!(record.paid_shortage_minutes, 0);
        assert_eq!(record.overtime_policy, MONTHLY_OVERTIME_POLICY);
    }

    // ===== MR-002: overtime only beyond the fund =====

    #[test]
    fn test_excess_minutes_become_overtime() {
        let daily = vec![
            present_day(1012, "2025-02-03", 570),
            present_day(1012, "2025-02-04", 480),
        ];
        let periods = reconcile(daily);
        let record = &periods[&1012];

        assert_eq!(record.fund_minutes, 960);
        assert_eq!(record.raw_workday_minutes, 1050);
        assert_eq!(record.regular_total_minutes, 960);
        assert_eq!(record.workday_excess_minutes, 90);
        assert_eq!(record.overtime_minutes, 90);
        assert_eq!(record.paid_150_total_minutes, 90);
        assert_eq!(record.paid_excess_minutes, 0);
    }

    #[test]
    fn test_debt_is_netted_against_overtime() {
        let mut late_day = present_day(1012, "2025-02-03", 570);
        late_day.late_debt_minutes = 30;
        let daily = vec![late_day, present_day(1012, "2025-02-04", 480)];
        let periods = reconcile(daily);
        let record = &periods[&1012];

        assert_eq!(record.workday_excess_minutes, 90);
        assert_eq!(record.late_debt_minutes_total, 30);
        assert_eq!(record.overtime_minutes, 60);
        assert_eq!(record.uncovered_debt_minutes, 0);
    }

    #[test]
    fn test_debt_beyond_excess_is_reported_not_deducted() {
        let mut late_day = present_day(1012, "2025-02-03", 480);
        late_day.late_debt_minutes = 100;
        let periods = reconcile(vec![late_day]);
        let record = &periods[&1012];

        assert_eq!(record.workday_excess_minutes, 0);
        assert_eq!(record.overtime_minutes, 0);
        assert_eq!(record.uncovered_debt_minutes, 100);
        // Base pay is untouched; debt only ever reduces overtime.
        assert_eq!(record.total_paid_minutes_base, record.fund_minutes);
        assert_eq!(record.paid_shortage_minutes, 0);
    }

    // ===== MR-003: non-work buckets consume the fund first =====

    #[test]
    fn test_sick_bucket_caps_regular_minutes() {
        let mut sick_day = DailyRecord::new(1012, make_date("2025-02-05"));
        sick_day.day_type = DayType::Workday;
        sick_day.paid_sick_70_minutes = 480;
        sick_day.interval_count = 1;
        sick_day.attendance_reason = Some(AttendanceReason::SickLeave);
        sick_day.attendance_origin = AttendanceOrigin::ManualStandardized;

        let daily = vec![
            present_day(1012, "2025-02-03", 480),
            present_day(1012, "2025-02-04", 480),
            sick_day,
        ];
        let periods = reconcile(daily);
        let record = &periods[&1012];

        assert_eq!(record.payable_days, 3);
        assert_eq!(record.fund_minutes, 1440);
        assert_eq!(record.nonwork_paid_minutes, 480);
        assert_eq!(record.regular_total_minutes, 960);
        assert_eq!(record.total_paid_minutes_base, 1440);
        assert_eq!(record.sick_days, 1);
        assert_eq!(record.manual_standardized_days, 1);
    }

    #[test]
    fn test_auto_paid_holiday_extends_payable_days() {
        let mut holiday = DailyRecord::new(1012, make_date("2025-02-17"));
        holiday.day_type = DayType::Holiday;
        holiday.paid_holiday_100_minutes = 480;
        holiday.attendance_reason = Some(AttendanceReason::Holiday100);

        let daily = vec![
            present_day(1012, "2025-02-03", 480),
            present_day(1012, "2025-02-04", 480),
            holiday,
        ];
        let periods = reconcile(daily);
        let record = &periods[&1012];

        assert_eq!(record.payable_days, 3);
        assert_eq!(record.fund_minutes, 1440);
        assert_eq!(record.nonwork_paid_minutes, 480);
        assert_eq!(record.regular_total_minutes, 960);
        assert_eq!(record.approved_leave_days, 1);
        assert_eq!(record.paid_shortage_minutes, 0);
    }

    // ===== MR-004: on-site consumes the fund before work-from-home =====

    #[test]
    fn test_regular_allocation_prefers_on_site() {
        let mut mixed = present_day(1012, "2025-02-03", 300);
        mixed.basis_wfh_minutes = 300;
        mixed.wfh_minutes = 300;
        let periods = reconcile(vec![mixed]);
        let record = &periods[&1012];

        assert_eq!(record.fund_minutes, 480);
        assert_eq!(record.raw_workday_minutes, 600);
        assert_eq!(record.regular_total_minutes, 480);
        assert_eq!(record.pay_regular_on_site_minutes, 300);
        assert_eq!(record.pay_regular_wfh_minutes, 180);
        assert_eq!(record.workday_excess_minutes, 120);
    }

    // ===== MR-005: the premium is untouchable =====

    #[test]
    fn test_premium_survives_any_amount_of_debt() {
        let mut weekend = DailyRecord::new(1012, make_date("2025-02-08"));
        weekend.day_type = DayType::NonWorkday;
        weekend.premium_150_minutes = 240;
        weekend.interval_count = 1;

        let mut late_day = present_day(1012, "2025-02-03", 480);
        late_day.late_debt_minutes = 500;

        let periods = reconcile(vec![late_day, weekend]);
        let record = &periods[&1012];

        assert_eq!(record.premium_150_minutes, 240);
        assert_eq!(record.overtime_minutes, 0);
        assert_eq!(record.uncovered_debt_minutes, 500);
        assert_eq!(record.paid_150_total_minutes, 240);
    }

    #[test]
    fn test_premium_days_do_not_extend_the_fund() {
        let mut weekend = DailyRecord::new(1012, make_date("2025-02-08"));
        weekend.day_type = DayType::NonWorkday;
        weekend.premium_150_minutes = 240;
        weekend.basis_on_site_minutes = 240;
        weekend.interval_count = 1;

        let periods = reconcile(vec![present_day(1012, "2025-02-03", 480), weekend]);
        let record = &periods[&1012];

        // Only the workday is payable; weekend minutes live in the premium.
        assert_eq!(record.payable_days, 1);
        assert_eq!(record.fund_minutes, 480);
        assert_eq!(record.raw_workday_minutes, 480);
    }

    // ===== MR-006: shortage =====

    #[test]
    fn test_missing_days_surface_as_shortage() {
        let mut missing = DailyRecord::new(1012, make_date("2025-02-04"));
        missing.day_type = DayType::Workday;
        missing.missing_attendance_day = true;
        missing.needs_action = true;

        let periods = reconcile(vec![present_day(1012, "2025-02-03", 480), missing]);
        let record = &periods[&1012];

        assert_eq!(record.payable_days, 2);
        assert_eq!(record.fund_minutes, 960);
        assert_eq!(record.total_paid_minutes_base, 480);
        assert_eq!(record.paid_shortage_minutes, 480);
        assert_eq!(record.missing_attendance_days, 1);
    }

    // ===== MR-007: counters =====

    #[test]
    fn test_day_counters_are_split_by_kind() {
        let mut late_day = present_day(1012, "2025-02-03", 480);
        late_day.lateness_day = true;
        late_day.has_late_or_early_leave = true;
        late_day.late_minutes_raw_total = 15;
        late_day.late_minutes_normalized_total = 30;
        late_day.late_debt_minutes = 30;

        let mut review_day = present_day(1012, "2025-02-04", 480);
        review_day.needs_review = true;

        let mut wfh_day = DailyRecord::new(1012, make_date("2025-02-05"));
        wfh_day.day_type = DayType::Workday;
        wfh_day.wfh_minutes = 480;
        wfh_day.basis_wfh_minutes = 480;
        wfh_day.interval_count = 1;

        let periods = reconcile(vec![late_day, review_day, wfh_day]);
        let record = &periods[&1012];

        assert_eq!(record.lateness_days, 1);
        assert_eq!(record.needs_review_days, 1);
        assert_eq!(record.presence_days, 3);
        assert_eq!(record.late_minutes_raw_total, 15);
        assert_eq!(record.late_minutes_normalized_total, 30);
    }

    #[test]
    fn test_workday_days_count_the_calendar_flag_not_the_day_type() {
        // A worked holiday is flagged as a workday in the calendar but its
        // day type is HOLIDAY, so it is not billable.
        let holiday_calendar = CalendarDay {
            date: make_date("2025-02-17"),
            is_workday: true,
            is_holiday: true,
            is_collective_leave: false,
        };
        let workday_calendar = CalendarDay {
            date: make_date("2025-02-03"),
            is_workday: true,
            is_holiday: false,
            is_collective_leave: false,
        };

        let mut holiday = DailyRecord::new(1012, make_date("2025-02-17"));
        holiday.day_type = DayType::Holiday;
        holiday.paid_holiday_100_minutes = 480;
        holiday.attendance_reason = Some(AttendanceReason::Holiday100);

        let periods = reconcile_with(
            vec![present_day(1012, "2025-02-03", 480), holiday],
            Vec::new(),
            &[workday_calendar, holiday_calendar],
        );
        let record = &periods[&1012];

        assert_eq!(record.workday_days, 2);
        assert_eq!(record.billable_days, 1);
        assert_eq!(record.payable_days, 2);
    }

    #[test]
    fn test_open_intervals_are_counted_per_person() {
        let mut open = Interval {
            person_id: 1012,
            work_date: Some(make_date("2025-02-03")),
            is_workday: true,
            is_holiday: false,
            is_collective_leave: false,
            clock_in_raw: "03/02/2025 07:30".to_string(),
            clock_in_normalized: "03/02/2025 07:30".to_string(),
            clock_out_raw: None,
            event_type: Default::default(),
            shift_type: Default::default(),
            note: String::new(),
            device_location: None,
            duration_raw_minutes: 0,
            duration_effective_minutes: 0,
            late_minutes_raw: 0,
            late_minutes_normalized: 0,
            early_leave_minutes_raw: 0,
            early_leave_minutes_normalized: 0,
            is_split_shift: false,
            is_wfh: false,
            is_ignored: false,
            flags: IntervalFlags::default(),
            event_key: String::new(),
        };
        open.flags.open_interval = true;
        open.flags.needs_review = true;

        let mut day = present_day(1012, "2025-02-03", 0);
        day.needs_review = true;

        let periods = reconcile_with(vec![day], vec![open], &[]);
        let record = &periods[&1012];

        assert_eq!(record.open_intervals_count, 1);
        assert_eq!(record.needs_review_days, 1);
    }

    #[test]
    fn test_people_are_reconciled_independently() {
        let daily = vec![
            present_day(1012, "2025-02-03", 480),
            present_day(1044, "2025-02-03", 570),
        ];
        let periods = reconcile(daily);

        assert_eq!(periods.len(), 2);
        assert_eq!(periods[&1012].overtime_minutes, 0);
        assert_eq!(periods[&1044].overtime_minutes, 90);
    }
}
