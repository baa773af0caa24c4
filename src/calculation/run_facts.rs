//! Period-level calendar facts.
//!
//! Derived from the work calendar alone, before any badge data is
//! consulted: how many workdays the period has, which days the payroll
//! month pays for, and the resulting expected minute totals. The achieved
//! effective presence is filled in by the engine once daily aggregation has
//! run.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::config::PolicyConfig;
use crate::models::{CalendarDay, DayType, Period, RunFacts, is_weekday};

/// The rule behind `expected_paid_minutes_month`, echoed on the facts for
/// audit.
pub const EXPECTED_PAID_POLICY: &str =
    "PAYABLE_DAYS(Mon-Fri: workday|holiday|collective_leave) * 480";

/// Summarizes the calendar across the period.
pub fn summarize_calendar(
    calendar: &BTreeMap<NaiveDate, CalendarDay>,
    period: &Period,
    policy: &PolicyConfig,
) -> RunFacts {
    let minutes_per_day = policy.workday().minutes_per_day;

    let mut workdays_count = 0;
    let mut holiday_days_count = 0;
    let mut collective_leave_days_count = 0;
    let mut expected_presence_days_count = 0;
    let mut payable_days_count = 0;

    let mut date = period.date_from;
    while date <= period.date_to {
        if let Some(day) = calendar.get(&date) {
            if day.is_workday {
                workdays_count += 1;
            }
            if day.is_holiday {
                holiday_days_count += 1;
            }
            if day.day_type() == DayType::CollectiveLeave {
                collective_leave_days_count += 1;
            }
            if day.day_type() == DayType::Workday {
                expected_presence_days_count += 1;
            }
            if is_weekday(date) && (day.is_workday || day.is_holiday || day.is_collective_leave) {
                payable_days_count += 1;
            }
        }
        let Some(next) = date.succ_opt() else { break };
        date = next;
    }

    RunFacts {
        period_from: period.date_from,
        period_to: period.date_to,
        period_label: period.display_label(),
        workdays_count,
        holiday_days_count,
        collective_leave_days_count,
        expected_presence_days_count,
        expected_effective_presence_minutes: expected_presence_days_count * minutes_per_day,
        payable_days_count,
        expected_paid_minutes_month: payable_days_count * minutes_per_day,
        expected_paid_minutes_policy: EXPECTED_PAID_POLICY.to_string(),
        is_monthly_payroll: period.is_monthly(),
        collective_leave_minutes: collective_leave_days_count * minutes_per_day,
        holiday_minutes: holiday_days_count * minutes_per_day,
        effective_presence_minutes: 0,
    }
}
