//! Calendar-level facts for one reconciliation run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Calendar statistics for the period, independent of any person.
///
/// Everything except `effective_presence_minutes` is derived from the
/// calendar alone; that one field is filled in after daily aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunFacts {
    /// First day of the period, inclusive.
    pub period_from: NaiveDate,
    /// Last day of the period, inclusive.
    pub period_to: NaiveDate,
    /// Display label for reports.
    pub period_label: String,
    /// Calendar days billed as workdays.
    pub workdays_count: i64,
    /// Public holidays in the period.
    pub holiday_days_count: i64,
    /// Collective-leave days in the period.
    pub collective_leave_days_count: i64,
    /// Workdays that are neither holiday nor collective leave; the days
    /// people are expected on site.
    pub expected_presence_days_count: i64,
    /// Expected presence days times the nominal day.
    pub expected_effective_presence_minutes: i64,
    /// Monday-to-Friday days that are workday, holiday, or collective
    /// leave; the days that earn fund minutes.
    pub payable_days_count: i64,
    /// Payable days times the nominal day.
    pub expected_paid_minutes_month: i64,
    /// Sentence describing how the paid expectation is computed.
    pub expected_paid_minutes_policy: String,
    /// True when the period spans exactly one calendar month.
    pub is_monthly_payroll: bool,
    /// Collective-leave days times the nominal day.
    pub collective_leave_minutes: i64,
    /// Holiday days times the nominal day.
    pub holiday_minutes: i64,
    /// Sum of every person-day presence KPI; filled after aggregation.
    pub effective_presence_minutes: i64,
}
