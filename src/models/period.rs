//! Reconciliation period and per-person period record.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// The date range one reconciliation run covers, usually a whole month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// First day of the period, inclusive.
    pub date_from: NaiveDate,
    /// Last day of the period, inclusive.
    pub date_to: NaiveDate,
    /// Optional display label; defaults to `"{from}..{to}"`.
    #[serde(default)]
    pub label: Option<String>,
}

impl Period {
    /// Returns true when the date falls inside the period.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::models::Period;
    /// use chrono::NaiveDate;
    ///
    /// let period = Period {
    ///     date_from: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
    ///     date_to: NaiveDate::from_ymd_opt(2025, 2, 28).unwrap(),
    ///     label: None,
    /// };
    /// assert!(period.contains(NaiveDate::from_ymd_opt(2025, 2, 14).unwrap()));
    /// assert!(!period.contains(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()));
    /// ```
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.date_from && date <= self.date_to
    }

    /// The label to print in reports.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::models::Period;
    /// use chrono::NaiveDate;
    ///
    /// let period = Period {
    ///     date_from: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
    ///     date_to: NaiveDate::from_ymd_opt(2025, 2, 28).unwrap(),
    ///     label: None,
    /// };
    /// assert_eq!(period.display_label(), "2025-02-01..2025-02-28");
    /// ```
    pub fn display_label(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => format!("{}..{}", self.date_from, self.date_to),
        }
    }

    /// Returns true when the period spans exactly one calendar month,
    /// first day to last day. Monthly payroll semantics (the fund cap)
    /// only fully apply to such periods.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::models::Period;
    /// use chrono::NaiveDate;
    ///
    /// let february = Period {
    ///     date_from: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
    ///     date_to: NaiveDate::from_ymd_opt(2025, 2, 28).unwrap(),
    ///     label: None,
    /// };
    /// assert!(february.is_monthly());
    ///
    /// let half_month = Period {
    ///     date_from: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
    ///     date_to: NaiveDate::from_ymd_opt(2025, 2, 14).unwrap(),
    ///     label: None,
    /// };
    /// assert!(!half_month.is_monthly());
    /// ```
    pub fn is_monthly(&self) -> bool {
        let same_month = self.date_from.year() == self.date_to.year()
            && self.date_from.month() == self.date_to.month();
        let starts_on_first = self.date_from.day() == 1;
        let ends_on_last = match self.date_to.succ_opt() {
            Some(next) => next.month() != self.date_to.month(),
            None => true,
        };
        same_month && starts_on_first && ends_on_last
    }
}

/// One person's reconciled payroll figures for the whole period.
///
/// Built by summing the person's daily records and then applying the
/// fund-based allocation in a single deterministic pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    /// Identifier of the person.
    pub person_id: i64,
    /// First day of the reconciled period.
    pub date_from: NaiveDate,
    /// Last day of the reconciled period.
    pub date_to: NaiveDate,

    /// Days owed pay: workdays plus auto-paid holiday and collective-leave
    /// days.
    pub payable_days: i64,
    /// The monthly minute budget, `payable_days * 480`.
    pub fund_minutes: i64,

    /// Sum of workday on-site payroll-basis minutes.
    pub on_site_minutes_effective_sum: i64,
    /// Sum of workday work-from-home minutes.
    pub wfh_minutes_sum: i64,
    /// Total raw workday minutes competing for the fund.
    pub raw_workday_minutes: i64,
    /// Auto-paid holiday minutes in the period.
    pub paid_holiday_100_minutes: i64,
    /// Auto-paid collective-leave minutes in the period.
    pub paid_collective_leave_100_minutes: i64,
    /// Sick-leave minutes paid at 70%.
    pub paid_sick_70_minutes: i64,
    /// HZZO-covered sick-leave minutes paid at 100%.
    pub paid_sick_hzzo_100_minutes: i64,
    /// Workplace-injury minutes paid at 100%.
    pub paid_injury_100_minutes: i64,
    /// Maternity-compensation minutes paid at 100%.
    pub paid_maternity_100_minutes: i64,
    /// Sum of all paid non-work buckets above.
    pub nonwork_paid_minutes: i64,

    /// Regular-rate minutes granted, capped by the fund.
    pub regular_total_minutes: i64,
    /// Regular minutes allocated to on-site work (consumed first).
    pub pay_regular_on_site_minutes: i64,
    /// Regular minutes allocated to work-from-home (fills the remainder).
    pub pay_regular_wfh_minutes: i64,
    /// Workday minutes beyond the fund cap.
    pub workday_excess_minutes: i64,
    /// Total lateness debt carried into the reconciliation.
    pub late_debt_minutes_total: i64,
    /// Overtime minutes granted, the workday excess net of debt.
    pub overtime_minutes: i64,
    /// Debt that the workday excess could not absorb.
    pub uncovered_debt_minutes: i64,
    /// 150%-premium minutes; never reduced by debt.
    pub premium_150_minutes: i64,
    /// Premium plus overtime minutes.
    pub paid_150_total_minutes: i64,

    /// The fund, echoed for audit.
    pub expected_paid_minutes: i64,
    /// Regular plus non-work paid minutes; the premium is excluded because
    /// it represents work beyond the fund, not fund consumption.
    pub total_paid_minutes_base: i64,
    /// Base paid minutes above the fund.
    pub paid_excess_minutes: i64,
    /// Base paid minutes below the fund.
    pub paid_shortage_minutes: i64,
    /// Human-readable sentence describing the allocation rule applied.
    pub overtime_policy: String,

    /// Days classified as workdays for this person.
    pub workday_days: i64,
    /// Workdays that are neither holiday nor collective leave.
    pub billable_days: i64,
    /// Days with on-site or work-from-home presence.
    pub presence_days: i64,
    /// Workdays with lateness or early leave.
    pub lateness_days: i64,
    /// Workdays with no badge activity at all.
    pub missing_attendance_days: i64,
    /// Days standardized from manual entries.
    pub manual_standardized_days: i64,
    /// Days covered by a sick-leave bucket.
    pub sick_days: i64,
    /// Days covered by auto-paid holiday or collective leave.
    pub approved_leave_days: i64,
    /// Intervals without a clock-out across the period.
    pub open_intervals_count: i64,
    /// Days flagged for review.
    pub needs_review_days: i64,

    /// Sum of exact lateness minutes across the period.
    pub late_minutes_raw_total: i64,
    /// Sum of normalized lateness minutes across the period.
    pub late_minutes_normalized_total: i64,
    /// Sum of early-leave minutes across the period.
    pub early_leave_minutes_raw_total: i64,

    /// Organizational group code, copied from the roster.
    pub group_code: Option<String>,
    /// Family name, copied from the roster.
    pub last_name: String,
    /// Given name, copied from the roster.
    pub first_name: String,
}

impl PeriodRecord {
    /// Creates a zero-valued record for one person and period.
    pub fn new(person_id: i64, date_from: NaiveDate, date_to: NaiveDate) -> Self {
        PeriodRecord {
            person_id,
            date_from,
            date_to,
            payable_days: 0,
            fund_minutes: 0,
            on_site_minutes_effective_sum: 0,
            wfh_minutes_sum: 0,
            raw_workday_minutes: 0,
            paid_holiday_100_minutes: 0,
            paid_collective_leave_100_minutes: 0,
            paid_sick_70_minutes: 0,
            paid_sick_hzzo_100_minutes: 0,
            paid_injury_100_minutes: 0,
            paid_maternity_100_minutes: 0,
            nonwork_paid_minutes: 0,
            regular_total_minutes: 0,
            pay_regular_on_site_minutes: 0,
            pay_regular_wfh_minutes: 0,
            workday_excess_minutes: 0,
            late_debt_minutes_total: 0,
            overtime_minutes: 0,
            uncovered_debt_minutes: 0,
            premium_150_minutes: 0,
            paid_150_total_minutes: 0,
            expected_paid_minutes: 0,
            total_paid_minutes_base: 0,
            paid_excess_minutes: 0,
            paid_shortage_minutes: 0,
            overtime_policy: String::new(),
            workday_days: 0,
            billable_days: 0,
            presence_days: 0,
            lateness_days: 0,
            missing_attendance_days: 0,
            manual_standardized_days: 0,
            sick_days: 0,
            approved_leave_days: 0,
            open_intervals_count: 0,
            needs_review_days: 0,
            late_minutes_raw_total: 0,
            late_minutes_normalized_total: 0,
            early_leave_minutes_raw_total: 0,
            group_code: None,
            last_name: String::new(),
            first_name: String::new(),
        }
    }
}
