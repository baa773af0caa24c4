//! Human-readable run recap.
//!
//! A short, fixed-order list of sentences summarizing the run: calendar
//! shape, achieved presence, anomaly counts and discipline totals. Lines
//! that describe a metric carry a machine-readable hint so dashboards can
//! link the sentence to the figure. Anomaly lines only appear when the
//! anomaly exists; informational lines always do.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{
    DailyRecord, MetricsHint, PeriodRecord, RecapLine, RecapSeverity, RunFacts,
};

/// How many worst offenders the missing-attendance recap line names.
const TOP_OFFENDERS: usize = 5;

/// Renders the recap lines for one finished run.
pub fn build_recap_lines(
    run_facts: &RunFacts,
    daily: &BTreeMap<(i64, NaiveDate), DailyRecord>,
    periods: &BTreeMap<i64, PeriodRecord>,
) -> Vec<RecapLine> {
    let missing_total: i64 = periods.values().map(|p| p.missing_attendance_days).sum();
    let open_total: i64 = periods.values().map(|p| p.open_intervals_count).sum();
    let late_normalized_total: i64 = periods
        .values()
        .map(|p| p.late_minutes_normalized_total)
        .sum();
    let early_leave_total: i64 = periods
        .values()
        .map(|p| p.early_leave_minutes_raw_total)
        .sum();
    let overtime_total: i64 = periods.values().map(|p| p.overtime_minutes).sum();
    let review_days_total = daily.values().filter(|day| day.needs_review).count() as i64;

    let mut lines = Vec::new();

    lines.push(hinted(
        format!(
            "Period {}: {} workdays, {} holidays, {} collective-leave days, {} billable days",
            run_facts.period_label,
            run_facts.workdays_count,
            run_facts.holiday_days_count,
            run_facts.collective_leave_days_count,
            run_facts.expected_presence_days_count
        ),
        RecapSeverity::Info,
        "workdays_count",
        run_facts.workdays_count,
    ));

    lines.push(hinted(
        format!(
            "Expected effective presence {} min, achieved {} min",
            run_facts.expected_effective_presence_minutes, run_facts.effective_presence_minutes
        ),
        RecapSeverity::Info,
        "effective_presence_minutes",
        run_facts.effective_presence_minutes,
    ));

    lines.push(plain(
        format!(
            "Status hours: collective leave {} min, holidays {} min",
            run_facts.collective_leave_minutes, run_facts.holiday_minutes
        ),
        RecapSeverity::Info,
    ));

    if missing_total > 0 {
        lines.push(hinted(
            format!("Missing attendance: {missing_total} days require follow-up"),
            RecapSeverity::Action,
            "missing_attendance_days",
            missing_total,
        ));
        lines.push(plain(
            format!("Top missing: {}", top_offenders(periods)),
            RecapSeverity::Action,
        ));
    }

    if open_total > 0 {
        lines.push(hinted(
            format!("Open intervals without clock-out: {open_total}"),
            RecapSeverity::Warn,
            "open_intervals_count",
            open_total,
        ));
    }

    if review_days_total > 0 {
        lines.push(hinted(
            format!("Days flagged for review: {review_days_total}"),
            RecapSeverity::Warn,
            "needs_review_count",
            review_days_total,
        ));
    }

    lines.push(hinted(
        format!(
            "Lateness: {late_normalized_total} normalized min, {early_leave_total} early-leave min"
        ),
        RecapSeverity::Info,
        "late_minutes_normalized_total",
        late_normalized_total,
    ));

    lines.push(hinted(
        format!("Overtime minutes granted: {overtime_total}"),
        RecapSeverity::Info,
        "overtime_minutes_total",
        overtime_total,
    ));

    lines
}

/// Worst offenders by missing days, `"{person}({days}d)"`, most days
/// first, person id breaking ties.
fn top_offenders(periods: &BTreeMap<i64, PeriodRecord>) -> String {
    let mut offenders: Vec<(i64, i64)> = periods
        .values()
        .filter(|p| p.missing_attendance_days > 0)
        .map(|p| (p.person_id, p.missing_attendance_days))
        .collect();
    offenders.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    offenders
        .iter()
        .take(TOP_OFFENDERS)
        .map(|(person_id, days)| format!("{person_id}({days}d)"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn plain(text: String, severity: RecapSeverity) -> RecapLine {
    RecapLine {
        text,
        severity,
        metrics_hint: None,
    }
}

fn hinted(text: String, severity: RecapSeverity, metric: &str, value: i64) -> RecapLine {
    RecapLine {
        text,
        severity,
        metrics_hint: Some(MetricsHint {
            metric: metric.to_string(),
            value,
        }),
    }
}
