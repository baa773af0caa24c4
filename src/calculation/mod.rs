//! Calculation logic for the Attendance Reconciliation Engine.
//!
//! This module contains the full reconciliation pipeline: badge timestamp
//! parsing, per-interval normalization (lateness grace, early leave,
//! anomaly flags), duplicate detection, daily aggregation into attendance
//! records, monthly reconciliation against the paid-time fund, reason
//! code derivation, calendar fact summarization and recap rendering. The
//! `compute` entry point drives all of it in pipeline order.

mod clock;
mod daily;
mod dedup;
mod engine;
mod normalize;
mod reasons;
mod recap;
mod reconcile;
mod run_facts;

pub use clock::{
    BADGE_DATETIME_FORMAT, add_minutes, format_datetime, minutes_between, parse_datetime,
};
pub use daily::aggregate_daily;
pub use dedup::flag_duplicates;
pub use engine::compute;
pub use normalize::{event_key, normalize_event, normalize_events};
pub use reasons::assign_reason_codes;
pub use recap::build_recap_lines;
pub use reconcile::{MONTHLY_OVERTIME_POLICY, reconcile_periods};
pub use run_facts::{EXPECTED_PAID_POLICY, summarize_calendar};
