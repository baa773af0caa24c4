//! Core data models for the Attendance Reconciliation Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod calendar;
mod daily;
mod datasets;
mod interval;
mod period;
mod person;
mod raw_event;
mod reconciliation_result;
mod run_facts;

pub use calendar::{CalendarDay, DayType, is_weekday};
pub use daily::{AttendanceOrigin, AttendanceReason, DailyRecord, ReasonCode};
pub use datasets::{Datasets, ValidationSummary};
pub use interval::{Interval, IntervalFlags};
pub use period::{Period, PeriodRecord};
pub use person::{Person, PersonMode};
pub use raw_event::{EventType, RawEvent, ShiftType};
pub use reconciliation_result::{
    ActionSeed, ActionsQueueSeed, MetricsHint, RecapLine, RecapSeverity, ReconciliationResult,
};
pub use run_facts::RunFacts;
