//! Input datasets for one engine invocation.

use crate::models::{CalendarDay, Person, RawEvent};
use serde::{Deserialize, Serialize};

/// The three input tables the engine consumes.
///
/// Structural validation (array shape, required fields) happens in the
/// external validator before these reach the engine; the engine assumes
/// well-typed rows and degrades row-level problems to review flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Datasets {
    /// Raw badge-clock rows.
    #[serde(default)]
    pub raw_events: Vec<RawEvent>,
    /// Resolved work-calendar days.
    #[serde(default)]
    pub calendar: Vec<CalendarDay>,
    /// The people roster.
    #[serde(default)]
    pub people: Vec<Person>,
}

/// Summary handed over by the external validator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    /// Rows the validator rejected before the engine ran; echoed into the
    /// result unchanged so the orchestrator can mark the run as draft.
    #[serde(default)]
    pub rejects_count: u64,
}
