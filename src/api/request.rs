//! Request types for the Attendance Reconciliation Engine API.
//!
//! This module defines the JSON request structures for the `/compute`
//! endpoint. Calendar rows arrive with the raw status note from the
//! source system; the request layer resolves the note against the site
//! policy so the engine core only ever sees boolean flags.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::SiteConfig;
use crate::models::{
    CalendarDay, Datasets, EventType, Period, Person, PersonMode, RawEvent, ShiftType,
    ValidationSummary,
};

/// Request body for the `/compute` endpoint.
///
/// Carries one reconciliation run: the imported datasets, the period to
/// reconcile and the importer's validation summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputeRequest {
    /// The imported datasets for the run.
    pub datasets: DatasetsRequest,
    /// The period to reconcile.
    pub period: PeriodRequest,
    /// What the importer rejected before the engine saw the data.
    #[serde(default)]
    pub validation: ValidationSummaryRequest,
}

/// Imported datasets in a compute request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetsRequest {
    /// Raw badge-clock rows in import order.
    #[serde(default)]
    pub raw_events: Vec<RawEventRequest>,
    /// Work calendar rows for the period.
    #[serde(default)]
    pub calendar: Vec<CalendarDayRequest>,
    /// The people roster.
    #[serde(default)]
    pub people: Vec<PersonRequest>,
}

/// One raw badge-clock row in a compute request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEventRequest {
    /// Identifier of the badge holder.
    pub person_id: i64,
    /// Clock-in timestamp, `dd/mm/yyyy HH:MM`.
    pub clock_in: String,
    /// Clock-out timestamp, absent or blank while the interval is open.
    #[serde(default)]
    pub clock_out: Option<String>,
    /// Numeric shift type code from the source system.
    #[serde(default)]
    pub shift_type: ShiftType,
    /// Numeric event type code from the source system.
    #[serde(default)]
    pub event_type: EventType,
    /// Free-text note attached by the badge terminal or an operator.
    #[serde(default)]
    pub note: String,
    /// Badge reader address that produced the row.
    #[serde(default)]
    pub device_location: Option<String>,
}

/// One work calendar row in a compute request.
///
/// Collective leave arrives as the raw note; [`resolve`] turns it into
/// the flag the engine consumes.
///
/// [`resolve`]: CalendarDayRequest::resolve
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarDayRequest {
    /// The calendar date.
    pub date: NaiveDate,
    /// Whether the date is a scheduled working day.
    pub is_workday: bool,
    /// Whether the date is a public holiday.
    #[serde(default)]
    pub is_holiday: bool,
    /// Raw status note from the calendar source.
    #[serde(default)]
    pub note: String,
}

impl CalendarDayRequest {
    /// Resolves the raw note into engine flags using the site policy.
    pub fn resolve(self, site: &SiteConfig) -> CalendarDay {
        let is_collective_leave = site.is_collective_leave_note(&self.note);
        CalendarDay {
            date: self.date,
            is_workday: self.is_workday,
            is_holiday: self.is_holiday,
            is_collective_leave,
        }
    }
}

/// One roster row in a compute request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonRequest {
    /// Identifier matching the badge rows.
    pub id: i64,
    /// Family name.
    pub last_name: String,
    /// Given name.
    pub first_name: String,
    /// Phone number, passed through for downstream notification.
    #[serde(default)]
    pub phone: Option<String>,
    /// Organizational group code.
    #[serde(default)]
    pub group_code: Option<String>,
    /// Skeleton participation mode.
    #[serde(default)]
    pub mode: PersonMode,
}

/// The period to reconcile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodRequest {
    /// First day of the period (inclusive).
    pub date_from: NaiveDate,
    /// Last day of the period (inclusive).
    pub date_to: NaiveDate,
    /// Optional display label, e.g. `"February 2025"`.
    #[serde(default)]
    pub label: Option<String>,
}

/// Importer validation summary in a compute request.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ValidationSummaryRequest {
    /// Rows the importer rejected before the engine saw them.
    #[serde(default)]
    pub rejects_count: u64,
}

impl DatasetsRequest {
    /// Converts the request datasets into domain datasets, resolving raw
    /// calendar notes against the site policy.
    pub fn resolve(self, site: &SiteConfig) -> Datasets {
        Datasets {
            raw_events: self.raw_events.into_iter().map(Into::into).collect(),
            calendar: self
                .calendar
                .into_iter()
                .map(|day| day.resolve(site))
                .collect(),
            people: self.people.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<RawEventRequest> for RawEvent {
    fn from(req: RawEventRequest) -> Self {
        RawEvent {
            person_id: req.person_id,
            clock_in: req.clock_in,
            clock_out: req.clock_out,
            shift_type: req.shift_type,
            event_type: req.event_type,
            note: req.note,
            device_location: req.device_location,
        }
    }
}

impl From<PersonRequest> for Person {
    fn from(req: PersonRequest) -> Self {
        Person {
            id: req.id,
            last_name: req.last_name,
            first_name: req.first_name,
            phone: req.phone,
            group_code: req.group_code,
            mode: req.mode,
        }
    }
}

impl From<PeriodRequest> for Period {
    fn from(req: PeriodRequest) -> Self {
        Period {
            date_from: req.date_from,
            date_to: req.date_to,
            label: req.label,
        }
    }
}

impl From<ValidationSummaryRequest> for ValidationSummary {
    fn from(req: ValidationSummaryRequest) -> Self {
        ValidationSummary {
            rejects_count: req.rejects_count,
        }
    }
}
