//! Error types for the Attendance Reconciliation Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate.
//! Data-quality problems in badge events (open intervals, duplicates,
//! unparsable timestamps) are never errors: they degrade to `needs_review`
//! flags and reason codes so the records stay visible. Only configuration
//! failures, invalid period requests, and engine invariant violations
//! surface here.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the Attendance Reconciliation Engine.
///
/// All fallible operations in the engine return this error type, making it
/// easy to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use attendance_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/file.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/file.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The requested reconciliation period was invalid.
    #[error("Invalid period: {message}")]
    InvalidPeriod {
        /// A description of what made the period invalid.
        message: String,
    },

    /// An engine accumulator reached an impossible value.
    ///
    /// This indicates a logic defect rather than a data defect, so the
    /// whole run is aborted instead of producing a partial result.
    #[error(
        "Invariant violation for person {person_id} on {work_date}: {detail}"
    )]
    InvariantViolation {
        /// The person whose record tripped the check.
        person_id: i64,
        /// The day being aggregated when the check tripped.
        work_date: NaiveDate,
        /// Which accumulator failed and how.
        detail: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
