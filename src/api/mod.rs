//! HTTP API module for the Attendance Reconciliation Engine.
//!
//! This module provides the REST API endpoint for reconciling badge
//! attendance against the work calendar and roster.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::ComputeRequest;
pub use response::{ApiError, ApiErrorBody};
pub use state::AppState;
