//! Attendance and Payroll Reconciliation Engine
//!
//! This crate turns raw badge-clock events, a work calendar and a people
//! roster into per-day attendance records and per-period payroll figures:
//! lateness normalization, duplicate detection, sick standardization,
//! holiday and collective-leave auto-pay, and the monthly fund-based
//! overtime reconciliation.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
