//! Configuration loading and management for the Attendance Reconciliation Engine.
//!
//! This module provides functionality to load the attendance policy from
//! YAML files: workday boundaries, discipline thresholds, and site
//! addresses.
//!
//! # Example
//!
//! ```no_run
//! use attendance_engine::config::PolicyLoader;
//!
//! let policy = PolicyLoader::load("./config/attendance").unwrap();
//! assert_eq!(policy.workday().minutes_per_day, 480);
//! ```

mod loader;
mod types;

pub use loader::PolicyLoader;
pub use types::{DisciplineConfig, PolicyConfig, SiteConfig, WorkdayConfig};
