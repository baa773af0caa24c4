//! Configuration types for the attendance policy.
//!
//! This module contains the strongly-typed policy structures that are
//! deserialized from YAML configuration files. The `Default`
//! implementations carry the production policy values so the library is
//! usable without a config directory.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Nominal workday boundaries and the daily minute norm.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkdayConfig {
    /// Nominal start of the workday.
    pub start_time: NaiveTime,
    /// Nominal end of the workday.
    pub end_time: NaiveTime,
    /// Minutes in one nominal workday.
    pub minutes_per_day: i64,
}

impl Default for WorkdayConfig {
    fn default() -> Self {
        WorkdayConfig {
            start_time: NaiveTime::from_hms_opt(7, 30, 0).expect("valid nominal start"),
            end_time: NaiveTime::from_hms_opt(15, 30, 0).expect("valid nominal end"),
            minutes_per_day: 480,
        }
    }
}

/// Lateness, early-leave, and anti-gaming thresholds.
#[derive(Debug, Clone, Deserialize)]
pub struct DisciplineConfig {
    /// Largest lateness still inside the grace bucket, in minutes.
    pub late_grace_max_minutes: i64,
    /// Flat normalized lateness assigned inside the grace bucket.
    pub late_bucket_minutes: i64,
    /// Minutes added to the clock-in before billing starts on a big late
    /// arrival, absorbing scan latency.
    pub big_late_offset_minutes: i64,
    /// Scale factor converting lateness minutes into debt minutes.
    pub late_debt_multiplier: Decimal,
    /// Early arrival must exceed this to count as an overtime signal.
    pub early_overtime_threshold_minutes: i64,
    /// Minutes deducted from a qualifying early arrival.
    pub early_overtime_deduct_minutes: i64,
    /// Shortest legitimate split-shift interval, in minutes.
    pub split_shift_min_minutes: i64,
    /// A day's shortest closed interval at or below this is suspicious.
    pub suspicious_short_max_minutes: i64,
    /// Closed intervals longer than this are flagged for review.
    pub excessive_duration_minutes: i64,
}

impl Default for DisciplineConfig {
    fn default() -> Self {
        DisciplineConfig {
            late_grace_max_minutes: 30,
            late_bucket_minutes: 30,
            big_late_offset_minutes: 5,
            late_debt_multiplier: Decimal::ONE,
            early_overtime_threshold_minutes: 20,
            early_overtime_deduct_minutes: 5,
            split_shift_min_minutes: 15,
            suspicious_short_max_minutes: 2,
            excessive_duration_minutes: 960,
        }
    }
}

/// On-site badge readers and the note markers the intake layer resolves.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Addresses of the on-site badge readers.
    pub onsite_reader_ips: Vec<String>,
    /// Note text declaring a work-from-home day.
    pub wfh_note_marker: String,
    /// Calendar note text declaring collective leave.
    pub collective_leave_marker: String,
}

impl SiteConfig {
    /// Returns true when the device location matches an on-site reader.
    pub fn is_onsite_reader(&self, device_location: Option<&str>) -> bool {
        match device_location {
            Some(location) => self.onsite_reader_ips.iter().any(|ip| ip == location),
            None => false,
        }
    }

    /// Returns true when the note declares work from home.
    ///
    /// Matching is insensitive to case, non-breaking spaces, and repeated
    /// whitespace, because the marker is typed by hand on the badge
    /// terminal.
    pub fn is_wfh_note(&self, note: &str) -> bool {
        Self::canonical_note(note) == Self::canonical_note(&self.wfh_note_marker)
    }

    /// Returns true when a calendar note declares collective leave.
    pub fn is_collective_leave_note(&self, note: &str) -> bool {
        note.trim().to_lowercase() == self.collective_leave_marker.trim().to_lowercase()
    }

    fn canonical_note(note: &str) -> String {
        note.replace('\u{a0}', " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            onsite_reader_ips: vec![
                "192.168.100.77".to_string(),
                "192.168.100.41".to_string(),
            ],
            wfh_note_marker: "001_RadOdKuce".to_string(),
            collective_leave_marker: "kolektivni go".to_string(),
        }
    }
}

/// The complete attendance policy loaded from YAML files.
#[derive(Debug, Clone, Default)]
pub struct PolicyConfig {
    /// Workday boundaries.
    workday: WorkdayConfig,
    /// Discipline thresholds.
    discipline: DisciplineConfig,
    /// Site addresses and note markers.
    site: SiteConfig,
}

impl PolicyConfig {
    /// Creates a policy from its component parts.
    pub fn new(workday: WorkdayConfig, discipline: DisciplineConfig, site: SiteConfig) -> Self {
        Self {
            workday,
            discipline,
            site,
        }
    }

    /// Returns the workday boundaries.
    pub fn workday(&self) -> &WorkdayConfig {
        &self.workday
    }

    /// Returns the discipline thresholds.
    pub fn discipline(&self) -> &DisciplineConfig {
        &self.discipline
    }

    /// Returns the site addresses and note markers.
    pub fn site(&self) -> &SiteConfig {
        &self.site
    }
}
