//! Configuration loading functionality.
//!
//! This module provides the [`PolicyLoader`] type for loading the
//! attendance policy from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{DisciplineConfig, PolicyConfig, SiteConfig, WorkdayConfig};

/// Loads and provides access to the attendance policy.
///
/// The `PolicyLoader` reads YAML configuration files from a directory and
/// exposes the typed policy to the engine and the API layer.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/attendance/
/// ├── workday.yaml     # Nominal day boundaries and minute norm
/// ├── discipline.yaml  # Lateness and anti-gaming thresholds
/// └── site.yaml        # Badge reader addresses and note markers
/// ```
///
/// # Example
///
/// ```no_run
/// use attendance_engine::config::PolicyLoader;
///
/// let loader = PolicyLoader::load("./config/attendance").unwrap();
/// assert_eq!(loader.workday().minutes_per_day, 480);
/// ```
#[derive(Debug, Clone)]
pub struct PolicyLoader {
    config: PolicyConfig,
}

impl PolicyLoader {
    /// Loads the policy from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory
    ///   (e.g., "./config/attendance")
    ///
    /// # Returns
    ///
    /// Returns a `PolicyLoader` instance on success, or an error if any
    /// required file is missing or contains invalid YAML.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use attendance_engine::config::PolicyLoader;
    ///
    /// let loader = PolicyLoader::load("./config/attendance")?;
    /// # Ok::<(), attendance_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        // Load workday.yaml
        let workday_path = path.join("workday.yaml");
        let workday = Self::load_yaml::<WorkdayConfig>(&workday_path)?;

        // Load discipline.yaml
        let discipline_path = path.join("discipline.yaml");
        let discipline = Self::load_yaml::<DisciplineConfig>(&discipline_path)?;

        // Load site.yaml
        let site_path = path.join("site.yaml");
        let site = Self::load_yaml::<SiteConfig>(&site_path)?;

        Ok(Self {
            config: PolicyConfig::new(workday, discipline, site),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the complete policy.
    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Returns the workday boundaries.
    pub fn workday(&self) -> &WorkdayConfig {
        self.config.workday()
    }

    /// Returns the discipline thresholds.
    pub fn discipline(&self) -> &DisciplineConfig {
        self.config.discipline()
    }

    /// Returns the site addresses and note markers.
    pub fn site(&self) -> &SiteConfig {
        self.config.site()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn config_path() -> &'static str {
        "./config/attendance"
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = PolicyLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.workday().minutes_per_day, 480);
        assert_eq!(loader.workday().start_time.to_string(), "07:30:00");
        assert_eq!(loader.workday().end_time.to_string(), "15:30:00");
    }

    #[test]
    fn test_discipline_thresholds_loaded_correctly() {
        let loader = PolicyLoader::load(config_path()).unwrap();

        let discipline = loader.discipline();
        assert_eq!(discipline.late_grace_max_minutes, 30);
        assert_eq!(discipline.late_bucket_minutes, 30);
        assert_eq!(discipline.big_late_offset_minutes, 5);
        assert_eq!(discipline.late_debt_multiplier, Decimal::ONE);
        assert_eq!(discipline.early_overtime_threshold_minutes, 20);
        assert_eq!(discipline.early_overtime_deduct_minutes, 5);
        assert_eq!(discipline.split_shift_min_minutes, 15);
        assert_eq!(discipline.suspicious_short_max_minutes, 2);
        assert_eq!(discipline.excessive_duration_minutes, 960);
    }

    #[test]
    fn test_site_config_loaded_correctly() {
        let loader = PolicyLoader::load(config_path()).unwrap();

        let site = loader.site();
        assert!(site.is_onsite_reader(Some("192.168.100.77")));
        assert!(site.is_onsite_reader(Some("192.168.100.41")));
        assert!(site.is_wfh_note("001_RadOdKuce"));
        assert!(site.is_collective_leave_note("Kolektivni GO"));
    }

    #[test]
    fn test_loaded_config_matches_defaults() {
        // The shipped files carry the same values as the Default impls so
        // library users without a config directory see identical policy.
        let loader = PolicyLoader::load(config_path()).unwrap();
        let default = PolicyConfig::default();

        assert_eq!(
            loader.workday().minutes_per_day,
            default.workday().minutes_per_day
        );
        assert_eq!(
            loader.discipline().late_bucket_minutes,
            default.discipline().late_bucket_minutes
        );
        assert_eq!(
            loader.site().wfh_note_marker,
            default.site().wfh_note_marker
        );
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = PolicyLoader::load("/nonexistent/path");
        assert!(result.is_err());

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("workday.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }
}
