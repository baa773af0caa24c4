//! Person roster model.

use serde::{Deserialize, Serialize};

/// Controls how much of the calendar skeleton a person participates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonMode {
    /// Regular staff: missing-day detection and holiday/collective-leave
    /// skeleton rows apply.
    Full,
    /// External or irregular staff: appear in output only with real badge
    /// activity or review/action flags.
    Slim,
}

impl Default for PersonMode {
    fn default() -> Self {
        PersonMode::Full
    }
}

/// One person from the roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Identifier matching `RawEvent::person_id`.
    pub id: i64,
    /// Family name.
    pub last_name: String,
    /// Given name.
    pub first_name: String,
    /// Phone number, used by the external notification collaborator.
    #[serde(default)]
    pub phone: Option<String>,
    /// Organizational group code.
    #[serde(default)]
    pub group_code: Option<String>,
    /// Skeleton participation mode.
    #[serde(default)]
    pub mode: PersonMode,
}

impl Person {
    /// Returns true when the person is excluded from missing-day detection
    /// and calendar skeleton seeding.
    pub fn is_slim(&self) -> bool {
        self.mode == PersonMode::Slim
    }
}
