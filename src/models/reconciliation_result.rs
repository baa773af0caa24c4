//! The result envelope produced by one engine invocation.

use crate::models::{DailyRecord, Interval, PeriodRecord, ReasonCode, RunFacts};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Severity of a recap line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecapSeverity {
    /// Informational summary line.
    Info,
    /// Data-quality warning that should be checked.
    Warn,
    /// Line that requires human follow-up.
    Action,
}

/// Machine-readable pointer from a recap line to the metric it summarizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsHint {
    /// Name of the metric the line describes.
    pub metric: String,
    /// The metric's value at the time the line was rendered.
    pub value: i64,
}

/// One human-readable line of the run recap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecapLine {
    /// The rendered sentence.
    pub text: String,
    /// Line severity.
    pub severity: RecapSeverity,
    /// Optional metric pointer for dashboards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics_hint: Option<MetricsHint>,
}

/// One entry of the actions-queue seed.
///
/// The seed carries just enough for the external notification collaborator
/// to build its queue; message text and phone numbers stay outside the
/// engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSeed {
    /// Stable identifier, `MISS_{person}_{date}` or `REV_{person}_{date}`.
    pub action_id: String,
    /// Identifier of the person concerned.
    pub person_id: i64,
    /// The day concerned.
    pub work_date: NaiveDate,
    /// Reason codes of the day, in priority order.
    pub reason_codes: Vec<ReasonCode>,
}

/// Seeds for the external actions queue, split by follow-up kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionsQueueSeed {
    /// Workdays with no badge activity.
    pub missing_days: Vec<ActionSeed>,
    /// Days flagged for review.
    pub needs_review_days: Vec<ActionSeed>,
}

/// Everything one engine invocation produces.
///
/// The engine assigns no run metadata (run id, hash, timestamps); an
/// external orchestrator adds those after the call returns, which keeps
/// the serialized result byte-identical for identical inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    /// Calendar statistics for the period.
    pub run_facts: RunFacts,
    /// Human-readable run summary.
    pub recap_lines: Vec<RecapLine>,
    /// Every normalized interval, duplicates and misscans included,
    /// ordered by (person, input order).
    pub interval_results: Vec<Interval>,
    /// Surviving daily records, ordered by (person, date).
    pub daily_summary: Vec<DailyRecord>,
    /// One reconciled record per person, ordered by person.
    pub period_summary: Vec<PeriodRecord>,
    /// Seeds for the external actions queue.
    pub actions_queue_seed: ActionsQueueSeed,
    /// Rows rejected by the external validator, echoed unchanged.
    pub rejects_count: u64,
    /// Days flagged for review, counted after reason derivation.
    pub needs_review_days_count: i64,
    /// Days requiring action, counted after reason derivation.
    pub needs_action_days_count: i64,
    /// Version of the engine that produced this result.
    pub engine_version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recap_severity_serialization() {
        assert_eq!(
            serde_json::to_string(&RecapSeverity::Info).unwrap(),
            "\"INFO\""
        );
        assert_eq!(
            serde_json::to_string(&RecapSeverity::Warn).unwrap(),
            "\"WARN\""
        );
        assert_eq!(
            serde_json::to_string(&RecapSeverity::Action).unwrap(),
            "\"ACTION\""
        );
    }

    #[test]
    fn test_recap_line_without_hint_omits_field() {
        let line = RecapLine {
            text: "Period 2025-02: 20 workdays".to_string(),
            severity: RecapSeverity::Info,
            metrics_hint: None,
        };

        let json = serde_json::to_string(&line).unwrap();
        assert!(!json.contains("metrics_hint"));
    }

    #[test]
    fn test_recap_line_with_hint_round_trips() {
        let line = RecapLine {
            text: "3 open intervals".to_string(),
            severity: RecapSeverity::Warn,
            metrics_hint: Some(MetricsHint {
                metric: "open_intervals_count".to_string(),
                value: 3,
            }),
        };

        let json = serde_json::to_string(&line).unwrap();
        assert!(json.contains("\"metric\":\"open_intervals_count\""));

        let deserialized: RecapLine = serde_json::from_str(&json).unwrap();
        assert_eq!(line, deserialized);
    }

    #[test]
    fn test_action_seed_serialization() {
        let seed = ActionSeed {
            action_id: "MISS_1012_2025-02-03".to_string(),
            person_id: 1012,
            work_date: NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
            reason_codes: vec![ReasonCode::MissingDay],
        };

        let json = serde_json::to_string(&seed).unwrap();
        assert!(json.contains("\"action_id\":\"MISS_1012_2025-02-03\""));
        assert!(json.contains("\"MISSING_DAY\""));
    }

    #[test]
    fn test_actions_queue_seed_default_is_empty() {
        let seed = ActionsQueueSeed::default();
        assert!(seed.missing_days.is_empty());
        assert!(seed.needs_review_days.is_empty());
    }
}
