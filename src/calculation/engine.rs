//! Run orchestration.
//!
//! Drives one reconciliation run end to end: normalization, duplicate
//! flagging, daily aggregation, monthly reconciliation, reason coding,
//! recap rendering and action seeding, in that order. The output is a
//! pure function of the inputs; identical inputs serialize to identical
//! bytes, which is what makes reruns comparable.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::config::PolicyConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    ActionSeed, ActionsQueueSeed, CalendarDay, DailyRecord, Datasets, Period, Person,
    ReconciliationResult, ValidationSummary,
};

use super::daily::aggregate_daily;
use super::dedup::flag_duplicates;
use super::normalize::normalize_events;
use super::reasons::assign_reason_codes;
use super::recap::build_recap_lines;
use super::reconcile::reconcile_periods;
use super::run_facts::summarize_calendar;

/// Runs a full reconciliation over one period.
///
/// `validation` carries the count of rows the importer rejected before
/// the engine ever saw them; it passes through to the result untouched.
pub fn compute(
    datasets: &Datasets,
    period: &Period,
    validation: &ValidationSummary,
    policy: &PolicyConfig,
) -> EngineResult<ReconciliationResult> {
    if period.date_from > period.date_to {
        return Err(EngineError::InvalidPeriod {
            message: format!(
                "date_from {} is after date_to {}",
                period.date_from, period.date_to
            ),
        });
    }

    let calendar: BTreeMap<NaiveDate, CalendarDay> = datasets
        .calendar
        .iter()
        .map(|day| (day.date, *day))
        .collect();
    let people: BTreeMap<i64, Person> = datasets
        .people
        .iter()
        .map(|person| (person.id, person.clone()))
        .collect();

    let mut intervals = normalize_events(&datasets.raw_events, &calendar, policy);
    flag_duplicates(&mut intervals);

    let mut daily = aggregate_daily(&intervals, &calendar, &people, period, policy)?;
    let mut periods = reconcile_periods(&daily, &intervals, &calendar, &people, period, policy);

    // Reason derivation can flip further days to review (suspiciously
    // short presence), so the per-person review counter is refreshed
    // after it runs.
    assign_reason_codes(&mut daily, &intervals, policy);
    for record in periods.values_mut() {
        record.needs_review_days = daily
            .values()
            .filter(|day| day.person_id == record.person_id && day.needs_review)
            .count() as i64;
    }

    let mut run_facts = summarize_calendar(&calendar, period, policy);
    run_facts.effective_presence_minutes = daily.values().map(|day| day.work_minutes).sum();

    let recap_lines = build_recap_lines(&run_facts, &daily, &periods);
    let actions_queue_seed = seed_actions(&daily);

    let needs_review_days_count = daily.values().filter(|day| day.needs_review).count() as i64;
    let needs_action_days_count = daily.values().filter(|day| day.needs_action).count() as i64;

    // Stable sort: rows keep their input order within each person.
    intervals.sort_by_key(|interval| interval.person_id);

    Ok(ReconciliationResult {
        run_facts,
        recap_lines,
        interval_results: intervals,
        daily_summary: daily.into_values().collect(),
        period_summary: periods.into_values().collect(),
        actions_queue_seed,
        rejects_count: validation.rejects_count,
        needs_review_days_count,
        needs_action_days_count,
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// One queue entry per missing day and per review day, in (person, date)
/// order. Identifiers are reproducible so reruns land on the same queue
/// rows.
fn seed_actions(daily: &BTreeMap<(i64, NaiveDate), DailyRecord>) -> ActionsQueueSeed {
    let mut seed = ActionsQueueSeed::default();
    for ((person_id, work_date), record) in daily {
        if record.missing_attendance_day {
            seed.missing_days.push(ActionSeed {
                action_id: format!("MISS_{person_id}_{work_date}"),
                person_id: *person_id,
                work_date: *work_date,
                reason_codes: record.reason_codes.clone(),
            });
        }
        if record.needs_review {
            seed.needs_review_days.push(ActionSeed {
                action_id: format!("REV_{person_id}_{work_date}"),
                person_id: *person_id,
                work_date: *work_date,
                reason_codes: record.reason_codes.clone(),
            });
        }
    }
    seed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PersonMode, RawEvent, ReasonCode};

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn workday(date_str: &str) -> CalendarDay {
        CalendarDay {
            date: make_date(date_str),
            is_workday: true,
            is_holiday: false,
            is_collective_leave: false,
        }
    }

    fn full_person(id: i64, last_name: &str) -> Person {
        Person {
            id,
            last_name: last_name.to_string(),
            first_name: "Ana".to_string(),
            phone: None,
            group_code: Some("G1".to_string()),
            mode: PersonMode::Full,
        }
    }

    fn make_event(person_id: i64, clock_in: &str, clock_out: &str) -> RawEvent {
        RawEvent {
            person_id,
            clock_in: clock_in.to_string(),
            clock_out: Some(clock_out.to_string()),
            ..Default::default()
        }
    }

    fn two_day_period() -> Period {
        Period {
            date_from: make_date("2025-02-03"),
            date_to: make_date("2025-02-04"),
            label: None,
        }
    }

    fn two_day_datasets(raw_events: Vec<RawEvent>) -> Datasets {
        Datasets {
            raw_events,
            calendar: vec![workday("2025-02-03"), workday("2025-02-04")],
            people: vec![full_person(1012, "Horvat")],
        }
    }

    fn run(datasets: &Datasets, period: &Period) -> ReconciliationResult {
        let policy = PolicyConfig::default();
        let validation = ValidationSummary { rejects_count: 3 };
        compute(datasets, period, &validation, &policy).unwrap()
    }

    // ===== EN-001: period validation =====

    #[test]
    fn test_inverted_period_is_rejected() {
        let period = Period {
            date_from: make_date("2025-02-28"),
            date_to: make_date("2025-02-01"),
            label: None,
        };
        let datasets = two_day_datasets(vec![]);
        let policy = PolicyConfig::default();
        let validation = ValidationSummary::default();

        let error = compute(&datasets, &period, &validation, &policy).unwrap_err();
        assert!(matches!(error, EngineError::InvalidPeriod { .. }));
    }

    // ===== EN-002: clean run shape =====

    #[test]
    fn test_clean_run_produces_full_result() {
        // Two on-time shifts covering both workdays of the period.
        let datasets = two_day_datasets(vec![
            make_event(1012, "03/02/2025 07:30", "03/02/2025 15:30"),
            make_event(1012, "04/02/2025 07:30", "04/02/2025 15:30"),
        ]);
        let result = run(&datasets, &two_day_period());

        assert_eq!(result.daily_summary.len(), 2);
        assert_eq!(result.period_summary.len(), 1);
        let period_record = &result.period_summary[0];
        assert_eq!(period_record.payable_days, 2);
        assert_eq!(period_record.fund_minutes, 960);
        assert_eq!(period_record.total_paid_minutes_base, 960);
        assert_eq!(period_record.paid_shortage_minutes, 0);

        assert_eq!(result.run_facts.workdays_count, 2);
        assert_eq!(result.run_facts.effective_presence_minutes, 960);
        assert!(result.actions_queue_seed.missing_days.is_empty());
        assert!(result.actions_queue_seed.needs_review_days.is_empty());
        assert_eq!(result.needs_review_days_count, 0);
        assert_eq!(result.needs_action_days_count, 0);
        assert_eq!(result.rejects_count, 3);
        assert_eq!(result.engine_version, env!("CARGO_PKG_VERSION"));
    }

    // ===== EN-003: determinism =====

    #[test]
    fn test_identical_inputs_serialize_to_identical_bytes() {
        let datasets = two_day_datasets(vec![
            make_event(1012, "03/02/2025 07:45", "03/02/2025 15:30"),
            make_event(1012, "04/02/2025 07:30", "04/02/2025 14:00"),
        ]);
        let period = two_day_period();

        let first = serde_json::to_string(&run(&datasets, &period)).unwrap();
        let second = serde_json::to_string(&run(&datasets, &period)).unwrap();
        assert_eq!(first, second);
    }

    // ===== EN-004: action seeding =====

    #[test]
    fn test_missing_day_seeds_action_queue() {
        // Present Monday, absent Tuesday.
        let datasets =
            two_day_datasets(vec![make_event(1012, "03/02/2025 07:30", "03/02/2025 15:30")]);
        let result = run(&datasets, &two_day_period());

        assert_eq!(result.actions_queue_seed.missing_days.len(), 1);
        let seed = &result.actions_queue_seed.missing_days[0];
        assert_eq!(seed.action_id, "MISS_1012_2025-02-04");
        assert_eq!(seed.person_id, 1012);
        assert_eq!(seed.work_date, make_date("2025-02-04"));
        assert!(seed.reason_codes.contains(&ReasonCode::MissingDay));
        assert_eq!(result.needs_action_days_count, 1);
    }

    #[test]
    fn test_open_interval_seeds_review_queue() {
        let mut open_event = make_event(1012, "03/02/2025 07:30", "");
        open_event.clock_out = None;
        let datasets = two_day_datasets(vec![
            open_event,
            make_event(1012, "04/02/2025 07:30", "04/02/2025 15:30"),
        ]);
        let result = run(&datasets, &two_day_period());

        assert_eq!(result.actions_queue_seed.needs_review_days.len(), 1);
        let seed = &result.actions_queue_seed.needs_review_days[0];
        assert_eq!(seed.action_id, "REV_1012_2025-02-03");
        assert!(seed.reason_codes.contains(&ReasonCode::OpenInterval));
        assert_eq!(result.needs_review_days_count, 1);
    }

    // ===== EN-005: review counter refresh =====

    #[test]
    fn test_suspiciously_short_day_reaches_period_counter() {
        // A two-minute badge touch before the real shift. Normalization
        // leaves the day clean; only reason derivation flags it, so the
        // period counter must be refreshed afterwards.
        let datasets = two_day_datasets(vec![
            make_event(1012, "03/02/2025 07:30", "03/02/2025 07:32"),
            make_event(1012, "03/02/2025 08:00", "03/02/2025 15:30"),
            make_event(1012, "04/02/2025 07:30", "04/02/2025 15:30"),
        ]);
        let result = run(&datasets, &two_day_period());

        let day = result
            .daily_summary
            .iter()
            .find(|record| record.work_date == make_date("2025-02-03"))
            .unwrap();
        assert!(day.needs_review);
        assert!(day
            .reason_codes
            .contains(&ReasonCode::SuspiciousShortInterval));
        assert_eq!(result.period_summary[0].needs_review_days, 1);
        assert_eq!(result.needs_review_days_count, 1);
    }

    // ===== EN-006: interval ordering =====

    #[test]
    fn test_intervals_group_by_person_keeping_input_order() {
        let mut datasets = two_day_datasets(vec![
            make_event(2000, "03/02/2025 07:30", "03/02/2025 15:30"),
            make_event(1000, "03/02/2025 07:30", "03/02/2025 15:30"),
            make_event(2000, "04/02/2025 07:30", "04/02/2025 15:30"),
        ]);
        datasets.people = vec![full_person(1000, "Babic"), full_person(2000, "Novak")];
        let result = run(&datasets, &two_day_period());

        let order: Vec<(i64, NaiveDate)> = result
            .interval_results
            .iter()
            .map(|interval| (interval.person_id, interval.work_date.unwrap()))
            .collect();
        assert_eq!(
            order,
            vec![
                (1000, make_date("2025-02-03")),
                (2000, make_date("2025-02-03")),
                (2000, make_date("2025-02-04")),
            ]
        );
    }

    // ===== EN-007: achieved presence fill =====

    #[test]
    fn test_effective_presence_sums_capped_daily_work() {
        // Monday runs long (counts 480 after the cap), Tuesday is short.
        let datasets = two_day_datasets(vec![
            make_event(1012, "03/02/2025 07:30", "03/02/2025 17:00"),
            make_event(1012, "04/02/2025 07:30", "04/02/2025 13:30"),
        ]);
        let result = run(&datasets, &two_day_period());

        assert_eq!(result.run_facts.effective_presence_minutes, 480 + 360);
        let recap = &result.recap_lines[1];
        assert_eq!(
            recap.text,
            "Expected effective presence 960 min, achieved 840 min"
        );
    }

    // ===== EN-008: determinism property =====

    mod determinism {
        use super::*;
        use crate::models::EventType;
        use proptest::prelude::*;

        fn arb_timestamp() -> impl Strategy<Value = String> {
            (3u32..=4, 0u32..24, 0u32..60)
                .prop_map(|(day, hour, minute)| format!("{day:02}/02/2025 {hour:02}:{minute:02}"))
        }

        fn arb_event() -> impl Strategy<Value = RawEvent> {
            (
                1i64..4,
                arb_timestamp(),
                proptest::option::of(arb_timestamp()),
                prop_oneof![
                    Just(EventType::Regular),
                    Just(EventType::Sick),
                    Just(EventType::WorkFromHome),
                    Just(EventType::HolidayWork),
                    Just(EventType::Misscan),
                    Just(EventType::Unrecognized(42)),
                ],
            )
                .prop_map(|(person_id, clock_in, clock_out, event_type)| RawEvent {
                    person_id,
                    clock_in,
                    clock_out,
                    event_type,
                    ..RawEvent::default()
                })
        }

        proptest! {
            // Any mix of events, open rows and odd codes included, must
            // serialize to the same bytes when run twice.
            #[test]
            fn prop_reruns_serialize_to_identical_bytes(
                events in proptest::collection::vec(arb_event(), 0..8)
            ) {
                let mut datasets = two_day_datasets(events);
                datasets.people.push(full_person(2, "Novak"));
                let period = two_day_period();

                let first = serde_json::to_string(&run(&datasets, &period)).unwrap();
                let second = serde_json::to_string(&run(&datasets, &period)).unwrap();
                prop_assert_eq!(first, second);
            }
        }
    }
}
