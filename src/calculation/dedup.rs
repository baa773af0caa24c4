//! Duplicate interval detection.
//!
//! Two intervals are duplicates when they agree on person, work date, raw
//! clock times and event type. The note is deliberately excluded from the
//! signature: a re-badged row that only differs in its note is still the
//! same physical presence, but the disagreement itself is worth surfacing,
//! so both rows get the conflict flag.
//!
//! The first occurrence keeps contributing to totals; later occurrences are
//! flagged and excluded downstream. Nothing is removed from the vector, the
//! audit trail keeps every row.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::models::Interval;

/// Flags second and later occurrences of identical intervals in place.
pub fn flag_duplicates(intervals: &mut [Interval]) {
    let mut first_seen: HashMap<String, usize> = HashMap::new();

    for index in 0..intervals.len() {
        let signature = duplicate_signature(&intervals[index]);
        match first_seen.entry(signature) {
            Entry::Vacant(slot) => {
                slot.insert(index);
            }
            Entry::Occupied(slot) => {
                let first_index = *slot.get();
                let notes_differ = intervals[first_index].note != intervals[index].note;

                let current = &mut intervals[index];
                current.flags.duplicate = true;
                current.flags.needs_review = true;
                if notes_differ {
                    current.flags.conflict = true;
                }

                if notes_differ {
                    let original = &mut intervals[first_index];
                    original.flags.conflict = true;
                    original.flags.needs_review = true;
                }
            }
        }
    }
}

fn duplicate_signature(interval: &Interval) -> String {
    format!(
        "{}|{}|{}|{}|{}",
        interval.person_id,
        interval
            .work_date
            .map(|date| date.to_string())
            .unwrap_or_default(),
        interval.clock_in_raw,
        interval.clock_out_raw.as_deref().unwrap_or(""),
        interval.event_type.code()
    )
}
