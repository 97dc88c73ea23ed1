//! `BBEntries`: a `BBCondition` generalized to a set of keys, combined by
//! AND/OR (spec §10 supplement, grounded in `decorator/bbentries.go`).

use super::{BbConditionConfig, Combinator};

/// Evaluate every entry against the current blackboard via `lookup` (which
/// returns whether the key is present and its plain-text value), then
/// combine the per-entry results.
pub fn condition_met<F>(combinator: Combinator, entries: &[BbConditionConfig], mut lookup: F) -> bool
where
    F: FnMut(&str) -> (bool, std::string::String),
{
    let mut results = entries.iter().map(|entry| {
        let (present, stored) = lookup(&entry.key);
        entry.operator.matches(present, &stored, &entry.value)
    });
    match combinator {
        Combinator::And => results.all(|matched| matched),
        Combinator::Or => results.any(|matched| matched),
    }
}
