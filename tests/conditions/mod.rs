//! Condition end-to-end scenarios.

mod bb_entries_and;
