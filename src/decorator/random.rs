//! `Random`: starts its child with a configured probability, otherwise
//! fails immediately without ever running it (spec §10 supplement, grounded
//! in `decorator/random.go`). The dice roll itself is sampled by the caller
//! and passed in, keeping this function pure like every other node class.

use crate::node::Action;
use crate::ConstString;

/// Start: run the child if `roll <= probability` (`probability` clamped to
/// `0.0..=1.0`, matching the Go original's getter), otherwise finish failed.
#[must_use]
pub fn on_start(child: &ConstString, probability: f64, roll: f64) -> std::vec::Vec<Action> {
    if roll <= probability.clamp(0.0, 1.0) {
        std::vec![Action::StartChild(child.clone())]
    } else {
        std::vec![Action::Finish(false)]
    }
}

/// The child finished: pass its result straight through.
#[must_use]
pub fn on_child_finished(succeeded: bool) -> std::vec::Vec<Action> {
    std::vec![Action::Finish(succeeded)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> ConstString {
        ConstString::from("child")
    }

    #[test]
    fn runs_child_when_roll_is_within_probability() {
        assert_eq!(on_start(&id(), 0.5, 0.3), std::vec![Action::StartChild(id())]);
    }

    #[test]
    fn fails_without_starting_child_when_roll_exceeds_probability() {
        assert_eq!(on_start(&id(), 0.5, 0.9), std::vec![Action::Finish(false)]);
    }

    #[test]
    fn probability_is_clamped_to_the_unit_range() {
        assert_eq!(on_start(&id(), 1.5, 0.99), std::vec![Action::StartChild(id())]);
        assert_eq!(on_start(&id(), -0.5, 0.0), std::vec![Action::Finish(false)]);
    }

    #[test]
    fn child_finished_passes_result_through() {
        assert_eq!(on_child_finished(true), std::vec![Action::Finish(true)]);
        assert_eq!(on_child_finished(false), std::vec![Action::Finish(false)]);
    }
}
