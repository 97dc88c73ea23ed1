//! The shared core of every observing-condition decorator (`BBCondition`,
//! `BBEntries`, `Condition`, `WaitCondition`), grounded in
//! `decorator/observingdecorator.go`.
//!
//! A subclass only has to decide *whether its predicate currently holds*
//! (`condition_met`) — starting/stopping the blackboard subscription,
//! deciding whether to run the child at all, and reacting to the predicate
//! flipping mid-run are identical across all four classes and live here.

use super::AbortMode;
use crate::node::Action;
use crate::{ConstString, NodeState};

/// Start: begin observing if this abort mode watches anything, then run the
/// child if (and only if) the predicate currently holds — otherwise finish
/// with failure immediately, without ever starting the child.
pub fn on_start(child: &ConstString, condition_met: bool, abort_mode: AbortMode) -> std::vec::Vec<Action> {
    let mut actions = std::vec::Vec::new();
    if abort_mode.observes() {
        actions.push(Action::StartObserving);
    }
    if condition_met {
        actions.push(Action::StartChild(child.clone()));
    } else {
        actions.push(Action::Finish(false));
    }
    actions
}

/// The child finished on its own (or was aborted and reported back): stop
/// observing unless this decorator wants to keep watching for a
/// `LowerPriority` abort even while inactive, then finish with the child's
/// result.
pub fn on_child_finished(abort_mode: AbortMode, succeeded: bool) -> std::vec::Vec<Action> {
    let mut actions = std::vec::Vec::new();
    if matches!(abort_mode, AbortMode::None | AbortMode::SelfAbort) {
        actions.push(Action::StopObserving);
    }
    actions.push(Action::Finish(succeeded));
    actions
}

/// A composite ancestor finished (this whole branch is being torn down):
/// always stop observing, regardless of abort mode.
#[must_use]
pub fn on_composite_ancestor_finished() -> std::vec::Vec<Action> {
    std::vec![Action::StopObserving]
}

/// React to the watched predicate changing value. No-op if the value didn't
/// actually flip (spec: only edges matter, not every write).
pub fn evaluate(
    child: &ConstString,
    state: NodeState,
    was_met: bool,
    now_met: bool,
    abort_mode: AbortMode,
) -> std::vec::Vec<Action> {
    if was_met == now_met {
        return std::vec::Vec::new();
    }
    match state {
        NodeState::Active if !now_met && abort_mode.aborts_self() => {
            std::vec![Action::AbortChild(child.clone())]
        }
        NodeState::Inactive if now_met && abort_mode.aborts_lower_priority() => {
            std::vec![Action::AbortLowerPriorityThan(child.clone())]
        }
        _ => std::vec::Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ConstString {
        ConstString::from(s)
    }

    #[test]
    fn start_runs_child_when_condition_already_met() {
        let actions = on_start(&id("child"), true, AbortMode::Both);
        assert_eq!(actions, std::vec![Action::StartObserving, Action::StartChild(id("child"))]);
    }

    #[test]
    fn start_finishes_failed_when_condition_not_met() {
        let actions = on_start(&id("child"), false, AbortMode::None);
        assert_eq!(actions, std::vec![Action::Finish(false)]);
    }

    #[test]
    fn evaluate_aborts_self_when_active_condition_turns_false() {
        let actions = evaluate(&id("child"), NodeState::Active, true, false, AbortMode::SelfAbort);
        assert_eq!(actions, std::vec![Action::AbortChild(id("child"))]);
    }

    #[test]
    fn evaluate_ignores_active_condition_turning_false_without_self_abort() {
        let actions = evaluate(&id("child"), NodeState::Active, true, false, AbortMode::LowerPriority);
        assert!(actions.is_empty());
    }

    #[test]
    fn evaluate_requests_lower_priority_abort_when_inactive_condition_turns_true() {
        let actions = evaluate(&id("child"), NodeState::Inactive, false, true, AbortMode::LowerPriority);
        assert_eq!(actions, std::vec![Action::AbortLowerPriorityThan(id("child"))]);
    }

    #[test]
    fn evaluate_no_op_when_value_unchanged() {
        let actions = evaluate(&id("child"), NodeState::Active, true, true, AbortMode::Both);
        assert!(actions.is_empty());
    }
}
