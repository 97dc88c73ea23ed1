//! `Root`: the single entry point of a tree (or of a static/dynamic subtree
//! container's linked content). Drives the one-shot-vs-looping lifecycle and,
//! for a main tree's root, the brain's finish-event bookkeeping (spec §4.4).

use crate::node::Action;
use crate::ConstString;
use std::time::Duration;

/// Configuration for a `Root` node.
#[derive(Debug, Clone, Copy)]
pub struct RootConfig {
    /// One-shot (finish after the first full run) vs. loop forever.
    pub once: bool,
    /// Default tick period handed to children that need a clock (an
    /// `Action` task's periodic re-tick, in particular).
    pub interval: Duration,
    /// Gap between loop iterations (ignored when `once`).
    pub loop_interval: Duration,
    /// Random deviation applied to `loop_interval`.
    pub loop_random_deviation: Duration,
}

/// Start: run the child immediately. Whether this is a main tree (vs. a
/// subtree container's linked root) only matters for blackboard
/// enable/finish-event bookkeeping, which the brain handles around this
/// call — the node-class logic itself is identical either way.
#[must_use]
pub fn on_start(child: &ConstString) -> std::vec::Vec<Action> {
    std::vec![Action::StartChild(child.clone())]
}

/// The child finished while the root was not itself being aborted: a
/// subtree container's linked root always finishes up to its parent
/// immediately; a main tree's root finishes if `once`, otherwise schedules
/// the next loop iteration.
#[must_use]
pub fn on_child_finished(is_subtree: bool, once: bool, succeeded: bool, loop_interval: Duration, deviation: Duration) -> std::vec::Vec<Action> {
    if is_subtree || once {
        return std::vec![Action::Finish(succeeded)];
    }
    std::vec![Action::ScheduleTimer(crate::util::duration::jittered(loop_interval, deviation))]
}

/// The loop-interval timer fired: start the child for another iteration.
#[must_use]
pub fn on_timer(child: &ConstString) -> std::vec::Vec<Action> {
    std::vec![Action::StartChild(child.clone())]
}

/// Aborted: finish immediately (the brain disables the blackboard
/// afterwards if this is a main tree's root).
#[must_use]
pub fn on_abort() -> std::vec::Vec<Action> {
    std::vec![Action::Finish(false)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> ConstString {
        ConstString::from("root-child")
    }

    #[test]
    fn once_finishes_after_one_iteration() {
        let actions = on_child_finished(false, true, true, Duration::from_secs(1), Duration::ZERO);
        assert_eq!(actions, std::vec![Action::Finish(true)]);
    }

    #[test]
    fn looping_schedules_the_next_iteration() {
        let actions = on_child_finished(false, false, true, Duration::from_millis(100), Duration::ZERO);
        assert_eq!(actions, std::vec![Action::ScheduleTimer(Duration::from_millis(100))]);
    }

    #[test]
    fn subtree_container_always_finishes_up_immediately() {
        let actions = on_child_finished(true, false, false, Duration::from_secs(5), Duration::ZERO);
        assert_eq!(actions, std::vec![Action::Finish(false)]);
    }

    #[test]
    fn abort_finishes_failed() {
        assert_eq!(on_abort(), std::vec![Action::Finish(false)]);
    }

    #[test]
    fn start_runs_the_child() {
        assert_eq!(on_start(&id()), std::vec![Action::StartChild(id())]);
    }
}
