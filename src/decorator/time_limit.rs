//! `TimeMax`/`TimeMin`: bound how long the child is allowed, or required, to
//! run.

use crate::node::Action;
use crate::ConstString;
use std::time::Duration;

/// Start the child and arm a timer for `limit`.
pub fn on_start(child: &ConstString, limit: Duration) -> std::vec::Vec<Action> {
    std::vec![Action::StartChild(child.clone()), Action::ScheduleTimer(limit)]
}

/// `TimeMax`'s timer fired before the child finished: abort it. The
/// decorator itself finishes once `on_child_finished` reports the abort.
#[must_use]
pub fn on_timer_max(child: &ConstString) -> std::vec::Vec<Action> {
    std::vec![Action::AbortChild(child.clone())]
}

/// The child finished.
///
/// `TimeMax`: the child beat the clock — stop the timer and pass the result
/// through. `TimeMin`: if the minimum hasn't elapsed yet (`min_elapsed` is
/// `false`), hold the result (returns it via `pending`, caller is expected to
/// stash it and not finish yet); once the minimum has elapsed, finish
/// immediately with the held (or just-produced) result.
pub fn on_child_finished(is_minimum: bool, min_elapsed: bool, succeeded: bool) -> std::vec::Vec<Action> {
    if is_minimum && !min_elapsed {
        return std::vec::Vec::new();
    }
    std::vec![Action::StopTimer, Action::Finish(succeeded)]
}

/// `TimeMin`'s timer fired: if the child already finished, release the held
/// result now; otherwise there is nothing to do yet (the child is still
/// running and will pass `min_elapsed = true` to `on_child_finished` itself).
#[must_use]
pub fn on_timer_min(pending_result: Option<bool>) -> std::vec::Vec<Action> {
    pending_result.map_or_else(std::vec::Vec::new, |succeeded| std::vec![Action::Finish(succeeded)])
}
