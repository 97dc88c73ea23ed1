//! `Wait`: finishes after a fixed (jittered) duration, or never on its own if
//! `forever` — the only way out is an external abort. Grounded in
//! `task/wait.go`.

use crate::node::Action;
use crate::util::duration::jittered;
use std::time::Duration;

/// Start: arm a timer for `wait_time ± deviation/2`, unless `forever`.
#[must_use]
pub fn on_start(wait_time: Duration, deviation: Duration, forever: bool) -> std::vec::Vec<Action> {
    if forever {
        return std::vec::Vec::new();
    }
    std::vec![Action::ScheduleTimer(jittered(wait_time, deviation))]
}

/// The timer fired: succeed.
#[must_use]
pub fn on_timer() -> std::vec::Vec<Action> {
    std::vec![Action::Finish(true)]
}

/// Aborted before the timer fired: stop it and finish with `result_on_abort`.
#[must_use]
pub fn on_abort(result_on_abort: bool) -> std::vec::Vec<Action> {
    std::vec![Action::StopTimer, Action::Finish(result_on_abort)]
}
