//! `Service`: ticks a delegate/script on a period for as long as its child
//! runs; the service's own delegate result never affects the child's or the
//! decorator's outcome — only the child's result does.

use crate::node::{Action, NodeCtx};
use crate::util::duration::jittered;
use crate::{ConstString, Delta, EventType};
use std::time::Duration;

/// Start the child and schedule the first periodic tick.
pub fn on_start(child: &ConstString, period: Duration, deviation: Duration) -> std::vec::Vec<Action> {
    std::vec![Action::StartChild(child.clone()), Action::ScheduleTimer(jittered(period, deviation))]
}

/// The periodic timer fired: dispatch the service's own delegate/script (if
/// configured) and reschedule. The delegate's result is intentionally
/// discarded — errors are the caller's (the `Brain`'s) concern to log, not
/// something that reaches the child or the decorator's own finish.
pub fn on_timer(
    ctx: &NodeCtx<'_>,
    target: Option<&ConstString>,
    method: Option<&ConstString>,
    period: Duration,
    deviation: Duration,
) -> std::vec::Vec<Action> {
    if let (Some(target), Some(method)) = (target.or(ctx.default_target), method) {
        let _ = ctx.delegates.dispatch(target, method, EventType::OnUpdate, Delta::default());
    }
    std::vec![Action::ScheduleTimer(jittered(period, deviation))]
}

/// The child finished: stop the periodic timer and pass the result through
/// unchanged.
#[must_use]
pub fn on_child_finished(succeeded: bool) -> std::vec::Vec<Action> {
    std::vec![Action::StopTimer, Action::Finish(succeeded)]
}
