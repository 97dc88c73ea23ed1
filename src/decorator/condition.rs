//! `Condition`: an observing condition whose predicate is evaluated by
//! periodically polling a delegate or script, rather than watching a
//! blackboard key (spec §10 supplement, grounded in `condition.go`, which
//! extends `ObservingDecorator` the same way `Service` extends a plain
//! decorator: a ticked poll instead of a subscription).

use super::AbortMode;
use crate::node::{Action, NodeCtx};
use crate::util::duration::jittered;
use crate::{ConstString, Delta, EventType, NodeState, TickResult};
use std::time::Duration;

/// Evaluate the predicate once via delegate (falling back to the tree
/// root's target) or compiled script. A failed dispatch, a still-`InProgress`
/// delegate, or no delegate/script at all are all treated as "not met" —
/// unlike `Action`, a condition never waits.
#[must_use]
pub fn evaluate_once(ctx: &NodeCtx<'_>, target: Option<&ConstString>, method: Option<&ConstString>, script_id: Option<&ConstString>) -> bool {
    if let Some(method) = method {
        let target = target.or(ctx.default_target);
        return match target {
            Some(target) => matches!(ctx.delegates.dispatch(target, method, EventType::OnStart, Delta::default()), Ok(TickResult::Succeeded)),
            None => {
                tracing::error!(?method, "condition node has a delegate method but no resolvable target");
                false
            }
        };
    }
    if let Some(script_id) = script_id {
        return match ctx.script.run(script_id, &mut ctx.blackboard.as_script_env()) {
            Ok(value) => crate::script::is_truthy(&value),
            Err(err) => {
                tracing::error!(error = %err, "condition script failed");
                false
            }
        };
    }
    false
}

/// Start: run the child if the predicate currently holds, otherwise finish
/// failed without ever starting it; arm the first poll timer if this abort
/// mode watches anything.
#[must_use]
pub fn on_start(child: &ConstString, condition_met: bool, abort_mode: AbortMode, interval: Duration, deviation: Duration) -> std::vec::Vec<Action> {
    let mut actions = std::vec::Vec::new();
    if abort_mode.observes() {
        actions.push(Action::ScheduleTimer(jittered(interval, deviation)));
    }
    if condition_met {
        actions.push(Action::StartChild(child.clone()));
    } else {
        actions.push(Action::Finish(false));
    }
    actions
}

/// The poll timer fired: react like any observing condition to the
/// predicate's edge, then reschedule the next poll.
#[must_use]
pub fn on_timer(child: &ConstString, state: NodeState, was_met: bool, now_met: bool, abort_mode: AbortMode, interval: Duration, deviation: Duration) -> std::vec::Vec<Action> {
    let mut actions = super::observing_condition::evaluate(child, state, was_met, now_met, abort_mode);
    actions.push(Action::ScheduleTimer(jittered(interval, deviation)));
    actions
}

/// The child finished: stop polling unless still watching for a
/// lower-priority abort while inactive, then finish with the child's result.
#[must_use]
pub fn on_child_finished(abort_mode: AbortMode, succeeded: bool) -> std::vec::Vec<Action> {
    let mut actions = std::vec::Vec::new();
    if matches!(abort_mode, AbortMode::None | AbortMode::SelfAbort) {
        actions.push(Action::StopTimer);
    }
    actions.push(Action::Finish(succeeded));
    actions
}
