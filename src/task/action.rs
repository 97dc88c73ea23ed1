//! `Action`: the general-purpose leaf task. Ticks once with `OnStart`; if
//! that doesn't finish it, installs a periodic timer at the tree's interval
//! that re-ticks with `OnUpdate` and the elapsed delta until a result
//! arrives. On abort, ticks once more with `OnAbort`, which must not come
//! back `InProgress` (spec §4.5.1).

use crate::node::{Action as NodeAction, NodeCtx};
use crate::{ConstString, Delta, EventType, TickResult};
use std::time::Duration;

/// Tick on `start`: dispatch the node's delegate (falling back to the tree
/// root's target if the node names a method but no target of its own)
/// and/or script, and translate the result. `Succeeded`/`Failed` finish the
/// node immediately; `InProgress` arms the periodic update timer.
///
/// If neither a delegate nor a script is configured, the result is
/// `ctx.action_success_if_not_delegate` (spec §6/§7 "tick-with-no-delegate").
pub fn on_start(
    ctx: &NodeCtx<'_>,
    target: Option<&ConstString>,
    method: Option<&ConstString>,
    script_id: Option<&ConstString>,
    tick_interval: Duration,
) -> std::vec::Vec<NodeAction> {
    tick(ctx, target, method, script_id, EventType::OnStart, Delta::default(), tick_interval)
}

/// The periodic update timer fired: re-tick with `OnUpdate` and the elapsed
/// delta, and reschedule if the result is still `InProgress`.
pub fn on_timer(
    ctx: &NodeCtx<'_>,
    target: Option<&ConstString>,
    method: Option<&ConstString>,
    script_id: Option<&ConstString>,
    delta: Delta,
    tick_interval: Duration,
) -> std::vec::Vec<NodeAction> {
    tick(ctx, target, method, script_id, EventType::OnUpdate, delta, tick_interval)
}

/// Aborted while `InProgress`: stop the update timer and tick once with
/// `OnAbort`. The delegate/script is expected to settle synchronously; an
/// `InProgress` result here is treated as a failure (a misbehaving delegate
/// must not be allowed to keep a node alive past its own abort).
pub fn on_abort(
    ctx: &NodeCtx<'_>,
    target: Option<&ConstString>,
    method: Option<&ConstString>,
    script_id: Option<&ConstString>,
) -> std::vec::Vec<NodeAction> {
    let mut actions = std::vec![NodeAction::StopTimer];
    let result = tick(ctx, target, method, script_id, EventType::OnAbort, Delta::default(), Duration::ZERO);
    if result.is_empty() {
        tracing::error!("action node returned InProgress from OnAbort; treating as failure");
        actions.push(NodeAction::Finish(false));
    } else {
        actions.extend(result);
    }
    actions
}

/// A result arriving asynchronously from a previously `InProgress` delegate
/// call (the target's own background work finished and called back through
/// the owning stripe).
#[must_use]
pub fn on_delegate_result(result: TickResult) -> std::vec::Vec<NodeAction> {
    result_to_action(result, Duration::ZERO)
}

fn tick(
    ctx: &NodeCtx<'_>,
    target: Option<&ConstString>,
    method: Option<&ConstString>,
    script_id: Option<&ConstString>,
    event: EventType,
    delta: Delta,
    tick_interval: Duration,
) -> std::vec::Vec<NodeAction> {
    if let Some(method) = method {
        let target = target.or(ctx.default_target);
        let Some(target) = target else {
            tracing::error!(?method, "action node has a delegate method but no resolvable target");
            return std::vec![NodeAction::Finish(false)];
        };
        return match ctx.delegates.dispatch(target, method, event, delta) {
            Ok(result) => result_to_action(result, tick_interval),
            Err(err) => {
                tracing::error!(error = %err, "delegate dispatch failed");
                std::vec![NodeAction::Finish(false)]
            }
        };
    }
    if let Some(script_id) = script_id {
        return match ctx.script.run(script_id, &mut ctx.blackboard.as_script_env()) {
            Ok(value) => std::vec![NodeAction::Finish(crate::script::is_truthy(&value))],
            Err(err) => {
                tracing::error!(error = %err, "action script failed");
                std::vec![NodeAction::Finish(false)]
            }
        };
    }
    tracing::debug!("action node ticked with no delegate or script configured");
    std::vec![NodeAction::Finish(ctx.action_success_if_not_delegate)]
}

fn result_to_action(result: TickResult, tick_interval: Duration) -> std::vec::Vec<NodeAction> {
    match result {
        TickResult::InProgress if tick_interval.is_zero() => std::vec::Vec::new(),
        TickResult::InProgress => std::vec![NodeAction::ScheduleTimer(tick_interval)],
        TickResult::Succeeded => std::vec![NodeAction::Finish(true)],
        TickResult::Failed => std::vec![NodeAction::Finish(false)],
    }
}
