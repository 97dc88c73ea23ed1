//! `Parallel`: runs every child at once, finishing per a success/failure
//! policy (spec §4.2 "parallel accounting table"), grounded in
//! `composite/parallel.go`.

use crate::blackboard::ParallelMemory;
use crate::node::Action;
use crate::ConstString;

/// When a `Parallel` is allowed to succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessPolicy {
    /// Succeed as soon as one child succeeds.
    One,
    /// Succeed only once every child has succeeded.
    All,
}

/// When a `Parallel` is allowed to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Fail as soon as one child fails.
    One,
    /// Fail only once every child has failed (or, combined with
    /// `SuccessPolicy::All`, once every child has settled without every
    /// child succeeding).
    All,
}

/// `Parallel`'s full config.
#[derive(Debug, Clone, Copy)]
pub struct Parallel {
    pub success_policy: SuccessPolicy,
    pub failure_policy: FailurePolicy,
}

/// Start every child at once.
pub fn on_start(children: &[ConstString]) -> (ParallelMemory, std::vec::Vec<Action>) {
    let memory = ParallelMemory { running_count: children.len() as u32, ..ParallelMemory::default() };
    let actions = children.iter().cloned().map(Action::StartChild).collect();
    (memory, actions)
}

/// Abort every still-active child; the `Parallel` itself finishes once the
/// last of them reports back through `on_child_finished`.
pub fn on_abort(children: &[ConstString], memory: &ParallelMemory) -> std::vec::Vec<Action> {
    children
        .iter()
        .filter(|c| !memory.children_succeeded.contains_key(*c))
        .cloned()
        .map(Action::AbortChild)
        .collect()
}

/// Decide the final result once every child has settled, per spec's
/// accounting table: `SuccessPolicy::All` requires zero failures as well as
/// every child succeeding (a `FailurePolicy::One` would have already ended
/// the run), otherwise success is `succeeded_count > 0`.
fn final_result(policy: &Parallel, memory: &ParallelMemory, total: usize) -> bool {
    match (policy.success_policy, policy.failure_policy) {
        (SuccessPolicy::All, _) => memory.succeeded_count as usize == total,
        (SuccessPolicy::One, _) => memory.succeeded_count > 0,
    }
}

/// Record one child's result, deciding whether to finish the `Parallel`, to
/// trigger an early abort of the rest (a `One` policy was satisfied before
/// every child settled), or to keep waiting.
pub fn on_child_finished(
    policy: &Parallel,
    children: &[ConstString],
    child: &ConstString,
    succeeded: bool,
    memory: &mut ParallelMemory,
) -> std::vec::Vec<Action> {
    memory.running_count = memory.running_count.saturating_sub(1);
    if succeeded {
        memory.succeeded_count += 1;
    } else {
        memory.failed_count += 1;
    }
    memory.children_succeeded.insert(child.clone(), succeeded);

    let settled = memory.running_count + memory.succeeded_count + memory.failed_count;
    let all_started = settled as usize == children.len();

    if !all_started {
        return std::vec::Vec::new();
    }

    if memory.running_count == 0 {
        let result = final_result(policy, memory, children.len());
        memory.succeeded = Some(result);
        return std::vec![Action::Finish(result)];
    }

    if !memory.children_aborted
        && ((policy.failure_policy == FailurePolicy::One && memory.failed_count > 0)
            || (policy.success_policy == SuccessPolicy::One && memory.succeeded_count > 0))
    {
        memory.children_aborted = true;
        return children
            .iter()
            .filter(|c| !memory.children_succeeded.contains_key(*c))
            .cloned()
            .map(Action::AbortChild)
            .collect();
    }

    std::vec::Vec::new()
}

/// Restart a child that has already finished: an `ObservingCondition` nested
/// in `child`'s subtree is inactive (its branch settled) but still watching,
/// and its predicate just turned true again
/// (`AbortMode::LowerPriority`/`Both`). Un-settles `child`'s prior result and
/// starts it fresh — no abort needed, since an already-finished child is
/// already `Inactive`.
pub fn restart_child(child: &ConstString, memory: &mut ParallelMemory) -> std::vec::Vec<Action> {
    if let Some(prev) = memory.children_succeeded.remove(child) {
        if prev {
            memory.succeeded_count = memory.succeeded_count.saturating_sub(1);
        } else {
            memory.failed_count = memory.failed_count.saturating_sub(1);
        }
    }
    memory.running_count += 1;
    memory.succeeded = None;
    memory.children_aborted = false;
    std::vec![Action::StartChild(child.clone())]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> std::vec::Vec<ConstString> {
        (0..n).map(|i| ConstString::from(std::format!("c{i}"))).collect()
    }

    #[test]
    fn one_and_all_succeeds_on_first_success() {
        let policy = Parallel { success_policy: SuccessPolicy::One, failure_policy: FailurePolicy::All };
        let children = ids(3);
        let (mut memory, _) = on_start(&children);
        let actions = on_child_finished(&policy, &children, &children[0], true, &mut memory);
        assert!(actions.iter().any(|a| matches!(a, Action::AbortChild(_))));
        assert!(memory.children_aborted);
    }

    #[test]
    fn all_and_all_waits_for_every_child() {
        let policy = Parallel { success_policy: SuccessPolicy::All, failure_policy: FailurePolicy::All };
        let children = ids(2);
        let (mut memory, _) = on_start(&children);
        let actions = on_child_finished(&policy, &children, &children[0], true, &mut memory);
        assert!(actions.is_empty());
        let actions = on_child_finished(&policy, &children, &children[1], true, &mut memory);
        assert_eq!(actions, std::vec![Action::Finish(true)]);
    }

    #[test]
    fn all_and_all_fails_if_any_child_fails() {
        let policy = Parallel { success_policy: SuccessPolicy::All, failure_policy: FailurePolicy::All };
        let children = ids(2);
        let (mut memory, _) = on_start(&children);
        let _ = on_child_finished(&policy, &children, &children[0], false, &mut memory);
        let actions = on_child_finished(&policy, &children, &children[1], true, &mut memory);
        assert_eq!(actions, std::vec![Action::Finish(false)]);
    }

    #[test]
    fn restarting_an_already_finished_child_unsettles_it_and_starts_it() {
        let policy = Parallel { success_policy: SuccessPolicy::All, failure_policy: FailurePolicy::All };
        let children = ids(2);
        let (mut memory, _) = on_start(&children);
        let _ = on_child_finished(&policy, &children, &children[0], true, &mut memory);
        assert_eq!(memory.succeeded_count, 1);

        let actions = restart_child(&children[0], &mut memory);
        assert_eq!(actions, std::vec![Action::StartChild(children[0].clone())]);
        assert_eq!(memory.succeeded_count, 0);
        assert_eq!(memory.running_count, 1);
    }
}
