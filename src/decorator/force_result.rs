//! `Failure`/`Succeeded`/`Inverter`: single-child decorators that always
//! start their child and rewrite its result on finish (spec §10 supplement,
//! grounded in `decorator/failure.go`, `decorator/succeeded.go`,
//! `decorator/inverter.go`, all subclasses of the same `SimpleDecorator`
//! base: start unconditionally, transform on finish).

use super::ForceResult;
use crate::node::Action;
use crate::ConstString;

/// Start: always run the child.
#[must_use]
pub fn on_start(child: &ConstString) -> std::vec::Vec<Action> {
    std::vec![Action::StartChild(child.clone())]
}

/// The child finished: rewrite its result per `mode`.
#[must_use]
pub fn on_child_finished(mode: ForceResult, succeeded: bool) -> std::vec::Vec<Action> {
    let result = match mode {
        ForceResult::AlwaysFail => false,
        ForceResult::AlwaysSucceed => true,
        ForceResult::Invert => !succeeded,
    };
    std::vec![Action::Finish(result)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> ConstString {
        ConstString::from("child")
    }

    #[test]
    fn start_always_runs_the_child() {
        assert_eq!(on_start(&id()), std::vec![Action::StartChild(id())]);
    }

    #[test]
    fn failure_always_forces_false() {
        assert_eq!(on_child_finished(ForceResult::AlwaysFail, true), std::vec![Action::Finish(false)]);
        assert_eq!(on_child_finished(ForceResult::AlwaysFail, false), std::vec![Action::Finish(false)]);
    }

    #[test]
    fn succeeded_always_forces_true() {
        assert_eq!(on_child_finished(ForceResult::AlwaysSucceed, true), std::vec![Action::Finish(true)]);
        assert_eq!(on_child_finished(ForceResult::AlwaysSucceed, false), std::vec![Action::Finish(true)]);
    }

    #[test]
    fn inverter_flips_the_result() {
        assert_eq!(on_child_finished(ForceResult::Invert, true), std::vec![Action::Finish(false)]);
        assert_eq!(on_child_finished(ForceResult::Invert, false), std::vec![Action::Finish(true)]);
    }
}
