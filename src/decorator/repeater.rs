//! `Repeater`: re-runs its child up to `count` times (or forever), stopping
//! the first time the child fails.

use crate::node::Action;
use crate::ConstString;

/// Start the first iteration.
#[must_use]
pub fn on_start(child: &ConstString) -> std::vec::Vec<Action> {
    std::vec![Action::StartChild(child.clone())]
}

/// The child finished: on failure, stop immediately with failure. On
/// success, start another iteration unless `count` iterations have now run,
/// in which case finish with success.
pub fn on_child_finished(
    child: &ConstString,
    succeeded: bool,
    count: Option<u32>,
    completed: &mut u32,
) -> std::vec::Vec<Action> {
    if !succeeded {
        return std::vec![Action::Finish(false)];
    }
    *completed += 1;
    if count.is_some_and(|limit| *completed >= limit) {
        return std::vec![Action::Finish(true)];
    }
    std::vec![Action::StartChild(child.clone())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_immediately_on_failure() {
        let child = ConstString::from("c");
        let mut completed = 2;
        let actions = on_child_finished(&child, false, Some(5), &mut completed);
        assert_eq!(actions, std::vec![Action::Finish(false)]);
    }

    #[test]
    fn repeats_until_count_reached() {
        let child = ConstString::from("c");
        let mut completed = 0;
        for _ in 0..2 {
            let actions = on_child_finished(&child, true, Some(3), &mut completed);
            assert_eq!(actions, std::vec![Action::StartChild(child.clone())]);
        }
        let actions = on_child_finished(&child, true, Some(3), &mut completed);
        assert_eq!(actions, std::vec![Action::Finish(true)]);
        assert_eq!(completed, 3);
    }

    #[test]
    fn forever_never_finishes_on_success() {
        let child = ConstString::from("c");
        let mut completed = 1000;
        let actions = on_child_finished(&child, true, None, &mut completed);
        assert_eq!(actions, std::vec![Action::StartChild(child)]);
    }
}
