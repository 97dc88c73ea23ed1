//! `DynamicSubtree`: mounts a fresh clone of a named tree at `start`, and
//! reacts per `run_mode` when re-triggered while a previous mount is still
//! running.

use super::DynamicRunMode;
use crate::node::Action;
use crate::ConstString;

/// Start: if nothing is mounted, mount a fresh clone immediately. If a
/// previous instance is still mounted and running, react per `run_mode`.
pub fn on_start(tree_name: &ConstString, run_mode: DynamicRunMode, mounted: Option<&ConstString>) -> std::vec::Vec<Action> {
    match mounted {
        None => std::vec![Action::MountDynamicSubtree(tree_name.clone())],
        Some(child) => match run_mode {
            DynamicRunMode::Restart => std::vec![Action::AbortChild(child.clone())],
            DynamicRunMode::Continue => std::vec::Vec::new(),
            DynamicRunMode::Abort => std::vec![Action::AbortChild(child.clone()), Action::Finish(false)],
        },
    }
}

/// The mounted instance finished (on its own, or because `Restart`/`Abort`
/// aborted it): unmount it, and for `Restart` immediately mount a fresh one
/// instead of finishing.
pub fn on_child_finished(
    tree_name: &ConstString,
    run_mode: DynamicRunMode,
    restarting: bool,
    succeeded: bool,
) -> std::vec::Vec<Action> {
    if restarting && run_mode == DynamicRunMode::Restart {
        return std::vec![Action::UnmountDynamicSubtree, Action::MountDynamicSubtree(tree_name.clone())];
    }
    std::vec![Action::UnmountDynamicSubtree, Action::Finish(succeeded)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_start_mounts_immediately() {
        let name = ConstString::from("patrol");
        let actions = on_start(&name, DynamicRunMode::Restart, None);
        assert_eq!(actions, std::vec![Action::MountDynamicSubtree(name)]);
    }

    #[test]
    fn continue_mode_leaves_a_running_instance_alone() {
        let name = ConstString::from("patrol");
        let child = ConstString::from("mounted-root");
        let actions = on_start(&name, DynamicRunMode::Continue, Some(&child));
        assert!(actions.is_empty());
    }

    #[test]
    fn restart_mode_remounts_after_the_abort_settles() {
        let name = ConstString::from("patrol");
        let actions = on_child_finished(&name, DynamicRunMode::Restart, true, false);
        assert_eq!(actions, std::vec![Action::UnmountDynamicSubtree, Action::MountDynamicSubtree(name)]);
    }
}
