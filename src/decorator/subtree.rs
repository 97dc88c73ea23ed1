//! Static `Subtree`: a container around a tree linked in at load time
//! (spec §4.7). Once linked, behaves exactly like a pass-through decorator
//! around the linked tree's root.

use crate::node::Action;
use crate::ConstString;

/// Start the linked root.
#[must_use]
pub fn on_start(root: &ConstString) -> std::vec::Vec<Action> {
    std::vec![Action::StartChild(root.clone())]
}

/// Pass the linked root's result straight through.
#[must_use]
pub fn on_child_finished(succeeded: bool) -> std::vec::Vec<Action> {
    std::vec![Action::Finish(succeeded)]
}
