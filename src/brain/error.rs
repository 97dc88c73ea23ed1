//! Failures raised while running or mounting trees through a [`super::Brain`].

use crate::ConstString;

/// Failures a [`super::Brain`] surfaces to its caller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `run` was called while the main tree was already active and `force`
    /// was not set.
    #[error("brain is already running")]
    AlreadyRunning,
    /// A container node named in `dynamic_decorate`, or a node id passed to
    /// an internal operation, has no entry in any tree this brain owns.
    #[error("unknown node '{0}'")]
    UnknownNode(ConstString),
    /// `dynamic_decorate`/a `DynamicSubtree`'s configured tree name is not
    /// registered.
    #[error("tree '{0}' is not registered")]
    UnknownTree(ConstString),
    /// A node lifecycle call failed.
    #[error(transparent)]
    Node(#[from] crate::node::Error),
    /// A blackboard operation failed.
    #[error(transparent)]
    Blackboard(#[from] crate::blackboard::Error),
}
