//! Node lifecycle and delegate dispatch failures.

use crate::ConstString;
use crate::NodeState;

/// Failures raised by [`super::Node`] lifecycle methods and delegate
/// dispatch.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `start` was called on a node that was not `Inactive`.
    #[error("node '{node}' cannot start from state {from:?}")]
    InvalidStart {
        /// The offending node's id.
        node: ConstString,
        /// The state it was actually in.
        from: NodeState,
    },
    /// `abort` was called on a node that was not `Active`.
    #[error("node '{node}' cannot abort from state {from:?}")]
    InvalidAbort {
        /// The offending node's id.
        node: ConstString,
        /// The state it was actually in.
        from: NodeState,
    },
    /// `finish` was called on a node that was already `Inactive`.
    #[error("node '{0}' cannot finish: already inactive")]
    InvalidFinish(ConstString),
    /// A delegate target named in config was never registered with the
    /// owning `Brain`.
    #[error("delegate target '{0}' is not registered")]
    UnknownTarget(ConstString),
    /// A delegate method named in config was never registered for its
    /// target.
    #[error("delegate target '{target}' has no method '{method}'")]
    UnknownMethod {
        /// The target that was found.
        target: ConstString,
        /// The method name that was not.
        method: ConstString,
    },
    /// A registered delegate method itself reported failure.
    #[error("delegate '{target}.{method}' failed: {message}")]
    DelegateFailed {
        /// The target the failing method belongs to.
        target: ConstString,
        /// The method that failed.
        method: ConstString,
        /// The failure message the method reported.
        message: String,
    },
    /// A node referenced a script id that was never compiled for its tree.
    #[error(transparent)]
    Script(#[from] crate::script::Error),
    /// A blackboard operation failed.
    #[error(transparent)]
    Blackboard(#[from] crate::blackboard::Error),
}
