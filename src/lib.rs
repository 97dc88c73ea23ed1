// region:      --- modules
pub mod blackboard;
pub mod brain;
pub mod class_loader;
pub mod composite;
pub mod config;
pub mod decorator;
mod error;
pub mod node;
pub mod prelude;
pub mod registry;
pub mod root;
pub mod runtime;
pub mod script;
pub mod task;
pub mod tree;
pub mod util;

pub use error::Error;
// endregion:   --- modules

use std::sync::Arc;
use std::time::Duration;


// region:      --- ConstString
/// A reference-counted immutable string, used throughout for node ids, names
/// and class/target identifiers that get cloned into closures, blackboard
/// keys and tracing spans far more often than they get mutated.
pub type ConstString = Arc<str>;
// endregion:   --- ConstString

// region:      --- TickResult
/// Outcome of a single node lifecycle step.
///
/// `InProgress` means the node is still `Active` and expects to be ticked,
/// aborted, or to finish on its own later (e.g. when a delegate's background
/// work completes and calls back through the owning stripe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickResult {
    /// The node finished unsuccessfully.
    Failed,
    /// The node finished successfully.
    Succeeded,
    /// The node is still active.
    InProgress,
}

impl TickResult {
    /// `true` for [`TickResult::Succeeded`] or [`TickResult::Failed`] — i.e. the node has
    /// finished and called (or is about to call) `finish` on its parent.
    #[must_use]
    pub const fn is_finished(self) -> bool {
        !matches!(self, Self::InProgress)
    }

    /// The boolean success flag passed to `Node::finish`, if this result is finished.
    #[must_use]
    pub const fn succeeded(self) -> Option<bool> {
        match self {
            Self::Succeeded => Some(true),
            Self::Failed => Some(false),
            Self::InProgress => None,
        }
    }
}
// endregion:   --- TickResult

// region:      --- NodeState
/// Lifecycle state of a node, as tracked in its [`NodeMemory`](node::NodeMemory).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeState {
    /// Not running. The initial and final state.
    #[default]
    Inactive,
    /// Running normally.
    Active,
    /// An abort has been requested and is propagating to children; the node
    /// is still considered running until it calls `finish`.
    Aborting,
}
// endregion:   --- NodeState

// region:      --- EventType
/// Reason a delegate is being invoked, mirrored from the Go source's
/// `handle.EventType` (`OnStart` / `OnUpdate` / `OnAbort`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// The owning node just transitioned Inactive -> Active.
    OnStart,
    /// The owning node is being ticked while already Active.
    OnUpdate,
    /// The owning node just transitioned Active -> Aborting.
    OnAbort,
}
// endregion:   --- EventType

// region:      --- NodeCategory
/// Broad structural role of a node, used for dispatch and for diagnostics
/// (`tracing` fields, error messages).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeCategory {
    /// Has one or more children and decides which of them run.
    Composite,
    /// Has exactly one child and wraps or filters its result.
    Decorator,
    /// A leaf: no children, drives external state via a delegate.
    Task,
}
// endregion:   --- NodeCategory

/// A tick delta, threaded through delegate calls exactly as the Go source's
/// `time.Duration` argument is.
pub type Delta = Duration;
