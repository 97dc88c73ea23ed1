//! Blackboard failure modes.

use crate::ConstString;

/// Failures from [`super::Blackboard`] operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `get`/`get_as` found no value under the given key, in this board or
    /// any ancestor.
    #[error("key '{0}' is not set")]
    KeyNotFound(ConstString),
    /// The stored value's type does not match the type requested by the
    /// caller.
    #[error("key '{key}' holds a value of a different type")]
    TypeMismatch {
        /// The key whose value could not be downcast.
        key: ConstString,
    },
    /// The board (or the node it scopes) is disabled; reads and writes are
    /// rejected until it is re-enabled.
    #[error("blackboard is disabled")]
    Disabled,
    /// The underlying typed store reported a failure.
    #[error(transparent)]
    Store(#[from] databoard::Error),
}
