//! Errors raised while compiling or running a node's scripts.

use crate::ConstString;

/// Failures from [`super::Engine`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `compile` was called twice for the same script id without an
    /// intervening removal.
    #[error("script '{0}' is already compiled")]
    AlreadyCompiled(ConstString),
    /// `run` was called for an id that was never compiled.
    #[error("script '{0}' was never compiled")]
    NotCompiled(ConstString),
    /// The underlying `tinyscript` engine rejected the source or failed at
    /// runtime.
    #[error("script '{id}' failed: {message}")]
    Engine {
        /// The script id that failed.
        id: ConstString,
        /// The underlying engine's error message, captured as text since
        /// `tinyscript`'s error type does not implement `std::error::Error`.
        message: String,
    },
}
