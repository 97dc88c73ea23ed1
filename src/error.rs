//! Crate-wide error type: a thin pass-through over each module's own error.

use thiserror::Error;

/// Result type alias used throughout the crate's public API.
pub type Result<T> = core::result::Result<T, Error>;

/// `canopy_bt` error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Pass through from [`crate::blackboard::Error`].
    #[error("{0}")]
    Blackboard(#[from] crate::blackboard::Error),
    /// Pass through from [`crate::node::Error`].
    #[error("{0}")]
    Node(#[from] crate::node::Error),
    /// Pass through from [`crate::script::Error`].
    #[error("{0}")]
    Script(#[from] crate::script::Error),
    /// Pass through from [`crate::runtime::Error`].
    #[error("{0}")]
    Runtime(#[from] crate::runtime::Error),
    /// Pass through from [`crate::config::Error`].
    #[error("{0}")]
    Config(#[from] crate::config::Error),
    /// Pass through from [`crate::tree::Error`].
    #[error("{0}")]
    Tree(#[from] crate::tree::Error),
    /// Pass through from [`crate::registry::Error`].
    #[error("{0}")]
    Registry(#[from] crate::registry::Error),
    /// Pass through from [`crate::brain::Error`].
    #[error("{0}")]
    Brain(#[from] crate::brain::Error),
}
