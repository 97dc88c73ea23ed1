//! Errors from the worker pool and timer wheel.

/// Failures from [`super::WorkerPool`]/[`super::TimerWheel`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `submit` targeted a stripe that was never registered, or whose loop
    /// task has already shut down.
    #[error("stripe {0} is not running")]
    StripeNotRunning(u64),
    /// The pool's stripe registry is being torn down; no further work can be
    /// submitted.
    #[error("worker pool is shutting down")]
    ShuttingDown,
}
