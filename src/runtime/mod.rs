//! The striped worker pool and timer wheel (spec §4.9).
//!
//! These are deliberately the most swappable pieces of the crate: a host
//! application that already runs its own per-agent scheduler implements
//! [`worker_pool::Scheduler`] directly and never touches [`WorkerPool`].

pub mod error;
pub mod timer_wheel;
pub mod worker_pool;

pub use error::Error;
pub use timer_wheel::{TimerHandle, TimerWheel};
pub use worker_pool::{Job, Scheduler, WorkerPool};
