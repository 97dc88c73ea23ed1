//! Delayed and periodic work, always re-entering through the owning stripe.
//!
//! A timer never runs its callback inline on the timer thread: it submits
//! the callback as a stripe job, so the callback observes the same
//! serialization guarantees as every other lifecycle call on that agent.
//! Every callback is expected to check the node's current state before
//! acting, since the node may have been aborted between the timer firing and
//! the job actually running on the stripe (a "misfire after abort").

use super::error::Error;
use super::worker_pool::{Job, Scheduler};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;

/// A handle to a scheduled timer. Dropping it does not cancel the timer —
/// call [`TimerHandle::stop`] explicitly, as a node does on `abort`/`finish`.
pub struct TimerHandle {
    cancelled: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// Cancel the timer. Idempotent: calling it twice, or after the timer has
    /// already fired, is a no-op.
    pub fn stop(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            self.task.abort();
        }
    }

    /// Whether the timer has been stopped (including by firing once, for a
    /// non-repeating timer).
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Schedules delayed (`after`) and periodic (`cron`) work onto a
/// [`Scheduler`]'s stripes.
pub struct TimerWheel<S: Scheduler + 'static> {
    scheduler: Arc<S>,
}

impl<S: Scheduler + 'static> TimerWheel<S> {
    /// Build a timer wheel that re-dispatches onto `scheduler`.
    #[must_use]
    pub fn new(scheduler: Arc<S>) -> Self {
        Self { scheduler }
    }

    /// Fire `job` once, after `delay`, on `stripe_id`'s lane.
    pub fn after(&self, delay: Duration, stripe_id: u64, job: Job) -> TimerHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        let scheduler = self.scheduler.clone();
        let flag = cancelled.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if flag.swap(true, Ordering::SeqCst) {
                return;
            }
            let _ = scheduler.submit(stripe_id, job);
        });
        TimerHandle { cancelled, task }
    }

    /// Fire `job` every `period`, on `stripe_id`'s lane, until stopped.
    ///
    /// `job` is `Clone` so each firing gets its own owned closure; this
    /// mirrors `after` rather than trying to run the same `FnOnce` twice.
    pub fn cron<F>(&self, period: Duration, stripe_id: u64, job: F) -> TimerHandle
    where
        F: Fn() + Send + Clone + 'static,
    {
        let cancelled = Arc::new(AtomicBool::new(false));
        let scheduler = self.scheduler.clone();
        let flag = cancelled.clone();
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await;
            loop {
                interval.tick().await;
                if flag.load(Ordering::SeqCst) {
                    break;
                }
                let job = job.clone();
                let _ = scheduler.submit(stripe_id, Box::new(job));
            }
        });
        TimerHandle { cancelled, task }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::worker_pool::WorkerPool;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test]
    async fn after_fires_once_on_the_owning_stripe() {
        let pool = Arc::new(WorkerPool::new());
        let wheel = TimerWheel::new(pool);
        let fired = Arc::new(AtomicUsize::new(0));
        let f = fired.clone();
        let _handle = wheel.after(Duration::from_millis(10), 3, Box::new(move || {
            f.fetch_add(1, Ordering::SeqCst);
        }));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stop_before_fire_suppresses_the_job() {
        let pool = Arc::new(WorkerPool::new());
        let wheel = TimerWheel::new(pool);
        let fired = Arc::new(AtomicUsize::new(0));
        let f = fired.clone();
        let handle = wheel.after(Duration::from_millis(30), 1, Box::new(move || {
            f.fetch_add(1, Ordering::SeqCst);
        }));
        handle.stop();
        handle.stop();
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
