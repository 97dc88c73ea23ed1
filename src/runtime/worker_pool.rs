//! A striped worker pool: one serialized lane per agent.
//!
//! Each agent is pinned to exactly one stripe for its whole lifetime, so two
//! jobs submitted to the same stripe never run concurrently with each other —
//! this is what lets node lifecycle calls stay ordered without their own
//! locking. Jobs across different stripes run fully in parallel.

use super::error::Error;
use spin::RwLock;
use std::collections::BTreeMap;
use tokio::sync::mpsc;

/// A unit of work submitted to a stripe. Must not block or await — stripe
/// loops drain their channel on a shared tokio runtime, so a blocking job
/// would stall every other stripe sharing that worker thread.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Anything that can accept stripe-scoped work. Boxed as `Arc<dyn Scheduler>`
/// throughout so a caller that already runs its own stripe executor can
/// substitute it for [`WorkerPool`].
pub trait Scheduler: Send + Sync {
    /// Queue `job` to run on `stripe_id`'s lane, after everything already
    /// queued there.
    fn submit(&self, stripe_id: u64, job: Job) -> Result<(), Error>;

    /// Ensure `stripe_id` has a running lane, creating one if needed.
    fn ensure_stripe(&self, stripe_id: u64);
}

struct Stripe {
    sender: mpsc::UnboundedSender<Job>,
}

/// The reference [`Scheduler`]: one `tokio::spawn`'d loop task per stripe,
/// draining an unbounded `mpsc` channel. The loop's only suspension point is
/// the channel `recv` itself, so a job running inside it never yields
/// mid-execution.
pub struct WorkerPool {
    stripes: RwLock<BTreeMap<u64, Stripe>>,
}

impl WorkerPool {
    /// Create an empty pool. Stripes are created lazily on first use.
    #[must_use]
    pub fn new() -> Self {
        Self { stripes: RwLock::new(BTreeMap::new()) }
    }

    fn spawn_stripe(&self, stripe_id: u64) {
        let (tx, mut rx) = mpsc::unbounded_channel::<Job>();
        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                job();
            }
        });
        self.stripes.write().insert(stripe_id, Stripe { sender: tx });
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for WorkerPool {
    fn submit(&self, stripe_id: u64, job: Job) -> Result<(), Error> {
        if let Some(stripe) = self.stripes.read().get(&stripe_id) {
            return stripe.sender.send(job).map_err(|_| Error::StripeNotRunning(stripe_id));
        }
        self.ensure_stripe(stripe_id);
        self.stripes
            .read()
            .get(&stripe_id)
            .ok_or(Error::StripeNotRunning(stripe_id))?
            .sender
            .send(job)
            .map_err(|_| Error::StripeNotRunning(stripe_id))
    }

    fn ensure_stripe(&self, stripe_id: u64) {
        if self.stripes.read().contains_key(&stripe_id) {
            return;
        }
        let mut stripes = self.stripes.write();
        if !stripes.contains_key(&stripe_id) {
            drop(stripes);
            self.spawn_stripe(stripe_id);
        }
    }
}
