//! Key-change observers, dispatched onto the watching agent's stripe.
//!
//! Observers are identified by an opaque incrementing handle, never by
//! pointer identity — a decorator that re-registers itself across ticks
//! (e.g. an `ObservingCondition` re-subscribing after `Finish`) must be able
//! to unregister its *previous* subscription without holding a live
//! reference back into the tree it watches.

use crate::ConstString;
use crate::runtime::{Job, Scheduler};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque registration handle returned by [`ObserverTable::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverId(u64);

type Callback = Box<dyn Fn() + Send + Sync>;

struct Subscription {
    id: ObserverId,
    callback: Arc<Callback>,
}

/// Per-blackboard table of key-change subscriptions.
#[derive(Default)]
pub struct ObserverTable {
    next_id: AtomicU64,
    by_key: BTreeMap<ConstString, Vec<Subscription>>,
}

impl ObserverTable {
    /// Build an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self { next_id: AtomicU64::new(0), by_key: BTreeMap::new() }
    }

    /// Register `callback` to run (deferred onto `stripe_id` via `scheduler`)
    /// whenever `key` changes.
    pub fn subscribe<F>(&mut self, key: ConstString, callback: F) -> ObserverId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = ObserverId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.by_key.entry(key).or_default().push(Subscription { id, callback: Arc::new(Box::new(callback)) });
        id
    }

    /// Remove a previously registered subscription. A no-op if `id` is
    /// unknown (already unsubscribed, or never existed).
    pub fn unsubscribe(&mut self, id: ObserverId) {
        self.by_key.retain(|_, subs| {
            subs.retain(|s| s.id != id);
            !subs.is_empty()
        });
    }

    /// Notify every subscriber of `key`, deferring each callback onto the
    /// agent's stripe rather than calling it inline — a write that happens
    /// mid-tick must not reenter node lifecycle code synchronously.
    pub fn notify(&self, key: &str, scheduler: &dyn Scheduler, stripe_id: u64) {
        let Some(subs) = self.by_key.get(key) else { return };
        for sub in subs {
            let callback = sub.callback.clone();
            let job: Job = Box::new(move || callback());
            let _ = scheduler.submit(stripe_id, job);
        }
    }
}
