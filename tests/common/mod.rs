//! Harness shared by the end-to-end tests: load a tree from JSON, run a
//! brain against it on a real `WorkerPool`, and await the result.

use canopy_bt::prelude::*;
use std::sync::Arc;
use std::time::Duration;

/// Parse and register `json` under its own tag, returning the registry (kept
/// alive for the test's duration — `Subtree`/`DynamicSubtree` lookups need
/// it) and the loaded tree.
pub fn load(registry: &Arc<Registry>, json: &str) -> Arc<Tree> {
    registry.load_json(json).expect("tree config is valid")
}

/// A fresh registry with nothing loaded yet.
pub fn registry() -> Arc<Registry> {
    Arc::new(Registry::new())
}

/// A brain for `tree`, ticking on its own stripe, backed by the crate's
/// reference `WorkerPool`.
pub fn brain(registry: &Arc<Registry>, tree: &Arc<Tree>, stripe_id: u64) -> Arc<Brain<WorkerPool>> {
    let scheduler = Arc::new(WorkerPool::new());
    Brain::new(ConstString::from(format!("agent-{stripe_id}")), stripe_id, scheduler, Arc::clone(registry), Arc::clone(tree))
}

/// Wait for the main tree's root to finish, failing the test if it doesn't
/// within `timeout`.
pub async fn await_finish(brain: &Brain<WorkerPool>, timeout: Duration) -> bool {
    let mut rx = brain.finish_channel();
    tokio::time::timeout(timeout, async {
        loop {
            if let Some(succeeded) = *rx.borrow() {
                return succeeded;
            }
            rx.changed().await.expect("brain dropped its finish channel");
        }
    })
    .await
    .expect("tree did not finish within the deadline")
}

/// Give the stripe loop task a moment to drain whatever job a synchronous
/// call (`set`, an observer notification) just queued onto it — those are
/// dispatched onto the stripe rather than applied inline.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(20)).await;
}
