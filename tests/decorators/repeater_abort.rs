//! `Repeater(count=3)` over an `Action` that takes a short moment per
//! iteration: an external abort mid-second-iteration stops the repeater
//! without it ever reaching a third start.

use crate::common;
use canopy_bt::prelude::*;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

const TREE: &str = r#"{
    "root": "root",
    "tag": "repeater_abort",
    "nodes": {
        "root": { "id": "root", "name": "Root", "category": "composite", "children": ["rep"], "properties": { "once": true, "interval": 10000000 } },
        "rep": { "id": "rep", "name": "Repeater", "category": "decorator", "children": ["step"], "properties": { "count": 3 } },
        "step": {
            "id": "step", "name": "Action", "category": "task",
            "delegator": { "target": "worker", "method": "step" }
        }
    }
}"#;

#[tokio::test]
async fn an_abort_mid_iteration_stops_the_repeater_short_of_its_count() {
    let registry = common::registry();
    let tree = common::load(&registry, TREE);
    let brain = common::brain(&registry, &tree, 1);

    let starts: &'static AtomicU32 = Box::leak(Box::new(AtomicU32::new(0)));
    let started_at: &'static Mutex<Option<Instant>> = Box::leak(Box::new(Mutex::new(None)));
    brain.register_delegate("worker", |methods| {
        methods.full("step", move |event, _delta| {
            if matches!(event, EventType::OnStart) {
                starts.fetch_add(1, Ordering::SeqCst);
                *started_at.lock().expect("not poisoned") = Some(Instant::now());
            }
            if matches!(event, EventType::OnAbort) {
                return Ok(TickResult::Failed);
            }
            let elapsed = started_at.lock().expect("not poisoned").expect("OnStart ran first").elapsed();
            if elapsed >= Duration::from_millis(200) {
                Ok(TickResult::Succeeded)
            } else {
                Ok(TickResult::InProgress)
            }
        });
    });

    brain.run(false).expect("not already running");

    let brain_for_abort = std::sync::Arc::clone(&brain);
    tokio::spawn(async move {
        while starts.load(Ordering::SeqCst) < 2 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        tokio::time::sleep(Duration::from_millis(30)).await;
        brain_for_abort.abort();
    });

    let succeeded = common::await_finish(&brain, Duration::from_secs(2)).await;

    assert!(!succeeded, "aborting mid-child must finish the repeater (and the root) failed");
    assert_eq!(starts.load(Ordering::SeqCst), 2, "the third iteration must never start once the abort lands in the second");
}
