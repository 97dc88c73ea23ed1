//! `Root/Parallel(One,All){Action[delegate=win], Wait(long)}`: the first
//! child to finish decides the parallel's result, and the loser is aborted
//! rather than left running to its own natural end.

use crate::common;
use canopy_bt::prelude::*;
use std::sync::Mutex;
use std::time::{Duration, Instant};

const TREE: &str = r#"{
    "root": "root",
    "tag": "parallel_race",
    "nodes": {
        "root": { "id": "root", "name": "Root", "category": "composite", "children": ["par"], "properties": { "once": true, "interval": 10000000 } },
        "par": { "id": "par", "name": "Parallel", "category": "composite", "children": ["win", "wait"], "properties": { "successPolicy": "One", "failurePolicy": "All" } },
        "win": {
            "id": "win", "name": "Action", "category": "task",
            "delegator": { "target": "worker", "method": "win" }
        },
        "wait": { "id": "wait", "name": "Wait", "category": "task", "properties": { "waitTime": 2000000000 } }
    }
}"#;

#[tokio::test]
async fn the_faster_child_wins_and_the_slower_one_is_aborted() {
    let registry = common::registry();
    let tree = common::load(&registry, TREE);
    let brain = common::brain(&registry, &tree, 1);

    let started: &'static Mutex<Option<Instant>> = Box::leak(Box::new(Mutex::new(None)));
    brain.register_delegate("worker", |methods| {
        methods.full("win", move |event, _delta| {
            let mut guard = started.lock().expect("not poisoned");
            let start = *guard.get_or_insert_with(Instant::now);
            if matches!(event, EventType::OnAbort) {
                return Ok(TickResult::Failed);
            }
            if start.elapsed() >= Duration::from_millis(60) {
                Ok(TickResult::Succeeded)
            } else {
                Ok(TickResult::InProgress)
            }
        });
    });

    let start = Instant::now();
    brain.run(false).expect("not already running");
    let succeeded = common::await_finish(&brain, Duration::from_secs(2)).await;
    let elapsed = start.elapsed();

    assert!(succeeded, "successPolicy One: the parallel succeeds once any child succeeds");
    assert!(elapsed < Duration::from_millis(500), "the parallel must finish once `win` succeeds, long before Wait's own 2s timer (took {elapsed:?})");
    assert!(!brain.running(), "a `once` root drops back to Inactive once its single run finishes");
}
