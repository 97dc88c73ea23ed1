//! `Cooldown(window, startAfterDecorated=true, failOnCoolDown=true)`: the
//! first run opens the window once its child finishes; a second run that
//! lands inside the window is refused without ever touching the child; a
//! third run after the window elapses runs the child again.

use crate::common;
use canopy_bt::prelude::*;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

const WINDOW_NANOS: u64 = 120_000_000; // 120ms, scaled down for test speed

const TREE: &str = r#"{
    "root": "root",
    "tag": "cooldown_timing",
    "nodes": {
        "root": { "id": "root", "name": "Root", "category": "composite", "children": ["cool"], "properties": { "once": true } },
        "cool": {
            "id": "cool", "name": "Cooldown", "category": "decorator", "children": ["tick"],
            "properties": { "window": 120000000, "startAfterDecorated": true, "failOnCoolDown": true }
        },
        "tick": {
            "id": "tick", "name": "Action", "category": "task",
            "delegator": { "target": "worker", "method": "tick" }
        }
    }
}"#;

#[tokio::test]
async fn refuses_mid_window_and_runs_again_once_it_elapses() {
    let registry = common::registry();
    let tree = common::load(&registry, TREE);
    let brain = common::brain(&registry, &tree, 1);

    let runs: &'static AtomicU32 = Box::leak(Box::new(AtomicU32::new(0)));
    brain.register_delegate("worker", |methods| {
        methods.simple_with_result("tick", move || {
            runs.fetch_add(1, Ordering::SeqCst);
            TickResult::Succeeded
        });
    });

    brain.run(false).expect("not already running");
    let first = common::await_finish(&brain, Duration::from_secs(1)).await;
    assert!(first, "the first run has nothing cooling down yet, so the child runs and succeeds");
    assert_eq!(runs.load(Ordering::SeqCst), 1);

    brain.run(false).expect("root dropped back to Inactive after its single run");
    let second = common::await_finish(&brain, Duration::from_secs(1)).await;
    assert!(!second, "a run that lands inside the window is refused outright");
    assert_eq!(runs.load(Ordering::SeqCst), 1, "the child must not run while cooling down");

    tokio::time::sleep(Duration::from_nanos(WINDOW_NANOS) + Duration::from_millis(40)).await;

    brain.run(false).expect("root dropped back to Inactive after its single run");
    let third = common::await_finish(&brain, Duration::from_secs(1)).await;
    assert!(third, "once the window has elapsed the child is allowed to run again");
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}
