//! An `Action` that stays `InProgress` across several periodic re-ticks
//! before finishing: exactly one `OnStart`, one or more `OnUpdate`s carrying
//! a growing elapsed delta, then a single terminal result and no further
//! ticks after that.

use crate::common;
use canopy_bt::prelude::*;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

const TREE: &str = r#"{
    "root": "root",
    "tag": "action_lifecycle",
    "nodes": {
        "root": { "id": "root", "name": "Root", "category": "composite", "children": ["work"], "properties": { "once": true, "interval": 15000000 } },
        "work": {
            "id": "work", "name": "Action", "category": "task",
            "delegator": { "target": "worker", "method": "work" }
        }
    }
}"#;

#[tokio::test]
async fn stays_in_progress_across_re_ticks_then_finishes_once() {
    let registry = common::registry();
    let tree = common::load(&registry, TREE);
    let brain = common::brain(&registry, &tree, 1);

    let starts: &'static AtomicU32 = Box::leak(Box::new(AtomicU32::new(0)));
    let updates: &'static AtomicU32 = Box::leak(Box::new(AtomicU32::new(0)));
    let deltas: &'static Mutex<std::vec::Vec<Duration>> = Box::leak(Box::new(Mutex::new(std::vec::Vec::new())));
    brain.register_delegate("worker", |methods| {
        methods.full("work", move |event, delta| {
            match event {
                EventType::OnStart => {
                    starts.fetch_add(1, Ordering::SeqCst);
                    return Ok(TickResult::InProgress);
                }
                EventType::OnUpdate => {
                    let count = updates.fetch_add(1, Ordering::SeqCst) + 1;
                    deltas.lock().expect("not poisoned").push(delta);
                    if count >= 3 {
                        return Ok(TickResult::Succeeded);
                    }
                    return Ok(TickResult::InProgress);
                }
                EventType::OnAbort => {}
            }
            Ok(TickResult::Failed)
        });
    });

    brain.run(false).expect("not already running");
    let succeeded = common::await_finish(&brain, Duration::from_secs(2)).await;

    assert!(succeeded, "the action eventually reports success on its third update");
    assert_eq!(starts.load(Ordering::SeqCst), 1, "exactly one OnStart per run, however many re-ticks follow");
    assert_eq!(updates.load(Ordering::SeqCst), 3, "no update ticks arrive after the terminal result");
    assert!(deltas.lock().expect("not poisoned").iter().all(|d| *d > Duration::ZERO), "every re-tick carries a nonzero elapsed delta");
    assert!(!brain.running(), "a `once` root drops back to Inactive once its single run finishes");

    common::settle().await;
    assert_eq!(updates.load(Ordering::SeqCst), 3, "no stray timer keeps ticking a node that already finished");
}
