//! `Root(once=true)/Sequence(Wait, Action)`: the sequence only reaches the
//! action once the wait elapses, and the sequence's own result is whatever
//! the action finishes with.

use crate::common;
use canopy_bt::prelude::*;
use std::time::{Duration, Instant};

const TREE: &str = r#"{
    "root": "root",
    "tag": "sequence_wait_action",
    "nodes": {
        "root": { "id": "root", "name": "Root", "category": "composite", "children": ["seq"], "properties": { "once": true } },
        "seq": { "id": "seq", "name": "Sequence", "category": "composite", "children": ["wait", "action"] },
        "wait": { "id": "wait", "name": "Wait", "category": "task", "properties": { "waitTime": 50000000 } },
        "action": {
            "id": "action", "name": "Action", "category": "task",
            "delegator": { "target": "worker", "method": "fail" }
        }
    }
}"#;

#[tokio::test]
async fn finishes_failed_only_after_the_wait_elapses() {
    let registry = common::registry();
    let tree = common::load(&registry, TREE);
    let brain = common::brain(&registry, &tree, 1);
    brain.register_delegate("worker", |methods| {
        methods.simple_with_result("fail", || TickResult::Failed);
    });

    let start = Instant::now();
    brain.run(false).expect("not already running");
    let succeeded = common::await_finish(&brain, Duration::from_secs(2)).await;

    assert!(!succeeded, "the action fails, so the sequence (and the once-root) fails too");
    assert!(start.elapsed() >= Duration::from_millis(45), "the action must not run before the wait finishes");
    assert!(!brain.running(), "a `once` root drops back to Inactive once its single run finishes");
}
