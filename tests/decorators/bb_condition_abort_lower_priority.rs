//! `Selector{BBCondition(Both, key="ready")/Action, Wait(forever)}`: with
//! `ready` unset the condition fails immediately and the selector falls
//! through to the never-finishing `Wait`; flipping `ready` true aborts the
//! lower-priority `Wait` branch and lets the selector re-enter the
//! condition, which now lets its `Action` run and succeed.

use crate::common;
use canopy_bt::prelude::*;
use std::time::Duration;

const TREE: &str = r#"{
    "root": "root",
    "tag": "bb_condition_abort_lower_priority",
    "nodes": {
        "root": { "id": "root", "name": "Root", "category": "composite", "children": ["sel"], "properties": { "once": true, "interval": 10000000 } },
        "sel": { "id": "sel", "name": "Selector", "category": "composite", "children": ["gate", "wait"] },
        "gate": {
            "id": "gate", "name": "BBCondition", "category": "decorator", "children": ["action"],
            "properties": { "key": "ready", "operator": "IsEqual", "value": "true", "abortMode": "Both" }
        },
        "action": { "id": "action", "name": "Action", "category": "task" },
        "wait": { "id": "wait", "name": "Wait", "category": "task", "properties": { "forever": true } }
    }
}"#;

#[tokio::test]
async fn flipping_the_key_aborts_wait_and_lets_the_gate_succeed() {
    let registry = common::registry();
    let tree = common::load(&registry, TREE);
    let brain = common::brain(&registry, &tree, 1);

    brain.run(false).expect("not already running");
    common::settle().await;

    assert!(brain.running(), "with `ready` unset, the gate fails closed and Wait(forever) keeps the tree running");

    brain.blackboard().set("ready", std::string::String::from("true")).expect("blackboard accepts the write");

    let succeeded = common::await_finish(&brain, Duration::from_secs(2)).await;

    assert!(succeeded, "the gate re-opens, runs its Action, and the selector succeeds through it");
    assert!(!brain.running(), "a `once` root drops back to Inactive once its single run finishes");
}
