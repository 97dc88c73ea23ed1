//! `BBEntries(And)` over two keys: both must hold before the guarded
//! `Action` is ever allowed to run.

use crate::common;
use canopy_bt::prelude::*;
use std::time::Duration;

const TREE: &str = r#"{
    "root": "root",
    "tag": "bb_entries_and",
    "nodes": {
        "root": { "id": "root", "name": "Root", "category": "composite", "children": ["gate"], "properties": { "once": true } },
        "gate": {
            "id": "gate", "name": "BBEntries", "category": "decorator", "children": ["action"],
            "properties": {
                "combinator": "And",
                "entries": [
                    { "key": "hp", "operator": "IsGt", "value": "0" },
                    { "key": "alert", "operator": "IsEqual", "value": "true" }
                ]
            }
        },
        "action": { "id": "action", "name": "Action", "category": "task" }
    }
}"#;

#[tokio::test]
async fn both_entries_must_hold_before_the_action_runs() {
    let registry = common::registry();
    let tree = common::load(&registry, TREE);
    let brain = common::brain(&registry, &tree, 1);
    brain.blackboard().set("hp", std::string::String::from("10")).expect("blackboard accepts the write");

    brain.run(false).expect("not already running");
    let first = common::await_finish(&brain, Duration::from_secs(1)).await;
    assert!(!first, "`alert` is unset, so the And combinator fails without ever starting the action");

    brain.blackboard().enable();
    brain.blackboard().set("alert", std::string::String::from("true")).expect("blackboard accepts the write");
    brain.run(false).expect("root dropped back to Inactive after its single run");
    let second = common::await_finish(&brain, Duration::from_secs(1)).await;
    assert!(second, "both entries now hold, so the action runs and the gate succeeds through it");
}
