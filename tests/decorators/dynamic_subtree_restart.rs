//! `DynamicSubtree(mode=Restart)` mounted under a long-running `Action`,
//! then re-pointed at a different tag via `Brain::dynamic_decorate`: the
//! first mount is aborted and unmounted before the new one takes over.

use crate::common;
use canopy_bt::prelude::*;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

const MAIN: &str = r#"{
    "root": "root",
    "tag": "patrol_host",
    "nodes": {
        "root": { "id": "root", "name": "Root", "category": "composite", "children": ["dyn"], "properties": { "interval": 10000000 } },
        "dyn": { "id": "dyn", "name": "DynamicSubtree", "category": "decorator", "properties": { "tag": "leaf_a", "runMode": "Restart" } }
    }
}"#;

const LEAF_A: &str = r#"{
    "root": "root",
    "tag": "leaf_a",
    "nodes": {
        "root": { "id": "root", "name": "Action", "category": "task", "delegator": { "target": "worker", "method": "runA" } }
    }
}"#;

const LEAF_B: &str = r#"{
    "root": "root",
    "tag": "leaf_b",
    "nodes": {
        "root": { "id": "root", "name": "Action", "category": "task", "delegator": { "target": "worker", "method": "runB" } }
    }
}"#;

#[tokio::test]
async fn re_decorating_unmounts_the_old_leaf_and_mounts_the_new_one() {
    let registry = common::registry();
    let main = common::load(&registry, MAIN);
    common::load(&registry, LEAF_A);
    common::load(&registry, LEAF_B);
    let brain = common::brain(&registry, &main, 1);

    let a_starts: &'static AtomicU32 = Box::leak(Box::new(AtomicU32::new(0)));
    let a_aborts: &'static AtomicU32 = Box::leak(Box::new(AtomicU32::new(0)));
    let b_starts: &'static AtomicU32 = Box::leak(Box::new(AtomicU32::new(0)));
    brain.register_delegate("worker", |methods| {
        methods.full("runA", move |event, _delta| {
            match event {
                EventType::OnStart => {
                    a_starts.fetch_add(1, Ordering::SeqCst);
                }
                EventType::OnAbort => {
                    a_aborts.fetch_add(1, Ordering::SeqCst);
                }
                EventType::OnUpdate => {}
            }
            Ok(TickResult::InProgress)
        });
        methods.full("runB", move |event, _delta| {
            if matches!(event, EventType::OnStart) {
                b_starts.fetch_add(1, Ordering::SeqCst);
            }
            Ok(TickResult::InProgress)
        });
    });

    brain.run(false).expect("not already running");
    common::settle().await;
    assert_eq!(a_starts.load(Ordering::SeqCst), 1, "the configured tag mounts immediately on the first start");

    brain.dynamic_decorate("dyn", "leaf_b").expect("leaf_b is a registered tag");
    common::settle().await;

    assert_eq!(a_aborts.load(Ordering::SeqCst), 1, "restart mode aborts the previously mounted leaf");
    assert_eq!(b_starts.load(Ordering::SeqCst), 1, "the new tag gets mounted once the old one unmounts");
    assert!(brain.running(), "the host tree keeps running under the freshly mounted leaf");

    brain.abort();
}
