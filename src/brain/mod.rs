//! The per-agent orchestrator (spec §3.5, §4.4-§4.9 "the Brain"): owns one
//! agent's blackboard, delegate table and scheduling primitives, and drives
//! node lifecycle dispatch across whichever trees — the main tree plus any
//! mounted dynamic/static-subtree clones — it is currently running.
//!
//! Grounded in `brain.go`'s `Brain`/`IBrain` split (a thin façade over a
//! blackboard and a delegate map), generalized to dispatch across the full
//! node-class catalog built out in `composite`/`decorator`/`task`. Node
//! definitions (`Tree`) are immutable and `Arc`-shared across every agent
//! running them; everything in here is the per-agent mutable half.

pub mod error;

pub use error::Error;

use crate::blackboard::{Blackboard, Extra};
use crate::composite;
use crate::decorator;
use crate::node::{Action, DelegateTable, MethodTable, Node, NodeCtx, NodeKind};
use crate::registry::Registry;
use crate::runtime::{Scheduler, TimerWheel};
use crate::task;
use crate::tree::Tree;
use crate::{ConstString, NodeState};
use spin::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::watch;

/// The per-agent orchestrator. Generic over the scheduler implementation so
/// a host can substitute its own stripe executor for [`crate::runtime::WorkerPool`].
pub struct Brain<S: Scheduler + 'static> {
    id: ConstString,
    blackboard: Arc<Blackboard>,
    delegates: RwLock<DelegateTable>,
    timers: TimerWheel<S>,
    registry: Arc<Registry>,
    main_tree: RwLock<Arc<Tree>>,
    /// Every node id currently reachable from the main tree's root, spanning
    /// mounted dynamic/static-subtree clones, mapped to the `Tree` that owns
    /// its definition.
    owner: RwLock<BTreeMap<ConstString, Arc<Tree>>>,
    default_target: Option<ConstString>,
    action_success_if_not_delegate: bool,
    running: AtomicBool,
    finish_tx: watch::Sender<Option<bool>>,
    finish_rx: watch::Receiver<Option<bool>>,
    self_weak: RwLock<Weak<Self>>,
}

impl<S: Scheduler + 'static> Brain<S> {
    /// Build a brain for `id`, ticking on `stripe_id`, ready to run
    /// `main_tree`. A fresh, empty blackboard and delegate table are
    /// created; register delegates with [`Brain::register_delegate`] before
    /// the first [`Brain::run`].
    #[must_use]
    pub fn new(id: ConstString, stripe_id: u64, scheduler: Arc<S>, registry: Arc<Registry>, main_tree: Arc<Tree>) -> Arc<Self> {
        let dyn_scheduler: Arc<dyn Scheduler> = scheduler.clone();
        let blackboard = Arc::new(Blackboard::new(id.clone(), stripe_id, dyn_scheduler));
        let timers = TimerWheel::new(scheduler);
        let default_target = main_tree.node(&main_tree.root).and_then(|n| n.delegate_target.clone());
        let owner = main_tree.node_ids().map(|node_id| (node_id.clone(), Arc::clone(&main_tree))).collect();
        let (finish_tx, finish_rx) = watch::channel(None);
        Arc::new_cyclic(|weak| Self {
            id,
            blackboard,
            delegates: RwLock::new(DelegateTable::new()),
            timers,
            registry,
            main_tree: RwLock::new(main_tree),
            owner: RwLock::new(owner),
            default_target,
            action_success_if_not_delegate: true,
            running: AtomicBool::new(false),
            finish_tx,
            finish_rx,
            self_weak: RwLock::new(weak.clone()),
        })
    }

    /// This agent's id.
    #[must_use]
    pub fn id(&self) -> &ConstString {
        &self.id
    }

    /// This agent's blackboard.
    #[must_use]
    pub fn blackboard(&self) -> &Arc<Blackboard> {
        &self.blackboard
    }

    /// The tree currently configured as this brain's main tree.
    #[must_use]
    pub fn running_tree(&self) -> Arc<Tree> {
        Arc::clone(&self.main_tree.read())
    }

    /// Whether the main tree's root is currently active.
    #[must_use]
    pub fn running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Register (or replace) a delegate target's method table.
    pub fn register_delegate(&self, target: impl Into<ConstString>, configure: impl FnOnce(&mut MethodTable)) {
        let mut table = self.delegates.write();
        configure(table.register_target(target));
    }

    /// Whether `target` currently has a registered delegate.
    #[must_use]
    pub fn has_delegate(&self, target: &str) -> bool {
        self.delegates.read().has_target(target)
    }

    /// A `watch` channel that reports `Some(succeeded)` each time the main
    /// tree's root finishes a run (spec §6 "finish_channel").
    #[must_use]
    pub fn finish_channel(&self) -> watch::Receiver<Option<bool>> {
        self.finish_rx.clone()
    }

    /// Start the main tree's root. A no-op (returns
    /// [`Error::AlreadyRunning`]) if already running, unless `force` is set,
    /// in which case the current run is aborted first.
    pub fn run(&self, force: bool) -> Result<(), Error> {
        if self.running.load(Ordering::SeqCst) {
            if !force {
                return Err(Error::AlreadyRunning);
            }
            self.abort();
        }
        self.running.store(true, Ordering::SeqCst);
        self.blackboard.enable();
        let root = self.running_tree().root.clone();
        self.start_node(&root);
        Ok(())
    }

    /// Abort the main tree's root, if active.
    pub fn abort(&self) {
        let root = self.running_tree().root.clone();
        self.abort_node(&root);
    }

    /// Mount `subtree_tag` as `container`'s dynamic child (spec §6
    /// "dynamic_decorate", spec §4.3.9). If `container` is itself a
    /// `DynamicSubtree`, this goes through the exact same `run_mode`
    /// decision its own self-triggered `start` uses; for any other
    /// container kind, an existing mount is aborted and replaced outright.
    pub fn dynamic_decorate(&self, container: &str, subtree_tag: &str) -> Result<(), Error> {
        let container: ConstString = container.into();
        let Some(tree) = self.resolve_tree(&container) else { return Err(Error::UnknownNode(container)) };
        if self.registry.get(subtree_tag).is_none() {
            return Err(Error::UnknownTree(subtree_tag.into()));
        }
        let tree_name: ConstString = subtree_tag.into();
        match tree.node(&container).map(|n| &n.kind) {
            Some(NodeKind::DynamicSubtree(cfg)) => {
                let actions = self.begin_dynamic_subtree(&container, &tree_name, cfg.run_mode);
                self.apply_actions(&container, actions);
            }
            _ => {
                if let Some(old_root) = self.blackboard.with_node_memory(&container, |m| m.dynamic_child.clone()) {
                    self.abort_node(&old_root);
                }
                if self.mount_dynamic_subtree(&container, &tree_name).is_none() {
                    return Err(Error::UnknownTree(tree_name));
                }
            }
        }
        Ok(())
    }

    // region: --- tree/node lookup helpers

    fn resolve_tree(&self, node_id: &ConstString) -> Option<Arc<Tree>> {
        self.owner.read().get(node_id).cloned()
    }

    fn with_ctx<R>(&self, f: impl FnOnce(&NodeCtx<'_>) -> R) -> R {
        let delegates = self.delegates.read();
        let ctx = NodeCtx {
            blackboard: &self.blackboard,
            script: self.registry.script_engine().as_ref(),
            delegates: &delegates,
            default_target: self.default_target.as_ref(),
            action_success_if_not_delegate: self.action_success_if_not_delegate,
        };
        f(&ctx)
    }

    /// The direct child of `ancestor` that is (or contains) `descendant`,
    /// walked via each node's resolved (mount-aware) parent.
    fn branch_under(&self, ancestor: &ConstString, descendant: &ConstString) -> Option<ConstString> {
        let mut current = descendant.clone();
        loop {
            let tree = self.resolve_tree(&current)?;
            let node = tree.node(&current)?;
            let parent = node.parent_for(&self.blackboard)?;
            if &parent == ancestor {
                return Some(current);
            }
            current = parent;
        }
    }

    // endregion: --- tree/node lookup helpers

    // region: --- lifecycle entry points

    fn start_node(&self, node_id: &ConstString) {
        let Some(tree) = self.resolve_tree(node_id) else {
            tracing::error!(%node_id, "start requested for a node outside any owned tree");
            return;
        };
        let Some(node) = tree.node(node_id) else { return };
        let is_inactive = self.blackboard.with_node_memory(node_id, |m| m.state == NodeState::Inactive);
        if !is_inactive {
            tracing::error!(%node_id, "start requested for a node that is not Inactive");
            return;
        }
        self.blackboard.with_node_memory(node_id, |m| m.state = NodeState::Active);
        let actions = self.start_actions(node);
        self.apply_actions(node_id, actions);
    }

    fn abort_node(&self, node_id: &ConstString) {
        let Some(tree) = self.resolve_tree(node_id) else { return };
        let Some(node) = tree.node(node_id) else { return };
        let is_active = self.blackboard.with_node_memory(node_id, |m| m.state == NodeState::Active);
        if !is_active {
            return;
        }
        self.blackboard.with_node_memory(node_id, |m| m.state = NodeState::Aborting);
        let actions = self.abort_actions(node);
        self.apply_actions(node_id, actions);
    }

    fn finish_node(&self, node_id: &ConstString, succeeded: bool) {
        let Some(tree) = self.resolve_tree(node_id) else { return };
        let is_inactive = self.blackboard.with_node_memory(node_id, |m| m.state == NodeState::Inactive);
        if is_inactive {
            tracing::error!(%node_id, "finish requested for a node that is already Inactive");
            return;
        }
        self.blackboard.with_node_memory(node_id, |m| m.state = NodeState::Inactive);
        self.sweep_inactive_observers(&tree, node_id);
        let Some(node) = tree.node(node_id) else { return };
        match node.parent_for(&self.blackboard) {
            Some(parent_id) => self.child_finished(&parent_id, node_id, succeeded),
            None => {
                self.running.store(false, Ordering::SeqCst);
                self.blackboard.disable();
                let _ = self.finish_tx.send(Some(succeeded));
            }
        }
    }

    fn child_finished(&self, parent_id: &ConstString, child_id: &ConstString, succeeded: bool) {
        let Some(tree) = self.resolve_tree(parent_id) else { return };
        let Some(parent) = tree.node(parent_id) else { return };
        let actions = self.child_finished_actions(parent, child_id, succeeded);
        self.apply_actions(parent_id, actions);
    }

    fn on_timer_fired(&self, node_id: &ConstString) {
        let Some(tree) = self.resolve_tree(node_id) else { return };
        let Some(node) = tree.node(node_id) else { return };
        let actions = self.timer_actions(node);
        self.apply_actions(node_id, actions);
    }

    fn on_observer_fired(&self, node_id: &ConstString) {
        let Some(tree) = self.resolve_tree(node_id) else { return };
        let Some(node) = tree.node(node_id) else { return };
        let actions = self.observer_actions(node);
        self.apply_actions(node_id, actions);
    }

    // endregion: --- lifecycle entry points

    // region: --- action application

    fn apply_actions(&self, node_id: &ConstString, actions: std::vec::Vec<Action>) {
        for action in actions {
            match action {
                Action::StartChild(child) => self.start_node(&child),
                Action::AbortChild(child) => self.abort_node(&child),
                Action::Finish(succeeded) => self.finish_node(node_id, succeeded),
                Action::ScheduleTimer(delay) => self.schedule_timer(node_id, delay),
                Action::StopTimer => self.stop_timer(node_id),
                Action::StartObserving => self.start_observing(node_id),
                Action::StopObserving => self.stop_observing(node_id),
                Action::AbortLowerPriorityThan(below) => self.abort_lower_priority_than(&below),
                Action::MountDynamicSubtree(tree_name) => {
                    if self.mount_dynamic_subtree(node_id, &tree_name).is_none() {
                        tracing::error!(%tree_name, "dynamic subtree mount failed: tree not registered");
                        self.finish_node(node_id, false);
                    }
                }
                Action::UnmountDynamicSubtree => self.unmount_dynamic_subtree(node_id),
            }
        }
    }

    fn schedule_timer(&self, node_id: &ConstString, delay: std::time::Duration) {
        let stripe_id = self.blackboard.stripe_id();
        let callback_id = node_id.clone();
        let weak = self.self_weak.read().clone();
        let handle = self.timers.after(
            delay,
            stripe_id,
            std::boxed::Box::new(move || {
                if let Some(brain) = weak.upgrade() {
                    brain.on_timer_fired(&callback_id);
                }
            }),
        );
        self.blackboard.with_node_memory(node_id, |m| {
            if let Some(old) = m.timer.replace(handle) {
                old.stop();
            }
        });
    }

    fn stop_timer(&self, node_id: &ConstString) {
        self.blackboard.with_node_memory(node_id, |m| {
            if let Some(handle) = m.timer.take() {
                handle.stop();
            }
        });
    }

    fn watched_keys(&self, node: &Node) -> std::vec::Vec<ConstString> {
        match &node.kind {
            NodeKind::BbCondition(cfg) => std::vec![cfg.key.clone()],
            NodeKind::BbEntries(cfg) => cfg.entries.iter().map(|e| e.key.clone()).collect(),
            NodeKind::WaitCondition(cfg) => std::vec![cfg.condition.key.clone()],
            _ => std::vec::Vec::new(),
        }
    }

    fn start_observing(&self, node_id: &ConstString) {
        let Some(tree) = self.resolve_tree(node_id) else { return };
        let Some(node) = tree.node(node_id) else { return };
        let keys = self.watched_keys(node);
        let mut ids = std::vec::Vec::with_capacity(keys.len());
        for key in keys {
            let weak = self.self_weak.read().clone();
            let callback_id = node_id.clone();
            ids.push(self.blackboard.observe(key, move || {
                if let Some(brain) = weak.upgrade() {
                    brain.on_observer_fired(&callback_id);
                }
            }));
        }
        self.blackboard.with_node_memory(node_id, |m| {
            m.observing = true;
            m.observer_ids = ids;
        });
    }

    fn stop_observing(&self, node_id: &ConstString) {
        let ids = self.blackboard.with_node_memory(node_id, |m| {
            m.observing = false;
            std::mem::take(&mut m.observer_ids)
        });
        for id in ids {
            self.blackboard.unobserve(id);
        }
    }

    /// Stop observing for every descendant of `node_id` still marked
    /// `observing` while `Inactive` (a `LowerPriority` watcher sitting in a
    /// branch whose ancestor just finished or was aborted).
    fn sweep_inactive_observers(&self, tree: &Tree, node_id: &ConstString) {
        let Some(node) = tree.node(node_id) else { return };
        for child in node.children.clone() {
            let (state, observing) = self.blackboard.with_node_memory(&child, |m| (m.state, m.observing));
            if observing && state == NodeState::Inactive {
                let _ = decorator::observing_condition::on_composite_ancestor_finished();
                self.stop_observing(&child);
            }
            if let Some(child_tree) = self.resolve_tree(&child) {
                self.sweep_inactive_observers(&child_tree, &child);
            }
        }
    }

    fn abort_lower_priority_than(&self, below: &ConstString) {
        // Walk up from `below` to the nearest composite ancestor, then abort
        // every other branch still running under it.
        let mut current = below.clone();
        let ancestor = loop {
            let Some(tree) = self.resolve_tree(&current) else { return };
            let Some(node) = tree.node(&current) else { return };
            let Some(parent_id) = node.parent_for(&self.blackboard) else { return };
            let Some(parent_tree) = self.resolve_tree(&parent_id) else { return };
            let Some(parent) = parent_tree.node(&parent_id) else { return };
            if matches!(parent.category, crate::NodeCategory::Composite) {
                break parent_id;
            }
            current = parent_id;
        };
        let Some(spared) = self.branch_under(&ancestor, below) else { return };
        let Some(tree) = self.resolve_tree(&ancestor) else { return };
        let Some(node) = tree.node(&ancestor) else { return };

        if matches!(node.kind, NodeKind::Parallel(_)) {
            // Every other branch genuinely is lower priority than `spared`
            // under a Parallel: an already-active one gets aborted like
            // usual, but one that already finished needs restarting rather
            // than a no-op abort, so its own predicate gets a fresh run.
            for child in &node.children {
                if *child == spared {
                    continue;
                }
                let state = self.blackboard.with_node_memory(child, |m| m.state);
                match state {
                    NodeState::Active => self.abort_node(child),
                    NodeState::Inactive => {
                        let actions = self.blackboard.with_node_memory(&node.id, |m| {
                            let composite = m.composite.get_or_insert_with(Default::default);
                            let parallel = composite.parallel.get_or_insert_with(Default::default);
                            composite::parallel::restart_child(child, parallel)
                        });
                        self.apply_actions(&node.id, actions);
                    }
                    NodeState::Aborting => {}
                }
            }
            return;
        }

        // Non-parallel composite: reset the run position to just before
        // `spared` so that, once the currently-active sibling finishes
        // aborting, `sequence::on_child_finished`'s increment lands back on
        // `spared` itself.
        if let Some(raw_idx) = node.children.iter().position(|c| *c == spared) {
            self.blackboard.with_node_memory(&node.id, |m| {
                let composite = m.composite.get_or_insert_with(Default::default);
                let pos = composite.children_order.iter().position(|&raw| raw == raw_idx).unwrap_or(raw_idx);
                composite.current_index = pos.wrapping_sub(1);
            });
        }
        for child in &node.children {
            if *child == spared {
                continue;
            }
            let active = self.blackboard.with_node_memory(child, |m| m.state == NodeState::Active);
            if active {
                self.abort_node(child);
            }
        }
    }

    /// Decide and issue the `DynamicSubtree` start actions for mounting
    /// `tree_name` at `node_id`: a fresh mount if nothing is mounted yet, or
    /// `run_mode`'s reaction if one already is. For `Restart`, records the
    /// name to remount and flags the container as restarting so the abort's
    /// `on_child_finished` knows to remount instead of just finishing (spec
    /// §4.3.9's "per-agent restarting flag the parent's `on_child_finished`
    /// consults").
    fn begin_dynamic_subtree(&self, node_id: &ConstString, tree_name: &ConstString, run_mode: decorator::DynamicRunMode) -> std::vec::Vec<Action> {
        let mounted = self.blackboard.with_node_memory(node_id, |m| m.dynamic_child.clone());
        let actions = decorator::dynamic_subtree::on_start(tree_name, run_mode, mounted.as_ref());
        if mounted.is_some() && run_mode == decorator::DynamicRunMode::Restart {
            self.blackboard.with_node_memory(node_id, |m| {
                m.dynamic_restart_target = Some(tree_name.clone());
                m.extra = Extra::DynamicSubtree { restarting: true };
            });
        }
        actions
    }

    fn mount_dynamic_subtree(&self, node_id: &ConstString, tree_name: &ConstString) -> Option<()> {
        let template = self.registry.get(tree_name)?;
        let clone = std::sync::Arc::new(template.clone_with_fresh_ids());
        {
            let mut owner = self.owner.write();
            for id in clone.node_ids() {
                owner.insert(id.clone(), Arc::clone(&clone));
            }
        }
        let root = clone.root.clone();
        self.blackboard.with_node_memory(&root, |m| m.mount_parent = Some(node_id.clone()));
        self.blackboard.with_node_memory(node_id, |m| m.dynamic_child = Some(root.clone()));
        self.start_node(&root);
        Some(())
    }

    fn unmount_dynamic_subtree(&self, node_id: &ConstString) {
        let Some(child_root) = self.blackboard.with_node_memory(node_id, |m| m.dynamic_child.take()) else { return };
        let Some(clone) = self.owner.read().get(&child_root).cloned() else { return };
        {
            let mut owner = self.owner.write();
            for id in clone.node_ids() {
                owner.remove(id);
            }
        }
        for id in clone.node_ids() {
            self.blackboard.with_node_memory(id, |m| m.reset());
        }
    }

    /// A static `Subtree` container's linked root, mounted once on first
    /// `start` and reused on every subsequent `start` (a loop/repeat of the
    /// container does not remount a fresh clone).
    fn static_subtree_root(&self, node_id: &ConstString, tree_name: &ConstString) -> Option<ConstString> {
        if let Some(root) = self.blackboard.with_node_memory(node_id, |m| m.dynamic_child.clone()) {
            return Some(root);
        }
        let template = self.registry.get(tree_name)?;
        let clone = std::sync::Arc::new(template.clone_with_fresh_ids());
        {
            let mut owner = self.owner.write();
            for id in clone.node_ids() {
                owner.insert(id.clone(), Arc::clone(&clone));
            }
        }
        let root = clone.root.clone();
        self.blackboard.with_node_memory(node_id, |m| m.dynamic_child = Some(root.clone()));
        Some(root)
    }

    /// `Cooldown`'s fixed window, or `BBCooldown`'s read from `window_key`
    /// (logging and falling back to `cfg.window` if the key is missing or
    /// unparsable).
    fn cooldown_window(&self, cfg: &decorator::CooldownConfig) -> std::time::Duration {
        let Some(key) = &cfg.window_key else { return cfg.window };
        match self.blackboard.get::<std::string::String>(key).ok().and_then(|raw| crate::util::duration::parse(&raw)) {
            Some(window) => window,
            None => {
                tracing::error!(%key, "cooldown window key missing or unparsable");
                cfg.window
            }
        }
    }

    // endregion: --- action application

    // region: --- per-class dispatch

    fn start_actions(&self, node: &Node) -> std::vec::Vec<Action> {
        match &node.kind {
            NodeKind::NonParallel(cfg) => self.blackboard.with_node_memory(&node.id, |m| {
                composite::sequence::on_start(cfg.variant, cfg.weights.as_deref(), &node.children, m.composite.get_or_insert_with(Default::default))
            }),
            NodeKind::Parallel(_) => {
                let (memory, actions) = composite::parallel::on_start(&node.children);
                self.blackboard.with_node_memory(&node.id, |m| {
                    let composite = m.composite.get_or_insert_with(Default::default);
                    composite.parallel = Some(memory);
                });
                actions
            }
            NodeKind::BbCondition(cfg) => {
                let (present, stored) = self.blackboard.lookup_display(&cfg.key);
                let met = cfg.operator.matches(present, &stored, &cfg.value);
                self.blackboard.with_node_memory(&node.id, |m| m.predicate_met = met);
                decorator::observing_condition::on_start(&node.children[0], met, cfg.abort_mode)
            }
            NodeKind::BbEntries(cfg) => {
                let met = decorator::bb_entries::condition_met(cfg.combinator, &cfg.entries, |key| self.blackboard.lookup_display(key));
                self.blackboard.with_node_memory(&node.id, |m| m.predicate_met = met);
                decorator::observing_condition::on_start(&node.children[0], met, cfg.abort_mode)
            }
            NodeKind::WaitCondition(cfg) => {
                let (present, stored) = self.blackboard.lookup_display(&cfg.condition.key);
                let met = cfg.condition.operator.matches(present, &stored, &cfg.condition.value);
                self.blackboard.with_node_memory(&node.id, |m| m.predicate_met = met);
                if cfg.condition.abort_mode.observes() {
                    let mut actions = std::vec![Action::StartObserving];
                    if !met {
                        actions.push(Action::Finish(false));
                    }
                    actions
                } else if met {
                    std::vec::Vec::new()
                } else {
                    std::vec![Action::Finish(false)]
                }
            }
            NodeKind::Condition(cfg) => {
                let met = self.with_ctx(|ctx| {
                    decorator::condition::evaluate_once(ctx, node.delegate_target.as_ref(), node.delegate_method.as_ref(), node.script_id.as_ref())
                });
                self.blackboard.with_node_memory(&node.id, |m| m.predicate_met = met);
                decorator::condition::on_start(&node.children[0], met, cfg.abort_mode, cfg.interval, cfg.deviation)
            }
            NodeKind::ForceResult(_) => decorator::force_result::on_start(&node.children[0]),
            NodeKind::Random(cfg) => {
                let roll: f64 = rand::Rng::random(&mut rand::rng());
                decorator::random::on_start(&node.children[0], cfg.probability, roll)
            }
            NodeKind::Cooldown(cfg) => {
                let window = self.cooldown_window(cfg);
                let cooling = self.blackboard.with_node_memory(&node.id, |m| matches!(&m.extra, Extra::Cooldown { cooling } if *cooling));
                let (cooling, actions) = decorator::cooldown::on_start(&node.children[0], cooling, window, cfg.random_deviation, cfg.start_after_decorated, cfg.fail_on_cool_down);
                self.blackboard.with_node_memory(&node.id, |m| m.extra = Extra::Cooldown { cooling });
                actions
            }
            NodeKind::Repeater(_) => {
                self.blackboard.with_node_memory(&node.id, |m| m.extra = Extra::Repeater { count: 0 });
                decorator::repeater::on_start(&node.children[0])
            }
            NodeKind::Service(cfg) => decorator::service::on_start(&node.children[0], cfg.period, cfg.deviation),
            NodeKind::TimeLimit(cfg) => {
                self.blackboard.with_node_memory(&node.id, |m| m.extra = Extra::TimeLimit { pending_result: None, min_elapsed: false });
                decorator::time_limit::on_start(&node.children[0], cfg.limit)
            }
            NodeKind::Subtree { tree_name } => match self.static_subtree_root(&node.id, tree_name) {
                Some(root) => {
                    self.blackboard.with_node_memory(&root, |m| m.mount_parent = Some(node.id.clone()));
                    decorator::subtree::on_start(&root)
                }
                None => {
                    tracing::error!(%tree_name, "subtree container references an unregistered tree");
                    std::vec![Action::Finish(false)]
                }
            },
            NodeKind::DynamicSubtree(cfg) => self.begin_dynamic_subtree(&node.id, &cfg.tree_name, cfg.run_mode),
            NodeKind::Root(_) => crate::root::on_start(&node.children[0]),
            NodeKind::Action(_) => {
                let tick_interval = self.tick_interval();
                self.with_ctx(|ctx| {
                    task::action::on_start(ctx, node.delegate_target.as_ref(), node.delegate_method.as_ref(), node.script_id.as_ref(), tick_interval)
                })
            }
            NodeKind::Wait(cfg) => task::wait::on_start(cfg.wait_time, cfg.deviation, cfg.forever),
            NodeKind::WaitBb(cfg) => {
                let raw = self.blackboard.get::<std::string::String>(&cfg.duration_key).ok();
                task::wait_bb::on_start(raw.as_deref(), cfg.deviation)
            }
        }
    }

    fn abort_actions(&self, node: &Node) -> std::vec::Vec<Action> {
        match &node.kind {
            NodeKind::NonParallel(_) => self.blackboard.with_node_memory(&node.id, |m| {
                composite::sequence::on_abort(&node.children, m.composite.get_or_insert_with(Default::default))
            }),
            NodeKind::Parallel(_) => self.blackboard.with_node_memory(&node.id, |m| {
                let composite = m.composite.get_or_insert_with(Default::default);
                let parallel = composite.parallel.get_or_insert_with(Default::default);
                composite::parallel::on_abort(&node.children, parallel)
            }),
            NodeKind::Root(_) => crate::root::on_abort(),
            NodeKind::Action(_) => self.with_ctx(|ctx| {
                task::action::on_abort(ctx, node.delegate_target.as_ref(), node.delegate_method.as_ref(), node.script_id.as_ref())
            }),
            NodeKind::Wait(cfg) => task::wait::on_abort(cfg.result_on_abort),
            NodeKind::WaitBb(cfg) => task::wait_bb::on_abort(cfg.result_on_abort),
            NodeKind::WaitCondition(_) => std::vec![Action::StopObserving, Action::Finish(false)],
            NodeKind::Cooldown(_) => {
                let (cooling, mut actions) = decorator::cooldown::on_abort();
                self.blackboard.with_node_memory(&node.id, |m| m.extra = Extra::Cooldown { cooling });
                actions.extend(self.forward_abort_to_child(node));
                actions
            }
            _ => self.forward_abort_to_child(node),
        }
    }

    /// Every remaining decorator wraps exactly one real child and has no
    /// abort behavior of its own beyond forwarding, unless that child never
    /// actually started (the decorator finished before reaching
    /// `StartChild`, so it can't be `Active` here in the first place).
    fn forward_abort_to_child(&self, node: &Node) -> std::vec::Vec<Action> {
        let Some(child) = node.children.first() else { return std::vec![Action::Finish(false)] };
        let active = self.blackboard.with_node_memory(child, |m| m.state == NodeState::Active);
        if active {
            std::vec![Action::AbortChild(child.clone())]
        } else {
            std::vec![Action::Finish(false)]
        }
    }

    fn child_finished_actions(&self, parent: &Node, child_id: &ConstString, succeeded: bool) -> std::vec::Vec<Action> {
        match &parent.kind {
            NodeKind::NonParallel(cfg) => self.blackboard.with_node_memory(&parent.id, |m| {
                composite::sequence::on_child_finished(cfg.variant, &parent.children, succeeded, m.composite.get_or_insert_with(Default::default))
            }),
            NodeKind::Parallel(policy) => self.blackboard.with_node_memory(&parent.id, |m| {
                let composite = m.composite.get_or_insert_with(Default::default);
                let parallel = composite.parallel.get_or_insert_with(Default::default);
                composite::parallel::on_child_finished(policy, &parent.children, child_id, succeeded, parallel)
            }),
            NodeKind::BbCondition(cfg) => decorator::observing_condition::on_child_finished(cfg.abort_mode, succeeded),
            NodeKind::BbEntries(cfg) => decorator::observing_condition::on_child_finished(cfg.abort_mode, succeeded),
            NodeKind::Condition(cfg) => decorator::condition::on_child_finished(cfg.abort_mode, succeeded),
            NodeKind::ForceResult(mode) => decorator::force_result::on_child_finished(*mode, succeeded),
            NodeKind::Random(_) => decorator::random::on_child_finished(succeeded),
            NodeKind::Cooldown(cfg) => {
                let window = self.cooldown_window(cfg);
                let cooling = self.blackboard.with_node_memory(&parent.id, |m| matches!(&m.extra, Extra::Cooldown { cooling } if *cooling));
                let (cooling, actions) = decorator::cooldown::on_child_finished(succeeded, cooling, window, cfg.random_deviation, cfg.reset_on_failure, cfg.start_after_decorated);
                self.blackboard.with_node_memory(&parent.id, |m| m.extra = Extra::Cooldown { cooling });
                actions
            }
            NodeKind::Repeater(cfg) => self.blackboard.with_node_memory(&parent.id, |m| {
                let Extra::Repeater { count } = &mut m.extra else {
                    unreachable!("repeater node finished a child without its Repeater state")
                };
                decorator::repeater::on_child_finished(child_id, succeeded, cfg.count, count)
            }),
            NodeKind::Service(_) => decorator::service::on_child_finished(succeeded),
            NodeKind::TimeLimit(cfg) => {
                let min_elapsed = self.blackboard.with_node_memory(&parent.id, |m| matches!(&m.extra, Extra::TimeLimit { min_elapsed, .. } if *min_elapsed));
                if cfg.is_minimum && !min_elapsed {
                    self.blackboard.with_node_memory(&parent.id, |m| {
                        if let Extra::TimeLimit { pending_result, .. } = &mut m.extra {
                            *pending_result = Some(succeeded);
                        }
                    });
                    return std::vec::Vec::new();
                }
                decorator::time_limit::on_child_finished(cfg.is_minimum, true, succeeded)
            }
            NodeKind::Subtree { .. } => decorator::subtree::on_child_finished(succeeded),
            NodeKind::DynamicSubtree(cfg) => {
                let (restarting, target) = self.blackboard.with_node_memory(&parent.id, |m| {
                    let restarting = matches!(&m.extra, Extra::DynamicSubtree { restarting } if *restarting);
                    (restarting, m.dynamic_restart_target.take())
                });
                if restarting {
                    self.blackboard.with_node_memory(&parent.id, |m| m.extra = Extra::None);
                }
                let tree_name = target.unwrap_or_else(|| cfg.tree_name.clone());
                decorator::dynamic_subtree::on_child_finished(&tree_name, cfg.run_mode, restarting, succeeded)
            }
            NodeKind::Root(cfg) => {
                let is_subtree = parent.parent_for(&self.blackboard).is_some();
                crate::root::on_child_finished(is_subtree, cfg.once, succeeded, cfg.loop_interval, cfg.loop_random_deviation)
            }
            NodeKind::WaitCondition(_) | NodeKind::Action(_) | NodeKind::Wait(_) | NodeKind::WaitBb(_) => {
                tracing::error!(node = %parent.id, "leaf/implicit-child node class received a child-finished event");
                std::vec::Vec::new()
            }
        }
    }

    fn timer_actions(&self, node: &Node) -> std::vec::Vec<Action> {
        match &node.kind {
            NodeKind::Root(_) => crate::root::on_timer(&node.children[0]),
            NodeKind::Action(_) => {
                let tick_interval = self.tick_interval();
                self.with_ctx(|ctx| {
                    task::action::on_timer(ctx, node.delegate_target.as_ref(), node.delegate_method.as_ref(), node.script_id.as_ref(), tick_interval, tick_interval)
                })
            }
            NodeKind::Wait(_) => task::wait::on_timer(),
            NodeKind::WaitBb(_) => task::wait_bb::on_timer(),
            NodeKind::Service(cfg) => self.with_ctx(|ctx| decorator::service::on_timer(ctx, node.delegate_target.as_ref(), node.delegate_method.as_ref(), cfg.period, cfg.deviation)),
            NodeKind::TimeLimit(cfg) if !cfg.is_minimum => decorator::time_limit::on_timer_max(&node.children[0]),
            NodeKind::TimeLimit(_) => {
                let pending = self.blackboard.with_node_memory(&node.id, |m| {
                    let Extra::TimeLimit { pending_result, min_elapsed } = &mut m.extra else { return None };
                    *min_elapsed = true;
                    *pending_result
                });
                decorator::time_limit::on_timer_min(pending)
            }
            NodeKind::Condition(cfg) => {
                let was_met = self.blackboard.with_node_memory(&node.id, |m| m.predicate_met);
                let now_met = self.with_ctx(|ctx| {
                    decorator::condition::evaluate_once(ctx, node.delegate_target.as_ref(), node.delegate_method.as_ref(), node.script_id.as_ref())
                });
                self.blackboard.with_node_memory(&node.id, |m| m.predicate_met = now_met);
                let state = self.blackboard.with_node_memory(&node.id, |m| m.state);
                decorator::condition::on_timer(&node.children[0], state, was_met, now_met, cfg.abort_mode, cfg.interval, cfg.deviation)
            }
            NodeKind::Cooldown(cfg) => {
                let window = self.cooldown_window(cfg);
                let decorator_active = self.blackboard.with_node_memory(&node.id, |m| m.state == NodeState::Active);
                let child_active = self.blackboard.with_node_memory(&node.children[0], |m| m.state == NodeState::Active);
                let (cooling, actions) = decorator::cooldown::on_timer(&node.children[0], decorator_active, child_active, window, cfg.random_deviation);
                self.blackboard.with_node_memory(&node.id, |m| m.extra = Extra::Cooldown { cooling });
                actions
            }
            _ => {
                tracing::error!(node = %node.id, "timer fired for a node class with no timer handler");
                std::vec::Vec::new()
            }
        }
    }

    fn observer_actions(&self, node: &Node) -> std::vec::Vec<Action> {
        let (state, was_met, abort_mode) = match &node.kind {
            NodeKind::BbCondition(cfg) => (self.blackboard.with_node_memory(&node.id, |m| m.state), self.blackboard.with_node_memory(&node.id, |m| m.predicate_met), cfg.abort_mode),
            NodeKind::BbEntries(cfg) => (self.blackboard.with_node_memory(&node.id, |m| m.state), self.blackboard.with_node_memory(&node.id, |m| m.predicate_met), cfg.abort_mode),
            NodeKind::WaitCondition(cfg) => (self.blackboard.with_node_memory(&node.id, |m| m.state), self.blackboard.with_node_memory(&node.id, |m| m.predicate_met), cfg.condition.abort_mode),
            _ => return std::vec::Vec::new(),
        };
        let now_met = match &node.kind {
            NodeKind::BbCondition(cfg) => {
                let (present, stored) = self.blackboard.lookup_display(&cfg.key);
                cfg.operator.matches(present, &stored, &cfg.value)
            }
            NodeKind::BbEntries(cfg) => decorator::bb_entries::condition_met(cfg.combinator, &cfg.entries, |key| self.blackboard.lookup_display(key)),
            NodeKind::WaitCondition(cfg) => {
                let (present, stored) = self.blackboard.lookup_display(&cfg.condition.key);
                cfg.condition.operator.matches(present, &stored, &cfg.condition.value)
            }
            _ => was_met,
        };
        self.blackboard.with_node_memory(&node.id, |m| m.predicate_met = now_met);
        if matches!(node.kind, NodeKind::WaitCondition(_)) {
            if was_met == now_met {
                return std::vec::Vec::new();
            }
            return if now_met { std::vec::Vec::new() } else { std::vec![Action::StopObserving, Action::Finish(false)] };
        }
        decorator::observing_condition::evaluate(&node.children[0], state, was_met, now_met, abort_mode)
    }

    fn tick_interval(&self) -> std::time::Duration {
        let tree = self.running_tree();
        tree.node(&tree.root).map_or(std::time::Duration::from_millis(100), |root| match &root.kind {
            NodeKind::Root(cfg) => cfg.interval,
            _ => std::time::Duration::from_millis(100),
        })
    }

    // endregion: --- per-class dispatch
}
