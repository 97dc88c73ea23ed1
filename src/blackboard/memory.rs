//! Per-agent, per-node mutable state.
//!
//! One [`NodeMemory`] slot exists per `(agent, node id)` pair, held inside
//! that agent's [`Blackboard`](super::Blackboard). This is where a node's
//! lifecycle state lives — the node definition itself (`NodeKind`, config)
//! is shared read-only across every agent running the same tree.

use crate::ConstString;
use crate::NodeState;
use crate::runtime::TimerHandle;
use std::collections::BTreeMap;
use std::time::Duration;

/// Bookkeeping for a `Parallel` composite, mirroring `composite/parallel.go`'s
/// `ParallelMemory` exactly: which children are still running, how many have
/// succeeded/failed, and whether an early abort of the remaining children has
/// already been triggered.
#[derive(Debug, Default, Clone)]
pub struct ParallelMemory {
    /// Per-child-id success flag, recorded as each child finishes.
    pub children_succeeded: BTreeMap<ConstString, bool>,
    /// Count of children still `Active`/`Aborting`.
    pub running_count: u32,
    /// Count of children that finished with success.
    pub succeeded_count: u32,
    /// Count of children that finished with failure.
    pub failed_count: u32,
    /// The parallel's own final result, set once all children have settled.
    pub succeeded: Option<bool>,
    /// Set once the remaining active children have been told to abort early
    /// (a success/failure policy of `One` was satisfied before every child
    /// finished on its own).
    pub children_aborted: bool,
}

/// Which child order a composite is currently iterating, and in what
/// permutation — shared shape for `Sequence`/`Selector` (`children_order` is
/// `0..len` in declaration order) and their `Random*` variants
/// (`children_order` is a shuffled or weighted permutation drawn on `start`).
#[derive(Debug, Default, Clone)]
pub struct CompositeMemory {
    /// Index into `children_order` of the child currently running.
    pub current_index: usize,
    /// The order in which children are (or were) started this run.
    pub children_order: Vec<usize>,
    /// Set only for `Parallel`.
    pub parallel: Option<ParallelMemory>,
}

/// Extra per-node-class state that doesn't belong on every node, kept as an
/// explicit enum (rather than a type-erased map) since the node classes that
/// need it are a closed, known set.
#[derive(Debug, Default)]
pub enum Extra {
    #[default]
    None,
    /// `Cooldown`/`BBCooldown`: whether the window is currently in force,
    /// persisted across the decorator's own start/finish cycles (it outlives
    /// any single run of the child).
    Cooldown { cooling: bool },
    /// `Repeater`: successful iterations completed so far.
    Repeater { count: u32 },
    /// `Service`: accumulated time since the last periodic tick.
    Service { elapsed: Duration },
    /// `TimeMin`: the child's own result, if it finished before the minimum
    /// run time elapsed — held back until the timer fires. `min_elapsed`
    /// records whether that timer has already fired.
    TimeLimit { pending_result: Option<bool>, min_elapsed: bool },
    /// `DynamicSubtree`: set while a restart-mode remount is in flight so a
    /// racing abort doesn't double-mount.
    DynamicSubtree { restarting: bool },
}

/// Mutable per-agent state for a single node.
pub struct NodeMemory {
    /// Current lifecycle state.
    pub state: NodeState,
    /// For nodes whose parent is resolved dynamically (mounted subtree
    /// content): the id of the node acting as parent in *this* agent's tree
    /// instance, overriding the node definition's static `parent`.
    pub mount_parent: Option<ConstString>,
    /// For `Subtree`/`DynamicSubtree` containers: the id of the currently
    /// mounted child root, if any.
    pub dynamic_child: Option<ConstString>,
    /// `DynamicSubtree` only: the tree to mount once an in-flight `Restart`
    /// abort settles, which may differ from the node's own configured
    /// `tree_name` when the restart was triggered by `dynamic_decorate`
    /// naming a different tag.
    pub dynamic_restart_target: Option<ConstString>,
    /// Whether this node (an `ObservingCondition` or a subclass of it) is
    /// currently subscribed to blackboard changes.
    pub observing: bool,
    /// Live blackboard-key subscriptions backing `observing`, one per watched
    /// key (`BBEntries` watches more than one).
    pub observer_ids: std::vec::Vec<crate::blackboard::ObserverId>,
    /// The predicate's value as of the last evaluation, used to detect the
    /// edges `ObservingCondition::evaluate` reacts to.
    pub predicate_met: bool,
    /// Composite bookkeeping (child order, Parallel accounting). `None` for
    /// non-composite nodes.
    pub composite: Option<CompositeMemory>,
    /// Class-specific scratch state; see [`Extra`].
    pub extra: Extra,
    /// Live timer handle, if this node currently owns a scheduled timer
    /// (`Wait`, `Cooldown`, `Service`, `TimeMax`/`TimeMin`).
    pub timer: Option<TimerHandle>,
}

impl Default for NodeMemory {
    fn default() -> Self {
        Self {
            state: NodeState::Inactive,
            mount_parent: None,
            dynamic_child: None,
            dynamic_restart_target: None,
            observing: false,
            observer_ids: std::vec::Vec::new(),
            predicate_met: false,
            composite: None,
            extra: Extra::None,
            timer: None,
        }
    }
}

impl NodeMemory {
    /// Reset to the state a fresh agent would have, as happens when a
    /// blackboard is disabled (spec §4.6: disabling wipes state) or when a
    /// dynamic subtree is unmounted.
    pub fn reset(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.stop();
        }
        *self = Self::default();
    }
}
