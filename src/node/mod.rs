//! The node data model and lifecycle dispatch (spec §3.1, §4.1).
//!
//! A [`Node`] is immutable, shared read-only across every agent running the
//! tree it belongs to; all per-agent mutable state lives in the matching
//! [`NodeMemory`](crate::blackboard::NodeMemory) slot. Children are
//! referenced by id rather than owned directly (spec design notes: the tree
//! is a DAG once dynamic subtrees are mounted, and nodes must not hold
//! strong references to each other), so every lifecycle function takes the
//! ids it needs and looks storage up through the owning [`Tree`](crate::tree::Tree).

pub mod delegate;
pub mod error;

pub use delegate::{DelegateMethod, DelegateTable, MethodTable};
pub use error::Error;

use crate::blackboard::Blackboard;
use crate::composite::{NonParallelConfig, Parallel};
use crate::decorator::{
    BbConditionConfig, BbEntriesConfig, ConditionConfig, CooldownConfig, DynamicSubtreeConfig,
    ForceResult, RandomConfig, RepeaterConfig, ServiceConfig, TimeLimitConfig, WaitConditionConfig,
};
use crate::root::RootConfig;
use crate::script::Engine;
use crate::task::{ActionConfig, WaitBbConfig, WaitConfig};
use crate::{ConstString, NodeCategory};

/// One side effect a lifecycle function asks the driving [`Brain`](crate::brain::Brain)
/// to perform. Keeping node-class logic as pure functions returning a list of
/// these (rather than methods that reach back into the runtime themselves)
/// is what makes composite/decorator/task logic testable without a running
/// stripe, scheduler or blackboard.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Start the named child.
    StartChild(ConstString),
    /// Abort the named child (it is currently `Active`).
    AbortChild(ConstString),
    /// Finish the node this action list was produced for, with the given
    /// success flag.
    Finish(bool),
    /// Schedule a one-shot timer; when it fires the owning node's
    /// `on_timer` hook is invoked.
    ScheduleTimer(std::time::Duration),
    /// Stop the node's currently owned timer, if any.
    StopTimer,
    /// Begin observing the blackboard keys this node's condition depends on.
    StartObserving,
    /// Stop observing.
    StopObserving,
    /// Ask the nearest composite ancestor to abort every child running at
    /// lower priority than `below` (observing-condition abort modes
    /// `LowerPriority`/`Both`).
    AbortLowerPriorityThan(ConstString),
    /// Clone the named tree template and mount it as this node's dynamic
    /// child (spec §4.7 `mount_all`/dynamic mounting).
    MountDynamicSubtree(ConstString),
    /// Unmount and discard the currently mounted dynamic child.
    UnmountDynamicSubtree,
}

/// Read-only context a lifecycle function needs beyond the node/memory it was
/// called for: blackboard access, the script engine, and the agent's
/// delegate table.
pub struct NodeCtx<'a> {
    /// The agent's blackboard.
    pub blackboard: &'a Blackboard,
    /// The tree's compiled-script cache.
    pub script: &'a Engine,
    /// The agent's registered delegate targets.
    pub delegates: &'a DelegateTable,
    /// The delegate target to use when a node names a method but no target
    /// (falls back to the tree root's target, per spec §4.8).
    pub default_target: Option<&'a ConstString>,
    /// Spec §6's `action_success_if_not_delegate`: whether an `Action`/task
    /// node with neither a delegate nor a script configured succeeds (true)
    /// or fails (false) when ticked.
    pub action_success_if_not_delegate: bool,
}

/// Per-class configuration, tagged by node class (spec design notes §9:
/// "model each node as shared base fields + subclass-specific data").
#[derive(Clone)]
pub enum NodeKind {
    /// `Sequence`/`Selector`/`RandomSequence`/`RandomSelector`.
    NonParallel(NonParallelConfig),
    /// `Parallel`.
    Parallel(Parallel),
    /// `BBCondition`.
    BbCondition(BbConditionConfig),
    /// `BBEntries`.
    BbEntries(BbEntriesConfig),
    /// `Condition` (a periodic delegate/script poll).
    Condition(ConditionConfig),
    /// `WaitCondition`.
    WaitCondition(WaitConditionConfig),
    /// `Failure`/`Succeeded`/`Inverter`.
    ForceResult(ForceResult),
    /// `Random`.
    Random(RandomConfig),
    /// `Cooldown`/`BBCooldown`.
    Cooldown(CooldownConfig),
    /// `Repeater`.
    Repeater(RepeaterConfig),
    /// `Service`.
    Service(ServiceConfig),
    /// `TimeMax`/`TimeMin`.
    TimeLimit(TimeLimitConfig),
    /// Static `Subtree` container.
    Subtree {
        /// The name of the tree to mount, resolved at load time.
        tree_name: ConstString,
    },
    /// `DynamicSubtree`.
    DynamicSubtree(DynamicSubtreeConfig),
    /// `Root`.
    Root(RootConfig),
    /// `Action` task.
    Action(ActionConfig),
    /// `Wait` task.
    Wait(WaitConfig),
    /// `WaitBB` task.
    WaitBb(WaitBbConfig),
}

/// A node definition: immutable, shared by every agent ticking the tree it
/// belongs to.
pub struct Node {
    /// Unique id within the tree instance that owns it.
    pub id: ConstString,
    /// Human-readable name, used in tracing and error messages.
    pub name: ConstString,
    /// Structural role (used for generic dispatch/validation).
    pub category: NodeCategory,
    /// The class-specific behavior this node implements.
    pub kind: NodeKind,
    /// The static parent id, as declared in config. Dynamically mounted
    /// nodes may be re-parented per-agent via `NodeMemory::mount_parent`.
    pub parent: Option<ConstString>,
    /// Child ids, in declaration order.
    pub children: std::vec::Vec<ConstString>,
    /// Optional delegate binding (`Task`/`Action` nodes, and any decorator
    /// whose condition is delegate-driven rather than script-driven).
    pub delegate_target: Option<ConstString>,
    /// The method name to dispatch on `delegate_target` (or on the tree
    /// root's target, if this node names none).
    pub delegate_method: Option<ConstString>,
    /// A compiled script id to run instead of (or alongside) a delegate.
    pub script_id: Option<ConstString>,
}

impl Node {
    /// This node's resolved parent for `brain`'s agent: the per-agent mount
    /// parent if one was recorded (dynamic mounting), otherwise the static
    /// `parent` field.
    #[must_use]
    pub fn parent_for(&self, blackboard: &Blackboard) -> Option<ConstString> {
        let mounted = blackboard.with_node_memory(&self.id, |memory| memory.mount_parent.clone());
        mounted.or_else(|| self.parent.clone())
    }
}
