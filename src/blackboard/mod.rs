//! The hierarchical key/value store every agent's tree runs against.
//!
//! A [`Blackboard`] is the per-agent scope: plain user keys (typed, via
//! `databoard`), a [`NodeMemory`](memory::NodeMemory) slot per node id, a
//! key-change [`ObserverTable`], and — for dynamically mounted subtrees that
//! want their own variable scope — an optional parent blackboard. A write
//! redirects to the nearest ancestor that already defines the key, so a
//! mounted subtree can read and update a variable owned by the tree that
//! mounted it without any explicit plumbing.

pub mod error;
pub mod memory;
pub mod observer;
pub mod script_env;

pub use error::Error;
pub use memory::{CompositeMemory, Extra, NodeMemory, ParallelMemory};
pub use observer::{ObserverId, ObserverTable};
pub use script_env::ScriptEnv;

use crate::ConstString;
use crate::runtime::Scheduler;
use std::any::Any;
use std::fmt::Debug;
use std::str::FromStr;
use spin::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// The full bound required of a value stored on the blackboard, mirroring
/// the teacher's `BehaviorData::get`/`set` bounds: values must be type-erased
/// (`Any`), cheap to duplicate into unrelated scopes (`Clone`), printable for
/// `tracing`/error messages (`Debug`), and parseable from/to the plain-text
/// form scripts and config files use (`FromStr`/`ToString`).
pub trait Value: Any + Clone + Debug + FromStr + ToString + Send + Sync {}
impl<T: Any + Clone + Debug + FromStr + ToString + Send + Sync> Value for T {}

/// A per-agent hierarchical key/value store.
pub struct Blackboard {
    id: ConstString,
    stripe_id: u64,
    parent: Option<Arc<Blackboard>>,
    board: RwLock<databoard::Databoard>,
    node_memory: RwLock<BTreeMap<ConstString, NodeMemory>>,
    observers: RwLock<ObserverTable>,
    enabled: AtomicBool,
    scheduler: Arc<dyn Scheduler>,
}

impl Blackboard {
    /// Create a root blackboard (no parent) for the agent identified by
    /// `id`, ticking on `stripe_id` and dispatching observer callbacks
    /// through `scheduler`.
    #[must_use]
    pub fn new(id: ConstString, stripe_id: u64, scheduler: Arc<dyn Scheduler>) -> Self {
        scheduler.ensure_stripe(stripe_id);
        Self {
            id,
            stripe_id,
            parent: None,
            board: RwLock::new(databoard::Databoard::default()),
            node_memory: RwLock::new(BTreeMap::new()),
            observers: RwLock::new(ObserverTable::new()),
            enabled: AtomicBool::new(true),
            scheduler,
        }
    }

    /// Create a child scope (a mounted subtree's own variable namespace)
    /// underneath `parent`, sharing its stripe and scheduler.
    #[must_use]
    pub fn child(id: ConstString, parent: Arc<Blackboard>) -> Self {
        let stripe_id = parent.stripe_id;
        let scheduler = parent.scheduler.clone();
        Self {
            id,
            stripe_id,
            parent: Some(parent),
            board: RwLock::new(databoard::Databoard::default()),
            node_memory: RwLock::new(BTreeMap::new()),
            observers: RwLock::new(ObserverTable::new()),
            enabled: AtomicBool::new(true),
            scheduler,
        }
    }

    /// The agent/tree-instance id this blackboard belongs to.
    #[must_use]
    pub fn id(&self) -> &ConstString {
        &self.id
    }

    /// The stripe this blackboard's agent ticks on.
    #[must_use]
    pub fn stripe_id(&self) -> u64 {
        self.stripe_id
    }

    /// Whether the blackboard currently accepts reads/writes.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Disable the board: subsequent reads/writes fail until re-enabled, and
    /// every node's [`NodeMemory`] is wiped (spec §4.6).
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::SeqCst);
        for memory in self.node_memory.write().values_mut() {
            memory.reset();
        }
    }

    /// Re-enable the board after [`Blackboard::disable`].
    pub fn enable(&self) {
        self.enabled.store(true, Ordering::SeqCst);
    }

    fn defined_locally(&self, key: &str) -> bool {
        self.board.read().contains(key)
    }

    /// Whether `key` is defined anywhere in this scope's parent chain,
    /// regardless of type. Used by the script environment bridge, which
    /// has to probe a key's type before it knows which variant to read.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.owner_of(key).is_some()
    }

    /// Borrow this blackboard as a `tinyscript` environment.
    #[must_use]
    pub fn as_script_env(&self) -> ScriptEnv<'_> {
        ScriptEnv(self)
    }

    /// Find the blackboard that owns `key` — the nearest ancestor (including
    /// `self`) that already has a value under it — or `None` if it is
    /// undefined everywhere in the chain.
    fn owner_of(&self, key: &str) -> Option<&Blackboard> {
        if self.defined_locally(key) {
            return Some(self);
        }
        self.parent.as_deref().and_then(|p| p.owner_of(key))
    }

    /// Read `key`'s value, searching up through parent scopes.
    pub fn get<T: Value>(&self, key: &str) -> Result<T, Error> {
        if !self.is_enabled() {
            return Err(Error::Disabled);
        }
        let owner = self.owner_of(key).ok_or_else(|| Error::KeyNotFound(key.into()))?;
        owner.board.read().get::<T>(key).ok_or_else(|| Error::TypeMismatch { key: key.into() })
    }

    /// Write `key`'s value. If an ancestor already defines `key`, the write
    /// redirects there instead of shadowing it locally — this is what lets a
    /// mounted subtree update a variable owned by its mounting tree.
    pub fn set<T: Value>(&self, key: &str, value: T) -> Result<(), Error> {
        if !self.is_enabled() {
            return Err(Error::Disabled);
        }
        if !self.defined_locally(key) {
            if let Some(parent) = &self.parent {
                if parent.owner_of(key).is_some() {
                    parent.set(key, value)?;
                    self.dispatch_observers(key);
                    return Ok(());
                }
            }
        }
        self.board.write().set(key, value);
        self.dispatch_observers(key);
        Ok(())
    }

    /// Dispatch any registered key-change notifications for `key`, deferred
    /// onto this blackboard's stripe.
    fn dispatch_observers(&self, key: &str) {
        self.observers.read().notify(key, self.scheduler.as_ref(), self.stripe_id);
    }

    /// Subscribe to changes of `key`.
    pub fn observe<F>(&self, key: ConstString, callback: F) -> ObserverId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.observers.write().subscribe(key, callback)
    }

    /// Remove a subscription created with [`Blackboard::observe`].
    pub fn unobserve(&self, id: ObserverId) {
        self.observers.write().unsubscribe(id);
    }

    /// Look up `key`'s current value as plain text, for the
    /// `Operator`-based decorators that compare against a config string
    /// rather than a typed value. Probes the stored type the same way
    /// [`ScriptEnv::get_env`] does, since there is no reflection to ask
    /// first.
    #[must_use]
    pub fn lookup_display(&self, key: &str) -> (bool, std::string::String) {
        if !self.contains(key) {
            return (false, std::string::String::new());
        }
        if let Ok(b) = self.get::<bool>(key) {
            return (true, b.to_string());
        }
        if let Ok(i) = self.get::<i64>(key) {
            return (true, i.to_string());
        }
        if let Ok(f) = self.get::<f64>(key) {
            return (true, f.to_string());
        }
        if let Ok(s) = self.get::<std::string::String>(key) {
            return (true, s);
        }
        (false, std::string::String::new())
    }

    /// Run `f` against this node's memory slot, creating it on first access.
    pub fn with_node_memory<R>(&self, node_id: &ConstString, f: impl FnOnce(&mut NodeMemory) -> R) -> R {
        let mut table = self.node_memory.write();
        let memory = table.entry(node_id.clone()).or_default();
        f(memory)
    }
}
