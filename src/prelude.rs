//! Convenience re-exports for embedding a [`Brain`](crate::brain::Brain).
//!
//! The node-class catalog is a closed enum rather than an open plugin
//! registry, so there is no macro-driven class-registration surface to
//! re-export here the way a plugin-based tree engine would need; a host just
//! needs the handful of types it touches to load trees, register delegates
//! and run agents.

pub use crate::blackboard::{Blackboard, Value};
pub use crate::brain::Brain;
pub use crate::config::TreeCfg;
pub use crate::node::{DelegateMethod, DelegateTable, MethodTable};
pub use crate::registry::Registry;
pub use crate::runtime::{Scheduler, WorkerPool};
pub use crate::tree::Tree;
pub use crate::{ConstString, Delta, Error, EventType, NodeCategory, NodeState, TickResult};
