//! Glue to the `tinyscript` engine used for pre/post-conditions, `BBCondition`
//! expressions and `Action` scripts.
//!
//! Mirrors the shape the spec's design notes call for: `compile(id, source)`
//! eagerly at tree load, `run(id, env) -> Value` at tick time, cached by node
//! id so a script is parsed exactly once no matter how many agents run the
//! tree it belongs to.

pub mod error;

pub use error::Error;
pub use tinyscript::ScriptingValue as Value;

use crate::ConstString;
use spin::{Mutex, RwLock};
use std::collections::BTreeMap;

/// A compiled-script cache in front of a single `tinyscript::Runtime`.
///
/// One `Engine` is shared (via `Arc`) by every tree loaded into a
/// [`Registry`](crate::registry::Registry); scripts are immutable program
/// text keyed by node id, so compiling is a one-time cost at load time and
/// `run` is the only per-tick cost.
pub struct Engine {
    runtime: Mutex<tinyscript::Runtime>,
    compiled: RwLock<BTreeMap<ConstString, ()>>,
}

impl Engine {
    /// Create an engine with no scripts compiled yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            runtime: Mutex::new(tinyscript::Runtime::new()),
            compiled: RwLock::new(BTreeMap::new()),
        }
    }

    /// Compile `source` under `id`. Idempotent recompilation is rejected —
    /// callers that reload a tree should build a fresh `Engine`.
    pub fn compile(&self, id: &ConstString, source: &str) -> Result<(), Error> {
        if self.compiled.read().contains_key(id) {
            return Err(Error::AlreadyCompiled(id.clone()));
        }
        let mut runtime = self.runtime.lock();
        runtime
            .compile(id.as_ref(), source)
            .map_err(|err| Error::Engine { id: id.clone(), message: format!("{err:?}") })?;
        self.compiled.write().insert(id.clone(), ());
        Ok(())
    }

    /// Run the script compiled under `id` against `env`, returning the
    /// script's result value.
    pub fn run(&self, id: &ConstString, env: &mut dyn tinyscript::Environment) -> Result<Value, Error> {
        if !self.compiled.read().contains_key(id) {
            return Err(Error::NotCompiled(id.clone()));
        }
        let mut runtime = self.runtime.lock();
        runtime
            .run(id.as_ref(), env)
            .map_err(|err| Error::Engine { id: id.clone(), message: format!("{err:?}") })
    }

    /// Whether `id` has already been compiled.
    #[must_use]
    pub fn is_compiled(&self, id: &ConstString) -> bool {
        self.compiled.read().contains_key(id)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a script's result counts as success for an `Action` task or a
/// `BBCondition`/script-driven decorator (spec §6): nil and `false` are
/// failure, everything else (including `0`/`""`, unlike most scripting
/// languages) is success — the engine has no implicit falsy numbers or
/// strings, only an explicit boolean.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    !matches!(value, Value::Nil() | Value::Boolean(false))
}
