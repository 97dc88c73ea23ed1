//! Bridges a [`Blackboard`] to `tinyscript`'s [`Environment`] trait, so a
//! compiled script (a `BBCondition` expression, an `Action`'s script, a
//! pre/post-condition) can read and write plain blackboard keys by name.
//!
//! Mirrors the teacher's `BehaviorData: Environment` impl: `get_env` probes
//! the stored value's type in turn (there is no reflection to ask first),
//! and `set_env` refuses to change an entry's type once it is defined.

use super::Blackboard;
use tinyscript::{Environment, ScriptingValue};

/// A borrow of a [`Blackboard`] usable as a script's variable environment.
pub struct ScriptEnv<'a>(pub &'a Blackboard);

impl Environment for ScriptEnv<'_> {
    fn define_env(&mut self, key: &str, value: ScriptingValue) -> Result<(), tinyscript::environment::Error> {
        if self.0.contains(key) {
            return self.set_env(key, value);
        }
        let result = match value {
            ScriptingValue::Nil() => return Ok(()),
            ScriptingValue::Boolean(b) => self.0.set(key, b),
            ScriptingValue::Float64(f) => self.0.set(key, f),
            ScriptingValue::Int64(i) => self.0.set(key, i),
            ScriptingValue::String(s) => self.0.set(key, s),
        };
        result.map_err(|cause| tinyscript::environment::Error::EnvVarSet { name: key.into(), cause: cause.to_string().into() })
    }

    fn get_env(&self, name: &str) -> Result<ScriptingValue, tinyscript::environment::Error> {
        if !self.0.contains(name) {
            return Err(tinyscript::environment::Error::EnvVarNotDefined { name: name.into() });
        }
        if let Ok(b) = self.0.get::<bool>(name) {
            return Ok(ScriptingValue::Boolean(b));
        }
        if let Ok(i) = self.0.get::<i64>(name) {
            return Ok(ScriptingValue::Int64(i));
        }
        if let Ok(f) = self.0.get::<f64>(name) {
            return Ok(ScriptingValue::Float64(f));
        }
        if let Ok(s) = self.0.get::<String>(name) {
            return Ok(ScriptingValue::String(s));
        }
        Err(tinyscript::environment::Error::EnvVarUnknownType { name: name.into() })
    }

    fn set_env(&mut self, name: &str, value: ScriptingValue) -> Result<(), tinyscript::environment::Error> {
        if !self.0.contains(name) {
            return Err(tinyscript::environment::Error::EnvVarNotDefined { name: name.into() });
        }
        let result = match value {
            ScriptingValue::Nil() => return Ok(()),
            ScriptingValue::Boolean(b) if self.0.get::<bool>(name).is_ok() => self.0.set(name, b),
            ScriptingValue::Int64(i) if self.0.get::<i64>(name).is_ok() => self.0.set(name, i),
            ScriptingValue::Float64(f) if self.0.get::<f64>(name).is_ok() => self.0.set(name, f),
            ScriptingValue::String(s) if self.0.get::<String>(name).is_ok() => self.0.set(name, s),
            _ => return Err(tinyscript::environment::Error::EnvVarWrongType { name: name.into() }),
        };
        result.map_err(|cause| tinyscript::environment::Error::EnvVarSet { name: name.into(), cause: cause.to_string().into() })
    }
}
