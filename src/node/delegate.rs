//! Delegate reflection: name-based method dispatch cached at registration.
//!
//! Go's `handle` package resolves a delegate method by reflecting over the
//! target value's methods once and caching the result; Rust has no runtime
//! reflection; so the same one-time-cache shape is achieved by letting
//! callers register a named closure per method instead of a method pointer
//! obtained by reflection. The cache is the `MethodTable`/`DelegateTable`
//! structure itself — resolution by name still only happens once per
//! `register_*` call, and every tick after that is a direct map lookup.

use crate::node::error::Error;
use crate::{ConstString, Delta, EventType, TickResult};
use std::collections::BTreeMap;

/// The four delegate method shapes named in the spec's external interface
/// section, in increasing order of ceremony.
pub enum DelegateMethod {
    /// Full control: receives the event and delta, returns the tick result
    /// or an error.
    Full(Box<dyn Fn(EventType, Delta) -> Result<TickResult, String> + Send + Sync>),
    /// Fire-and-forget: always succeeds.
    Simple(Box<dyn Fn() + Send + Sync>),
    /// Fire-and-forget, may fail.
    SimpleWithErr(Box<dyn Fn() -> Option<String> + Send + Sync>),
    /// Synchronous, returns its own result directly.
    SimpleWithResult(Box<dyn Fn() -> TickResult + Send + Sync>),
}

impl DelegateMethod {
    fn invoke(&self, event: EventType, delta: Delta) -> Result<TickResult, String> {
        match self {
            Self::Full(f) => f(event, delta),
            Self::Simple(f) => {
                f();
                Ok(TickResult::Succeeded)
            }
            Self::SimpleWithErr(f) => match f() {
                None => Ok(TickResult::Succeeded),
                Some(message) => Err(message),
            },
            Self::SimpleWithResult(f) => Ok(f()),
        }
    }
}

/// The cached method set for one registered delegate target.
#[derive(Default)]
pub struct MethodTable {
    methods: BTreeMap<ConstString, DelegateMethod>,
}

impl MethodTable {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a [`DelegateMethod::Full`] closure under `method`.
    pub fn full<F>(&mut self, method: impl Into<ConstString>, f: F) -> &mut Self
    where
        F: Fn(EventType, Delta) -> Result<TickResult, String> + Send + Sync + 'static,
    {
        self.methods.insert(method.into(), DelegateMethod::Full(Box::new(f)));
        self
    }

    /// Register a [`DelegateMethod::Simple`] closure under `method`.
    pub fn simple<F>(&mut self, method: impl Into<ConstString>, f: F) -> &mut Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.methods.insert(method.into(), DelegateMethod::Simple(Box::new(f)));
        self
    }

    /// Register a [`DelegateMethod::SimpleWithErr`] closure under `method`.
    pub fn simple_with_err<F>(&mut self, method: impl Into<ConstString>, f: F) -> &mut Self
    where
        F: Fn() -> Option<String> + Send + Sync + 'static,
    {
        self.methods.insert(method.into(), DelegateMethod::SimpleWithErr(Box::new(f)));
        self
    }

    /// Register a [`DelegateMethod::SimpleWithResult`] closure under `method`.
    pub fn simple_with_result<F>(&mut self, method: impl Into<ConstString>, f: F) -> &mut Self
    where
        F: Fn() -> TickResult + Send + Sync + 'static,
    {
        self.methods.insert(method.into(), DelegateMethod::SimpleWithResult(Box::new(f)));
        self
    }

    fn get(&self, method: &str) -> Option<&DelegateMethod> {
        self.methods.get(method)
    }
}

/// An agent's full set of registered delegate targets — the `Brain`'s
/// delegate table (spec §3.5).
#[derive(Default)]
pub struct DelegateTable {
    targets: BTreeMap<ConstString, MethodTable>,
}

impl DelegateTable {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the method table for `target`, returning it for
    /// further `full`/`simple`/... calls.
    pub fn register_target(&mut self, target: impl Into<ConstString>) -> &mut MethodTable {
        self.targets.entry(target.into()).or_default()
    }

    /// Invoke `target.method`, translating an unknown target/method or a
    /// method-reported failure into a [`Error`].
    pub fn dispatch(
        &self,
        target: &str,
        method: &str,
        event: EventType,
        delta: Delta,
    ) -> Result<TickResult, Error> {
        let table = self.targets.get(target).ok_or_else(|| Error::UnknownTarget(target.into()))?;
        let delegate = table
            .get(method)
            .ok_or_else(|| Error::UnknownMethod { target: target.into(), method: method.into() })?;
        delegate.invoke(event, delta).map_err(|message| Error::DelegateFailed {
            target: target.into(),
            method: method.into(),
            message,
        })
    }

    /// Whether `target` has been registered at all.
    #[must_use]
    pub fn has_target(&self, target: &str) -> bool {
        self.targets.contains_key(target)
    }
}
