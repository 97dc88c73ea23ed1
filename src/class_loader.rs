//! Name → constructor factory for node classes (spec §4.8), grounded in
//! `classloader.go`. The Go original reflects over registered struct types;
//! since our node classes are a closed, fixed set (spec §6's built-in class
//! list), the idiomatic Rust shape is a name → constructor-closure map
//! instead — the same `BTreeMap<ConstString, Arc<Fn(...)>>` shape the
//! teacher's `BehaviorRegistry` uses for its own behavior constructors.

use crate::composite::{FailurePolicy, NonParallelConfig, NonParallelVariant, Parallel, SuccessPolicy};
use crate::config::{NodeCfg, Value};
use crate::decorator::{
    AbortMode, BbConditionConfig, BbEntriesConfig, Combinator, ConditionConfig, CooldownConfig, DynamicRunMode,
    DynamicSubtreeConfig, ForceResult, Operator, RandomConfig, RepeaterConfig, ServiceConfig, TimeLimitConfig,
    WaitConditionConfig,
};
use crate::node::NodeKind;
use crate::root::RootConfig;
use crate::task::{ActionConfig, WaitBbConfig, WaitConfig};
use crate::ConstString;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Failures raised while building a node from its class name and config.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No class is registered under this name.
    #[error("unknown node class '{0}'")]
    UnknownClass(ConstString),
    /// A property the class requires was missing or of the wrong type.
    #[error("node '{node}' class '{class}': {message}")]
    BadProperty {
        /// The offending node's id.
        node: ConstString,
        /// The class being constructed.
        class: ConstString,
        /// What was wrong.
        message: std::string::String,
    },
}

type Constructor = dyn Fn(&NodeCfg) -> Result<NodeKind, Error> + Send + Sync;

/// A name → constructor registry. Built-in classes are registered by
/// [`ClassLoader::with_builtins`]; nothing currently in this crate needs to
/// register additional classes at runtime, but the map is public so a host
/// application can extend it.
pub struct ClassLoader {
    registry: BTreeMap<ConstString, Arc<Constructor>>,
}

impl ClassLoader {
    /// An empty loader with no classes registered.
    #[must_use]
    pub fn new() -> Self {
        Self { registry: BTreeMap::new() }
    }

    /// Register a constructor under `name`, replacing any existing one.
    pub fn register<F>(&mut self, name: &str, constructor: F)
    where
        F: Fn(&NodeCfg) -> Result<NodeKind, Error> + Send + Sync + 'static,
    {
        self.registry.insert(ConstString::from(name), Arc::new(constructor));
    }

    /// Whether `name` is a registered class.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.registry.contains_key(name)
    }

    /// Construct a fresh [`NodeKind`] for `cfg` via its registered class
    /// (`cfg.name`).
    pub fn new_kind(&self, cfg: &NodeCfg) -> Result<NodeKind, Error> {
        let ctor = self.registry.get(cfg.name.as_str()).ok_or_else(|| Error::UnknownClass(ConstString::from(cfg.name.as_str())))?;
        ctor(cfg)
    }

    /// A loader pre-populated with every class spec §6 names as built in.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut loader = Self::new();
        loader.register("Root", root);
        loader.register("Sequence", |cfg| non_parallel(cfg, NonParallelVariant::Sequence));
        loader.register("Selector", |cfg| non_parallel(cfg, NonParallelVariant::Selector));
        loader.register("RandomSequence", |cfg| non_parallel(cfg, NonParallelVariant::RandomSequence));
        loader.register("RandomSelector", |cfg| non_parallel(cfg, NonParallelVariant::RandomSelector));
        loader.register("Parallel", parallel);
        loader.register("BBCondition", bb_condition);
        loader.register("BBCooldown", bb_cooldown);
        loader.register("BBEntries", bb_entries);
        loader.register("Condition", condition);
        loader.register("Cooldown", cooldown);
        loader.register("Failure", |_| Ok(NodeKind::ForceResult(ForceResult::AlwaysFail)));
        loader.register("Succeeded", |_| Ok(NodeKind::ForceResult(ForceResult::AlwaysSucceed)));
        loader.register("Inverter", |_| Ok(NodeKind::ForceResult(ForceResult::Invert)));
        loader.register("Random", random);
        loader.register("Repeater", repeater);
        loader.register("Service", service);
        loader.register("TimeMax", |cfg| time_limit(cfg, false));
        loader.register("TimeMin", |cfg| time_limit(cfg, true));
        loader.register("WaitCondition", wait_condition);
        loader.register("Action", |_| Ok(NodeKind::Action(ActionConfig)));
        loader.register("Wait", wait);
        loader.register("WaitBB", wait_bb);
        loader.register("Subtree", subtree);
        loader.register("DynamicSubtree", dynamic_subtree);
        loader
    }
}

impl Default for ClassLoader {
    fn default() -> Self {
        Self::with_builtins()
    }
}

fn object<'a>(cfg: &'a NodeCfg) -> &'a BTreeMap<std::string::String, Value> {
    match &cfg.properties {
        Value::Object(fields) => fields,
        _ => {
            static EMPTY: BTreeMap<std::string::String, Value> = BTreeMap::new();
            &EMPTY
        }
    }
}

fn prop<'a>(cfg: &'a NodeCfg, key: &str) -> Option<&'a Value> {
    object(cfg).get(key)
}

fn duration_prop(cfg: &NodeCfg, key: &str, default: Duration) -> Duration {
    prop(cfg, key).and_then(Value::as_duration).unwrap_or(default)
}

fn bool_prop(cfg: &NodeCfg, key: &str, default: bool) -> bool {
    prop(cfg, key).and_then(Value::as_bool).unwrap_or(default)
}

fn string_prop(cfg: &NodeCfg, key: &str) -> Option<std::string::String> {
    prop(cfg, key).and_then(Value::as_str).map(std::string::ToString::to_string)
}

fn abort_mode_prop(cfg: &NodeCfg) -> AbortMode {
    match string_prop(cfg, "abortMode").as_deref() {
        Some("SelfAbort") => AbortMode::SelfAbort,
        Some("LowerPriority") => AbortMode::LowerPriority,
        Some("Both") => AbortMode::Both,
        _ => AbortMode::None,
    }
}

fn operator_prop(cfg: &NodeCfg, raw: Option<&str>) -> Result<Operator, Error> {
    match raw {
        None => Ok(Operator::IsEqual),
        Some("IsSet") => Ok(Operator::IsSet),
        Some("IsNotSet") => Ok(Operator::IsNotSet),
        Some("IsEqual") => Ok(Operator::IsEqual),
        Some("IsNotEqual") => Ok(Operator::IsNotEqual),
        Some("IsGt") => Ok(Operator::IsGt),
        Some("IsGte") => Ok(Operator::IsGte),
        Some("IsLt") => Ok(Operator::IsLt),
        Some("IsLte") => Ok(Operator::IsLte),
        Some(other) => Err(Error::BadProperty {
            node: ConstString::from(cfg.id.as_str()),
            class: ConstString::from(cfg.name.as_str()),
            message: std::format!("unsupported operator '{other}'"),
        }),
    }
}

fn root(cfg: &NodeCfg) -> Result<NodeKind, Error> {
    Ok(NodeKind::Root(RootConfig {
        once: bool_prop(cfg, "once", false),
        interval: duration_prop(cfg, "interval", Duration::from_millis(30)),
        loop_interval: duration_prop(cfg, "loopInterval", Duration::ZERO),
        loop_random_deviation: duration_prop(cfg, "loopRandomDeviation", Duration::ZERO),
    }))
}

fn non_parallel(cfg: &NodeCfg, variant: NonParallelVariant) -> Result<NodeKind, Error> {
    let weights = prop(cfg, "weights").and_then(Value::as_array).map(|items| items.iter().filter_map(Value::as_f64).collect());
    Ok(NodeKind::NonParallel(NonParallelConfig { variant, weights }))
}

fn parallel(cfg: &NodeCfg) -> Result<NodeKind, Error> {
    let success_policy = match string_prop(cfg, "successPolicy").as_deref() {
        Some("All") => SuccessPolicy::All,
        _ => SuccessPolicy::One,
    };
    let failure_policy = match string_prop(cfg, "failurePolicy").as_deref() {
        Some("One") => FailurePolicy::One,
        _ => FailurePolicy::All,
    };
    Ok(NodeKind::Parallel(Parallel { success_policy, failure_policy }))
}

fn bb_condition_config(cfg: &NodeCfg) -> Result<BbConditionConfig, Error> {
    let key = string_prop(cfg, "key").ok_or_else(|| Error::BadProperty {
        node: ConstString::from(cfg.id.as_str()),
        class: ConstString::from(cfg.name.as_str()),
        message: "missing 'key' property".into(),
    })?;
    let value = string_prop(cfg, "value").unwrap_or_default();
    let operator = operator_prop(cfg, string_prop(cfg, "operator").as_deref())?;
    Ok(BbConditionConfig { abort_mode: abort_mode_prop(cfg), key: ConstString::from(key), operator, value })
}

fn bb_condition(cfg: &NodeCfg) -> Result<NodeKind, Error> {
    Ok(NodeKind::BbCondition(bb_condition_config(cfg)?))
}

fn bb_cooldown(cfg: &NodeCfg) -> Result<NodeKind, Error> {
    Ok(NodeKind::Cooldown(CooldownConfig {
        window: duration_prop(cfg, "window", Duration::ZERO),
        window_key: string_prop(cfg, "windowKey").map(ConstString::from),
        start_after_decorated: bool_prop(cfg, "startAfterDecorated", false),
        reset_on_failure: bool_prop(cfg, "resetOnFailure", false),
        fail_on_cool_down: bool_prop(cfg, "failOnCoolDown", false),
        random_deviation: duration_prop(cfg, "randomDeviation", Duration::ZERO),
    }))
}

fn bb_entries(cfg: &NodeCfg) -> Result<NodeKind, Error> {
    let combinator = match string_prop(cfg, "combinator").as_deref() {
        Some("Or") => Combinator::Or,
        _ => Combinator::And,
    };
    let mut entries = std::vec::Vec::new();
    if let Some(items) = prop(cfg, "entries").and_then(Value::as_array) {
        for item in items {
            let Value::Object(fields) = item else { continue };
            let key = fields.get("key").and_then(Value::as_str).unwrap_or_default();
            let value = fields.get("value").and_then(Value::as_str).unwrap_or_default().into();
            let operator = operator_prop(cfg, fields.get("operator").and_then(Value::as_str))?;
            entries.push(BbConditionConfig { abort_mode: AbortMode::None, key: ConstString::from(key), operator, value });
        }
    }
    Ok(NodeKind::BbEntries(BbEntriesConfig { abort_mode: abort_mode_prop(cfg), combinator, entries }))
}

fn condition(cfg: &NodeCfg) -> Result<NodeKind, Error> {
    Ok(NodeKind::Condition(ConditionConfig {
        abort_mode: abort_mode_prop(cfg),
        interval: duration_prop(cfg, "interval", Duration::from_secs(1)),
        deviation: duration_prop(cfg, "deviation", Duration::ZERO),
    }))
}

fn random(cfg: &NodeCfg) -> Result<NodeKind, Error> {
    let probability = prop(cfg, "probability").and_then(Value::as_f64).unwrap_or(1.0);
    Ok(NodeKind::Random(RandomConfig { probability }))
}

fn cooldown(cfg: &NodeCfg) -> Result<NodeKind, Error> {
    Ok(NodeKind::Cooldown(CooldownConfig {
        window: duration_prop(cfg, "window", Duration::ZERO),
        window_key: None,
        start_after_decorated: bool_prop(cfg, "startAfterDecorated", false),
        reset_on_failure: bool_prop(cfg, "resetOnFailure", false),
        fail_on_cool_down: bool_prop(cfg, "failOnCoolDown", false),
        random_deviation: duration_prop(cfg, "randomDeviation", Duration::ZERO),
    }))
}

fn repeater(cfg: &NodeCfg) -> Result<NodeKind, Error> {
    let count = prop(cfg, "count").and_then(Value::as_f64).map(|n| n as u32);
    Ok(NodeKind::Repeater(RepeaterConfig { count }))
}

fn service(cfg: &NodeCfg) -> Result<NodeKind, Error> {
    Ok(NodeKind::Service(ServiceConfig {
        period: duration_prop(cfg, "period", Duration::from_secs(1)),
        deviation: duration_prop(cfg, "deviation", Duration::ZERO),
    }))
}

fn time_limit(cfg: &NodeCfg, is_minimum: bool) -> Result<NodeKind, Error> {
    Ok(NodeKind::TimeLimit(TimeLimitConfig { limit: duration_prop(cfg, "limit", Duration::ZERO), is_minimum }))
}

fn wait_condition(cfg: &NodeCfg) -> Result<NodeKind, Error> {
    Ok(NodeKind::WaitCondition(WaitConditionConfig { condition: bb_condition_config(cfg)? }))
}

fn wait(cfg: &NodeCfg) -> Result<NodeKind, Error> {
    Ok(NodeKind::Wait(WaitConfig {
        wait_time: duration_prop(cfg, "waitTime", Duration::ZERO),
        deviation: duration_prop(cfg, "randomDeviation", Duration::ZERO),
        forever: bool_prop(cfg, "forever", false),
        result_on_abort: bool_prop(cfg, "resultOnAbort", false),
    }))
}

fn wait_bb(cfg: &NodeCfg) -> Result<NodeKind, Error> {
    let key = string_prop(cfg, "key").ok_or_else(|| Error::BadProperty {
        node: ConstString::from(cfg.id.as_str()),
        class: ConstString::from(cfg.name.as_str()),
        message: "missing 'key' property".into(),
    })?;
    Ok(NodeKind::WaitBb(WaitBbConfig {
        duration_key: ConstString::from(key),
        deviation: duration_prop(cfg, "randomDeviation", Duration::ZERO),
        result_on_abort: bool_prop(cfg, "resultOnAbort", false),
    }))
}

fn subtree(cfg: &NodeCfg) -> Result<NodeKind, Error> {
    let tag = string_prop(cfg, "tag").unwrap_or_default();
    Ok(NodeKind::Subtree { tree_name: ConstString::from(tag) })
}

fn dynamic_subtree(cfg: &NodeCfg) -> Result<NodeKind, Error> {
    let run_mode = match string_prop(cfg, "runMode").as_deref() {
        Some("Continue") => DynamicRunMode::Continue,
        Some("Abort") => DynamicRunMode::Abort,
        _ => DynamicRunMode::Restart,
    };
    Ok(NodeKind::DynamicSubtree(DynamicSubtreeConfig { tree_name: ConstString::from(string_prop(cfg, "tag").unwrap_or_default()), run_mode }))
}
