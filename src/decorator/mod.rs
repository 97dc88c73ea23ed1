//! Decorator node classes: exactly one child, whose result (or whose very
//! act of running) the decorator wraps, filters, or gates (spec §4.3).

pub mod bb_entries;
pub mod condition;
pub mod cooldown;
pub mod dynamic_subtree;
pub mod force_result;
pub mod observing_condition;
pub mod random;
pub mod repeater;
pub mod service;
pub mod subtree;
pub mod time_limit;

use crate::ConstString;

/// How an `ObservingCondition` (or subclass) reacts to its watched predicate
/// flipping while the decorator is running, or while it is inactive but a
/// lower-priority sibling is running (spec §4.3 "observing condition").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortMode {
    /// Never interrupt anything; the condition is only checked on `start`.
    None,
    /// Abort the decorator's own child if the condition turns false while
    /// running.
    SelfAbort,
    /// Abort lower-priority siblings' active branch if the condition turns
    /// true while this decorator is inactive.
    LowerPriority,
    /// Both `SelfAbort` and `LowerPriority`.
    Both,
}

impl AbortMode {
    #[must_use]
    pub(crate) const fn aborts_self(self) -> bool {
        matches!(self, Self::SelfAbort | Self::Both)
    }

    #[must_use]
    pub(crate) const fn aborts_lower_priority(self) -> bool {
        matches!(self, Self::LowerPriority | Self::Both)
    }

    #[must_use]
    pub(crate) const fn observes(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// A single `key OP value` predicate, as `BBCondition` evaluates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// The key is present at all.
    IsSet,
    /// The key is absent.
    IsNotSet,
    IsEqual,
    IsNotEqual,
    IsGt,
    IsGte,
    IsLt,
    IsLte,
}

impl Operator {
    /// Compare the blackboard's current plain-text value for a key against
    /// the configured target. Both sides are coerced to `f64` when possible;
    /// the four ordering operators require both sides to coerce and
    /// log-and-return-false otherwise, while `IsEqual`/`IsNotEqual` fall back
    /// to structural (string) equality when either side isn't numeric.
    #[must_use]
    pub fn matches(self, present: bool, stored: &str, target: &str) -> bool {
        match self {
            Self::IsSet => present,
            Self::IsNotSet => !present,
            Self::IsGt | Self::IsGte | Self::IsLt | Self::IsLte => {
                if !present {
                    return false;
                }
                match (stored.parse::<f64>(), target.parse::<f64>()) {
                    (Ok(a), Ok(b)) => match self {
                        Self::IsGt => a > b,
                        Self::IsGte => a >= b,
                        Self::IsLt => a < b,
                        Self::IsLte => a <= b,
                        _ => unreachable!(),
                    },
                    _ => {
                        tracing::error!(stored, target, "value cannot compare numerically");
                        false
                    }
                }
            }
            Self::IsEqual | Self::IsNotEqual => {
                if !present {
                    return false;
                }
                let equal = match (stored.parse::<f64>(), target.parse::<f64>()) {
                    (Ok(a), Ok(b)) => a == b,
                    _ => stored == target,
                };
                if self == Self::IsEqual {
                    equal
                } else {
                    !equal
                }
            }
        }
    }
}

#[cfg(test)]
mod operator_tests {
    use super::Operator;

    #[test]
    fn is_not_set_is_true_only_when_absent() {
        assert!(Operator::IsNotSet.matches(false, "", "x"));
        assert!(!Operator::IsNotSet.matches(true, "x", "x"));
    }

    #[test]
    fn ordering_operators_log_and_fail_on_non_numeric_operands() {
        assert!(!Operator::IsGt.matches(true, "ready", "0"));
        assert!(!Operator::IsLte.matches(true, "3", "not-a-number"));
    }

    #[test]
    fn equality_falls_back_to_structural_comparison_for_non_numeric_operands() {
        assert!(Operator::IsEqual.matches(true, "ready", "ready"));
        assert!(Operator::IsNotEqual.matches(true, "ready", "busy"));
    }

    #[test]
    fn equality_compares_numerically_when_both_operands_coerce() {
        assert!(Operator::IsEqual.matches(true, "1.0", "1"));
    }

    #[test]
    fn absent_key_never_matches_outside_is_not_set() {
        assert!(!Operator::IsEqual.matches(false, "", "ready"));
        assert!(!Operator::IsGt.matches(false, "", "0"));
    }
}

/// `BBCondition`: an observing condition over one blackboard key.
#[derive(Debug, Clone)]
pub struct BbConditionConfig {
    pub abort_mode: AbortMode,
    pub key: ConstString,
    pub operator: Operator,
    /// The comparison value, stored as its plain-text config form; compared
    /// against the key's `ToString` form, mirroring the teacher's
    /// `FromStr`/`ToString`-based blackboard value bound.
    pub value: std::string::String,
}

/// Logical combination used by `BBEntries`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    And,
    Or,
}

/// `BBEntries`: an observing condition over a *set* of keys (spec §10
/// supplement, grounded in `decorator/bbentries.go`).
#[derive(Debug, Clone)]
pub struct BbEntriesConfig {
    pub abort_mode: AbortMode,
    pub combinator: Combinator,
    pub entries: std::vec::Vec<BbConditionConfig>,
}

/// `Condition`: polls a delegate/script on a fixed period for as long as it
/// is being observed, and reacts to the result flipping like any other
/// observing condition (spec §10 supplement, grounded in `condition.go`,
/// which is a `Service`-flavoured `ObservingDecorator` rather than a
/// blackboard-key watcher).
#[derive(Debug, Clone, Copy)]
pub struct ConditionConfig {
    pub abort_mode: AbortMode,
    pub interval: std::time::Duration,
    pub deviation: std::time::Duration,
}

/// How a force-result decorator (`Failure`/`Succeeded`/`Inverter`) rewrites
/// its child's result, grounded in `decorator/failure.go`,
/// `decorator/succeeded.go`, `decorator/inverter.go`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceResult {
    AlwaysFail,
    AlwaysSucceed,
    Invert,
}

/// `Random`: a single-child decorator that starts its child with a
/// configured probability, otherwise fails immediately without running it
/// (spec §10 supplement, grounded in `decorator/random.go`).
#[derive(Debug, Clone, Copy)]
pub struct RandomConfig {
    pub probability: f64,
}

/// `WaitCondition`: like `Wait(forever=true)` but gated on a predicate
/// instead of a fixed duration (spec §10 supplement, grounded in
/// `decorator/waitcondition.go`). Its decorated "child" is implicit.
#[derive(Debug, Clone)]
pub struct WaitConditionConfig {
    pub condition: BbConditionConfig,
}

/// `Cooldown`/`BBCooldown`: blocks re-entry into its child for a fixed
/// window after the child last finished.
#[derive(Debug, Clone)]
pub struct CooldownConfig {
    pub window: std::time::Duration,
    /// `BBCooldown` only: re-read the window length from this key on every
    /// `start` instead of using a fixed `window`.
    pub window_key: Option<ConstString>,
    /// Count the window from when the child starts rather than when it
    /// finishes. `false` (the default) counts from the child's own finish.
    pub start_after_decorated: bool,
    /// Clear the cooldown immediately if the child fails, instead of making
    /// the next entry wait out the window anyway.
    pub reset_on_failure: bool,
    /// Finish with failure immediately on a `start` that lands mid-cooldown,
    /// instead of waiting quietly for the window to elapse before running.
    pub fail_on_cool_down: bool,
    /// Random jitter applied to the cooldown window on every timer schedule.
    pub random_deviation: std::time::Duration,
}

/// `Repeater`: re-runs its child up to `count` times (or forever, if `None`),
/// stopping early the first time the child fails.
#[derive(Debug, Clone, Copy)]
pub struct RepeaterConfig {
    pub count: Option<u32>,
}

/// `Service`: ticks a delegate/script on a fixed period for as long as its
/// child is running, independent of the child's own result.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub period: std::time::Duration,
    pub deviation: std::time::Duration,
}

/// `TimeMax`/`TimeMin`: bounds how long the child is allowed (`TimeMax`) or
/// required (`TimeMin`) to run.
#[derive(Debug, Clone, Copy)]
pub struct TimeLimitConfig {
    pub limit: std::time::Duration,
    pub is_minimum: bool,
}

/// How a `DynamicSubtree` reacts when it is re-triggered (re-started) while
/// its previous mount is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DynamicRunMode {
    /// Abort and unmount the current instance, then mount a fresh one.
    Restart,
    /// Leave the running instance alone.
    Continue,
    /// Abort and unmount, finishing with failure, without remounting.
    Abort,
}

/// `DynamicSubtree`: mounts a fresh clone of a named tree at `start`, and
/// re-mounts per `run_mode` on subsequent starts.
#[derive(Debug, Clone)]
pub struct DynamicSubtreeConfig {
    pub tree_name: ConstString,
    pub run_mode: DynamicRunMode,
}
