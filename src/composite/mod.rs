//! Composite node classes: nodes with more than one child that decide which
//! of them run and in what order (spec §4.2).

pub mod parallel;
pub mod sequence;

pub use parallel::{FailurePolicy, Parallel, SuccessPolicy};

/// The four non-parallel composite classes share one execution shape
/// (`sequence.rs`'s `run`): they differ only in which result ends the run
/// early, and in what order children are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonParallelVariant {
    /// Stops (fails) on the first failing child; succeeds only if every
    /// child succeeds.
    Sequence,
    /// Stops (succeeds) on the first succeeding child; fails only if every
    /// child fails.
    Selector,
    /// `Sequence`, but children are visited in a fresh random permutation
    /// each run.
    RandomSequence,
    /// `Selector`, but children are visited in a fresh random permutation
    /// each run.
    RandomSelector,
}

impl NonParallelVariant {
    /// The result that ends the run early (a `Sequence` stops on failure, a
    /// `Selector` stops on success).
    #[must_use]
    pub const fn short_circuits_on(self) -> bool {
        matches!(self, Self::Selector | Self::RandomSelector)
    }

    /// Whether this variant draws a random child order on `start`.
    #[must_use]
    pub const fn is_random(self) -> bool {
        matches!(self, Self::RandomSequence | Self::RandomSelector)
    }
}

/// Per-class configuration for a `NonParallelVariant` node: optional
/// per-child weights, used only by the `Random*` variants' weighted draw.
#[derive(Debug, Clone)]
pub struct NonParallelConfig {
    /// The variant this node implements.
    pub variant: NonParallelVariant,
    /// Per-child weights for the weighted-without-replacement draw; `None`
    /// (or a variant that isn't random) means a plain Fisher-Yates shuffle.
    pub weights: Option<std::vec::Vec<f64>>,
}
