//! `Sequence`/`Selector`/`RandomSequence`/`RandomSelector`: the non-parallel
//! composite base (spec §4.2 "Non-parallel base").
//!
//! All four classes share one shape: visit children in some order, one
//! active at a time, and stop early on the result that matches the
//! variant's short-circuit rule. The `Random*` variants differ only in which
//! order `start` draws.

use super::NonParallelVariant;
use crate::blackboard::CompositeMemory;
use crate::node::Action;
use crate::util::shuffle;
use crate::ConstString;

/// Draw (or assign, for the non-random variants) this run's child-visit
/// order and start the first child.
pub fn on_start(
    variant: NonParallelVariant,
    weights: Option<&[f64]>,
    children: &[ConstString],
    memory: &mut CompositeMemory,
) -> std::vec::Vec<Action> {
    memory.children_order = if variant.is_random() {
        weights.map_or_else(|| shuffle::fisher_yates(children.len()), |w| shuffle::weighted_without_replacement(w, children.len()))
    } else {
        (0..children.len()).collect()
    };
    memory.current_index = 0;
    if children.is_empty() {
        // An empty Sequence vacuously succeeds; an empty Selector vacuously fails.
        return std::vec![Action::Finish(!variant.short_circuits_on())];
    }
    std::vec![Action::StartChild(children[memory.children_order[0]].clone())]
}

/// Advance past a finished child, short-circuiting or moving to the next one.
pub fn on_child_finished(
    variant: NonParallelVariant,
    children: &[ConstString],
    succeeded: bool,
    memory: &mut CompositeMemory,
) -> std::vec::Vec<Action> {
    if succeeded == variant.short_circuits_on() {
        return std::vec![Action::Finish(succeeded)];
    }
    // `wrapping_add` rather than a plain `+=`: `abort_lower_priority_than` may
    // have set `current_index` to `usize::MAX` (its "-1" sentinel) so that
    // this increment lands back on index 0.
    memory.current_index = memory.current_index.wrapping_add(1);
    if memory.current_index >= children.len() {
        // Ran out of children without short-circuiting: the opposite result.
        return std::vec![Action::Finish(!variant.short_circuits_on())];
    }
    let next = children[memory.children_order[memory.current_index]].clone();
    std::vec![Action::StartChild(next)]
}

/// An abort simply forwards to whichever child is currently active; the
/// composite itself finishes once that child reports back through
/// `on_child_finished` (spec: aborting a composite aborts its one active
/// branch, not every child at once, unlike `Parallel`).
pub fn on_abort(children: &[ConstString], memory: &CompositeMemory) -> std::vec::Vec<Action> {
    children
        .get(memory.children_order.get(memory.current_index).copied().unwrap_or(usize::MAX))
        .map_or_else(std::vec::Vec::new, |child| std::vec![Action::AbortChild(child.clone())])
}
