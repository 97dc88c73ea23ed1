//! Ordering helpers for `RandomSequence`/`RandomSelector`.

use rand::Rng;
use rand::seq::SliceRandom;

/// Fisher-Yates shuffle of `0..len`, used when a `RandomSequence`/`RandomSelector`
/// node has no per-child weights configured.
#[must_use]
pub fn fisher_yates(len: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    order.shuffle(&mut rand::rng());
    order
}

/// Draw all of `0..weights.len()` without replacement, each draw's probability
/// proportional to its remaining weight — a cumulative-weight binary search
/// repeated after removing the drawn index, as `wrand`/`composite/random.go`
/// do it.
///
/// Weights are padded with `1.0` if shorter than the child count and clamped
/// to a minimum of `0.0`; an all-zero remainder falls back to uniform draws
/// among the untaken indices.
#[must_use]
pub fn weighted_without_replacement(weights: &[f64], child_count: usize) -> Vec<usize> {
    let mut w: Vec<f64> = (0..child_count)
        .map(|i| weights.get(i).copied().unwrap_or(1.0).max(0.0))
        .collect();
    let mut remaining: Vec<usize> = (0..child_count).collect();
    let mut order = Vec::with_capacity(child_count);
    let mut rng = rand::rng();

    while !remaining.is_empty() {
        let total: f64 = remaining.iter().map(|&i| w[i]).sum();
        let pick = if total <= 0.0 {
            rng.random_range(0..remaining.len())
        } else {
            let target = rng.random_range(0.0..total);
            let mut cumulative = 0.0;
            let mut chosen = remaining.len() - 1;
            for (pos, &idx) in remaining.iter().enumerate() {
                cumulative += w[idx];
                if target < cumulative {
                    chosen = pos;
                    break;
                }
            }
            chosen
        };
        let idx = remaining.remove(pick);
        w[idx] = 0.0;
        order.push(idx);
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fisher_yates_is_a_permutation() {
        let order = fisher_yates(6);
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn weighted_draw_is_a_permutation_regardless_of_weights() {
        let order = weighted_without_replacement(&[10.0, 0.0, 5.0], 3);
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2]);
    }

    #[test]
    fn missing_weights_pad_to_one() {
        let order = weighted_without_replacement(&[1.0], 4);
        assert_eq!(order.len(), 4);
    }

    #[test]
    fn all_zero_weights_still_produce_full_permutation() {
        let order = weighted_without_replacement(&[0.0, 0.0, 0.0], 3);
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2]);
    }
}
