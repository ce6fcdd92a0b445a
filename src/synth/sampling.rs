//! Random draw primitives shared by every generator
//!
//! All draws go through the single run RNG; nothing here touches OS entropy.
//! Weight tables are normalized by their actual sum at draw time, so tables
//! that do not add up to 100 are still valid input.

use crate::config::{Range2, WeightTable};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::Rng;

/// Weight-proportional draw from a table. Zero-weight entries are never
/// chosen. Returns `None` for an empty table or all-zero weights.
pub fn weighted_choice<'a>(rng: &mut StdRng, table: &'a WeightTable) -> Option<&'a str> {
    let total: u64 = table.values().map(|w| *w as u64).sum();
    if total == 0 {
        return None;
    }
    let mut draw = rng.gen_range(0..total);
    for (key, weight) in table {
        let w = *weight as u64;
        if draw < w {
            return Some(key.as_str());
        }
        draw -= w;
    }
    None
}

/// Weight-proportional index draw from a parallel weight slice.
pub fn weighted_index(rng: &mut StdRng, weights: &[u32]) -> Option<usize> {
    let total: u64 = weights.iter().map(|w| *w as u64).sum();
    if total == 0 {
        return None;
    }
    let mut draw = rng.gen_range(0..total);
    for (i, weight) in weights.iter().enumerate() {
        let w = *weight as u64;
        if draw < w {
            return Some(i);
        }
        draw -= w;
    }
    None
}

/// Bernoulli draw governed by a percentage. Values of 100 and above always
/// succeed.
pub fn chance(rng: &mut StdRng, percentage: u32) -> bool {
    if percentage == 0 {
        return false;
    }
    if percentage >= 100 {
        return true;
    }
    rng.gen_range(0..100) < percentage
}

/// Draw an integer from an inclusive `[low, high]` range. A reversed range
/// collapses to its low bound.
pub fn in_range(rng: &mut StdRng, range: Range2) -> u32 {
    let [low, high] = range;
    if high <= low {
        return low;
    }
    rng.gen_range(low..=high)
}

/// Sample `amount` distinct positions from `0..len`, capped at `len`.
pub fn sample_indices(rng: &mut StdRng, len: usize, amount: usize) -> Vec<usize> {
    let amount = amount.min(len);
    index::sample(rng, len, amount).into_vec()
}

/// Sample `amount` distinct elements from a slice, capped at its length.
pub fn sample<'a, T>(rng: &mut StdRng, items: &'a [T], amount: usize) -> Vec<&'a T> {
    sample_indices(rng, items.len(), amount)
        .into_iter()
        .map(|i| &items[i])
        .collect()
}

/// Pick one element of a slice uniformly.
pub fn pick<'a, T>(rng: &mut StdRng, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let i = rng.gen_range(0..items.len());
    Some(&items[i])
}
