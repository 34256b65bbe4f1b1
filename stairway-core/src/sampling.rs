//! Seeded, reproducible random orderings.
//!
//! The popularity shuffle is a weighted sample without replacement of the
//! whole input, computed with the exponential-key method: each item draws
//! `key = E / weight` with `E ~ Exp(1)` from a `ChaCha8` stream seeded by
//! the request, and items are sorted by ascending key. The same seed and the
//! same input order always give the same permutation, so consecutive pages of
//! a query never overlap.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Exp1};

/// Return `seed`, or a fresh random seed when none was supplied.
#[must_use]
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        let drawn = rand::random();
        log::debug!("no seed supplied; drew {drawn}");
        drawn
    })
}

/// Order `items` by a weighted random permutation.
///
/// Heavier items tend to come first. Items with a zero, negative, or
/// non-finite weight can never be drawn ahead of a positively weighted item
/// and trail the permutation in input order.
///
/// # Examples
/// ```
/// use stairway_core::weighted_shuffle;
///
/// let items = vec![("a", 1.0), ("b", 50.0), ("c", 0.0)];
/// let first = weighted_shuffle(items.clone(), |(_, w)| *w, 3);
/// let second = weighted_shuffle(items, |(_, w)| *w, 3);
/// assert_eq!(first, second);
/// assert_eq!(first.last().map(|(name, _)| *name), Some("c"));
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "exponential keys divide a unit draw by the weight"
)]
pub fn weighted_shuffle<T, F>(items: Vec<T>, weight: F, seed: u64) -> Vec<T>
where
    F: Fn(&T) -> f64,
{
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut keyed: Vec<(f64, T)> = items
        .into_iter()
        .map(|item| {
            let draw: f64 = Exp1.sample(&mut rng);
            let item_weight = weight(&item);
            let key = if item_weight.is_finite() && item_weight > 0.0 {
                draw / item_weight
            } else {
                f64::INFINITY
            };
            (key, item)
        })
        .collect();
    keyed.sort_by(|(left, _), (right, _)| left.total_cmp(right));
    keyed.into_iter().map(|(_, item)| item).collect()
}

/// Pick one item uniformly at random, reproducibly for a given seed.
#[must_use]
pub fn pick_uniform<T>(items: &[T], seed: u64) -> Option<&T> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    items.choose(&mut rng)
}
