//! Rank destinations by how well they match a set of interest profiles.
//!
//! The pipeline runs in a fixed order:
//!
//! 1. `profile_weight` = sum of the destination's in-scope feature scores.
//! 2. `profile_weight_norm` = min-max normalisation of `profile_weight` over
//!    the subset being ranked (not the whole catalog).
//! 3. Drop rows whose *unnormalised* `profile_weight` is not above
//!    `weight_threshold`.
//! 4. `sort_weight = nr_tokens_norm + weight_factor * profile_weight_norm`,
//!    sorted descending.
//!
//! Normalising before thresholding means the minimum and maximum come from
//! rows that may later be dropped. Reordering the steps changes which
//! destinations survive.

use std::collections::BTreeSet;

use crate::{
    Destination, DestinationId, FeatureProfileMap, FeatureTable, select_in_scope_features,
};

/// Blend and cut-off parameters for profile ranking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankWeights {
    /// Multiplier applied to the normalised profile weight.
    pub weight_factor: f64,
    /// Rows must have an unnormalised profile weight strictly above this.
    pub weight_threshold: f64,
}

impl Default for RankWeights {
    fn default() -> Self {
        Self {
            weight_factor: 1.5,
            weight_threshold: 1.0,
        }
    }
}

/// A destination annotated with its ranking columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedDestination<'a> {
    /// Ranked destination.
    pub destination: &'a Destination,
    /// Sum of in-scope feature scores.
    pub profile_weight: f64,
    /// Profile weight normalised over the ranked subset; `None` when the
    /// subset has no spread to normalise.
    pub profile_weight_norm: Option<f64>,
    /// Final sort key; `None` when the profile weight could not be
    /// normalised.
    pub sort_weight: Option<f64>,
}

/// Sum of a destination's scores over the in-scope features.
fn profile_weight(id: DestinationId, in_scope: &BTreeSet<String>, features: &FeatureTable) -> f64 {
    features
        .scores_of(id)
        .filter(|(name, _)| in_scope.contains(*name))
        .map(|(_, score)| score)
        .sum()
}

/// Pair every destination with its profile weight.
///
/// The weight is `0.0` when no profile is requested or the destination has
/// no in-scope scores.
#[must_use]
pub fn add_profile_weight<'a>(
    subset: &[&'a Destination],
    profiles: &[String],
    features: &FeatureTable,
    profile_map: &FeatureProfileMap,
) -> Vec<(&'a Destination, f64)> {
    let in_scope = select_in_scope_features(profiles, profile_map);
    subset
        .iter()
        .map(|destination| {
            (
                *destination,
                profile_weight(destination.id, &in_scope, features),
            )
        })
        .collect()
}

/// Min-max normalise `values` into `0.0..=1.0`.
///
/// Returns `None` for an empty slice or when every value is equal, where
/// the normalisation is undefined.
///
/// # Examples
/// ```
/// use stairway_core::normalise;
///
/// assert_eq!(normalise(&[1.0, 3.0, 2.0]), Some(vec![0.0, 1.0, 0.5]));
/// assert_eq!(normalise(&[4.0, 4.0]), None);
/// assert_eq!(normalise(&[]), None);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "min-max normalisation divides by the value range"
)]
pub fn normalise(values: &[f64]) -> Option<Vec<f64>> {
    let min = values.iter().copied().reduce(f64::min)?;
    let max = values.iter().copied().reduce(f64::max)?;
    let range = max - min;
    if !range.is_finite() || range <= 0.0 {
        return None;
    }
    Some(values.iter().map(|value| (value - min) / range).collect())
}

/// Rank `subset` by profile relevance and popularity.
///
/// Rows at or below `weight_threshold` are dropped. When the subset has no
/// spread in profile weight the surviving rows keep their input order and
/// carry no sort weight.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "sort weight blends two normalised scores"
)]
pub fn rank_and_filter<'a>(
    subset: &[&'a Destination],
    profiles: &[String],
    features: &FeatureTable,
    profile_map: &FeatureProfileMap,
    weights: RankWeights,
) -> Vec<RankedDestination<'a>> {
    let weighted = add_profile_weight(subset, profiles, features, profile_map);
    let raw: Vec<f64> = weighted.iter().map(|(_, weight)| *weight).collect();
    let normalised = normalise(&raw);
    if normalised.is_none() && !weighted.is_empty() {
        log::warn!(
            "profile weights of {} destinations have no spread; keeping input order",
            weighted.len()
        );
    }

    let mut ranked: Vec<RankedDestination<'a>> = weighted
        .into_iter()
        .enumerate()
        .map(|(position, (destination, profile_weight))| {
            let profile_weight_norm = normalised
                .as_ref()
                .and_then(|values| values.get(position))
                .copied();
            RankedDestination {
                destination,
                profile_weight,
                profile_weight_norm,
                sort_weight: profile_weight_norm
                    .map(|norm| destination.nr_tokens_norm + weights.weight_factor * norm),
            }
        })
        .filter(|row| row.profile_weight > weights.weight_threshold)
        .collect();

    ranked.sort_by(|a, b| match (a.sort_weight, b.sort_weight) {
        (Some(left), Some(right)) => right.total_cmp(&left),
        _ => std::cmp::Ordering::Equal,
    });
    ranked
}
