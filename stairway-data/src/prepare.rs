//! Offline enrichment of raw destination tables.
//!
//! `prepare` turns the raw tables into the catalog the engines serve:
//!
//! 1. Drop destinations with fewer than `min_nr_tokens` tokens, together with
//!    their feature rows.
//! 2. Derive `weight = trunc(nr_tokens ^ power_factor)`.
//! 3. Derive `nr_tokens_norm` by min-max normalisation over the kept rows;
//!    every row gets `0.0` when all token counts are equal.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use stairway_core::{
    Catalog, DEFAULT_POWER_FACTOR, Destination, DestinationId, normalise, token_weight,
};

use crate::{LoadError, TablePaths, read_destinations, read_feature_profiles, read_features};

/// Tunables of the enrichment step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepareOptions {
    /// Destinations with fewer tokens are dropped.
    pub min_nr_tokens: u64,
    /// Exponent applied to `nr_tokens` to derive the sampling weight.
    pub power_factor: f64,
}

impl Default for PrepareOptions {
    fn default() -> Self {
        Self {
            min_nr_tokens: 1,
            power_factor: DEFAULT_POWER_FACTOR,
        }
    }
}

/// Row counts of one enrichment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrepareReport {
    /// Destinations kept.
    pub kept: usize,
    /// Destinations dropped for having too few tokens.
    pub dropped: usize,
}

#[expect(
    clippy::cast_precision_loss,
    reason = "token counts only feed a min-max normalisation"
)]
const fn token_count(destination: &Destination) -> f64 {
    destination.nr_tokens as f64
}

/// Scope `destinations` and derive their sampling columns.
///
/// # Examples
/// ```
/// use stairway_core::Destination;
/// use stairway_data::{PrepareOptions, prepare};
///
/// # fn main() -> Result<(), stairway_core::DestinationError> {
/// let mut empty = Destination::new(1, "Empty", 0.0, 0.0)?;
/// empty.nr_tokens = 0;
/// let mut rich = Destination::new(2, "Rich", 1.0, 1.0)?;
/// rich.nr_tokens = 16;
/// let mut small = Destination::new(3, "Small", 2.0, 2.0)?;
/// small.nr_tokens = 4;
///
/// let (kept, report) = prepare(vec![empty, rich, small], PrepareOptions::default());
/// assert_eq!(report.dropped, 1);
/// assert_eq!(kept.iter().map(|d| d.weight).collect::<Vec<_>>(), vec![64, 8]);
/// assert_eq!(kept.iter().map(|d| d.nr_tokens_norm).collect::<Vec<_>>(), vec![1.0, 0.0]);
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn prepare(
    destinations: Vec<Destination>,
    options: PrepareOptions,
) -> (Vec<Destination>, PrepareReport) {
    let total = destinations.len();
    let mut kept: Vec<Destination> = destinations
        .into_iter()
        .filter(|destination| destination.nr_tokens >= options.min_nr_tokens)
        .collect();
    let report = PrepareReport {
        kept: kept.len(),
        dropped: total - kept.len(),
    };
    if report.dropped > 0 {
        log::info!(
            "dropped {} destinations with fewer than {} tokens",
            report.dropped,
            options.min_nr_tokens
        );
    }

    let counts: Vec<f64> = kept.iter().map(token_count).collect();
    let norms = normalise(&counts).unwrap_or_else(|| {
        if !kept.is_empty() {
            log::warn!("token counts have no spread; nr_tokens_norm set to 0.0");
        }
        vec![0.0; kept.len()]
    });
    for (destination, norm) in kept.iter_mut().zip(norms) {
        destination.weight = token_weight(destination.nr_tokens, options.power_factor);
        destination.nr_tokens_norm = norm;
    }
    (kept, report)
}

/// Load the raw JSON tables, enrich them, and assemble a catalog.
///
/// Feature rows of dropped destinations are discarded.
///
/// # Errors
/// Returns [`LoadError`] when a table cannot be read or the enriched tables
/// violate the catalog invariants.
pub fn prepare_catalog(
    paths: &TablePaths,
    options: PrepareOptions,
) -> Result<(Catalog, PrepareReport), LoadError> {
    let (destinations, report) = prepare(read_destinations(&paths.destinations)?, options);
    let mut features = read_features(&paths.features)?;
    let kept: HashSet<DestinationId> = destinations.iter().map(|d| d.id).collect();
    features.retain_destinations(|id| kept.contains(&id));
    let profiles = read_feature_profiles(&paths.profiles)?;
    let catalog = Catalog::new(destinations, features, profiles)?;
    Ok((catalog, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn with_tokens(id: DestinationId, nr_tokens: u64) -> Destination {
        let mut destination =
            Destination::new(id, format!("d{id}"), 0.0, 0.0).expect("valid destination");
        destination.nr_tokens = nr_tokens;
        destination
    }

    #[rstest]
    #[case(1, vec![2, 3, 4])]
    #[case(50, vec![3, 4])]
    #[case(0, vec![1, 2, 3, 4])]
    fn scope_respects_minimum(#[case] min_nr_tokens: u64, #[case] expected: Vec<DestinationId>) {
        let rows = vec![
            with_tokens(1, 0),
            with_tokens(2, 10),
            with_tokens(3, 50),
            with_tokens(4, 90),
        ];
        let options = PrepareOptions {
            min_nr_tokens,
            ..PrepareOptions::default()
        };
        let (kept, report) = prepare(rows, options);
        let ids: Vec<DestinationId> = kept.iter().map(|d| d.id).collect();
        assert_eq!(ids, expected);
        assert_eq!(report.kept + report.dropped, 4);
    }

    #[rstest]
    fn weight_is_truncated_power() {
        let rows = vec![with_tokens(1, 10), with_tokens(2, 3)];
        let (kept, _) = prepare(rows, PrepareOptions::default());
        // 10^1.5 = 31.62.., 3^1.5 = 5.19..
        let weights: Vec<u64> = kept.iter().map(|d| d.weight).collect();
        assert_eq!(weights, vec![31, 5]);
    }

    #[rstest]
    fn equal_token_counts_normalise_to_zero() {
        let rows = vec![with_tokens(1, 7), with_tokens(2, 7)];
        let (kept, _) = prepare(rows, PrepareOptions::default());
        assert!(kept.iter().all(|d| d.nr_tokens_norm == 0.0));
        assert!(kept.iter().all(|d| d.weight == 18));
    }

    #[rstest]
    fn normalisation_uses_kept_rows_only() {
        let rows = vec![with_tokens(1, 0), with_tokens(2, 10), with_tokens(3, 30)];
        let (kept, _) = prepare(rows, PrepareOptions::default());
        let norms: Vec<f64> = kept.iter().map(|d| d.nr_tokens_norm).collect();
        assert_eq!(norms, vec![0.0, 1.0]);
    }

    #[rstest]
    fn empty_input_prepares_nothing() {
        let (kept, report) = prepare(Vec::new(), PrepareOptions::default());
        assert!(kept.is_empty());
        assert_eq!(report, PrepareReport::default());
    }
}
