//! Answer explore requests: filter, rank or shuffle, paginate, annotate.
//!
//! The pipeline for one request:
//!
//! 1. Start from every destination in catalog order.
//! 2. Restrict to the requested country (case-insensitive exact match after
//!    trimming). An unmatched country leaves the set untouched.
//! 3. Apply the bounding box, unless the country matched.
//! 4. With profiles, rank by profile relevance; without, shuffle by
//!    popularity weight using the request seed.
//! 5. Slice `[offset, offset + n_results)` and attach the selected features
//!    to each destination.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    Catalog, Destination, ExploreQuery, FeatureSelection, QueryError, RankWeights,
    filter_on_geolocation, rank_and_filter, resolve_seed, select_features_with_profiles,
    weighted_shuffle,
};

/// Thresholds used to round large result counts down for display.
pub const MAX_PLACES_BUCKETS: [usize; 5] = [300, 1000, 5000, 10000, 20000];

/// Render a result count for display.
///
/// Counts up to the first bucket are shown verbatim. Larger counts are
/// replaced by the largest bucket below them followed by `+`, using `.` as
/// the thousands separator.
///
/// # Examples
/// ```
/// use stairway_core::prettify;
///
/// assert_eq!(prettify(250), "250");
/// assert_eq!(prettify(301), "300+");
/// assert_eq!(prettify(1500), "1.000+");
/// assert_eq!(prettify(50_000), "20.000+");
/// ```
#[must_use]
pub fn prettify(count: usize) -> String {
    MAX_PLACES_BUCKETS
        .iter()
        .rev()
        .find(|bucket| **bucket < count)
        .map_or_else(
            || count.to_string(),
            |bucket| format!("{}+", group_thousands(*bucket)),
        )
}

fn group_thousands(value: usize) -> String {
    let reversed: Vec<char> = value.to_string().chars().rev().collect();
    let groups: Vec<String> = reversed
        .chunks(3)
        .map(|group| group.iter().rev().collect())
        .rev()
        .collect();
    groups.join(".")
}

/// Return the items in `[offset, offset + n_results)`.
///
/// A window that starts past the end yields an empty vector.
///
/// # Examples
/// ```
/// use stairway_core::paginate;
///
/// assert_eq!(paginate(vec![1, 2, 3, 4], 1, 2), vec![2, 3]);
/// assert!(paginate(vec![1, 2], 5, 2).is_empty());
/// ```
#[must_use]
pub fn paginate<T>(items: Vec<T>, offset: usize, n_results: usize) -> Vec<T> {
    items.into_iter().skip(offset).take(n_results).collect()
}

/// A destination with its most relevant features attached.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DestinationRecord {
    /// Destination row, serialised inline.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub destination: Destination,
    /// Selected feature names, most relevant first.
    pub features: Vec<String>,
}

/// One page of explore results.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExploreResponse {
    /// Number of destinations that matched before pagination.
    #[cfg_attr(feature = "serde", serde(rename = "maxPlaces"))]
    pub max_places: usize,
    /// [`prettify`] of `max_places`.
    #[cfg_attr(feature = "serde", serde(rename = "maxPlacesText"))]
    pub max_places_text: String,
    /// The requested page.
    pub destinations: Vec<DestinationRecord>,
}

/// Explore engine bound to a catalog.
///
/// The engine holds no per-request state; one instance can serve any number
/// of concurrent requests.
#[derive(Debug, Clone, Copy)]
pub struct ExploreEngine<'c> {
    catalog: &'c Catalog,
    selection: FeatureSelection,
    weights: RankWeights,
}

impl<'c> ExploreEngine<'c> {
    /// Create an engine with the default feature selection and rank weights.
    #[must_use]
    pub fn new(catalog: &'c Catalog) -> Self {
        Self {
            catalog,
            selection: FeatureSelection::default(),
            weights: RankWeights::default(),
        }
    }

    /// Override how features are attached to results.
    #[must_use]
    pub const fn with_selection(mut self, selection: FeatureSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Override the profile ranking parameters.
    #[must_use]
    pub const fn with_rank_weights(mut self, weights: RankWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Answer an explore request.
    ///
    /// Unmatched filters and out-of-range pages produce empty results rather
    /// than errors.
    ///
    /// # Errors
    /// Returns [`QueryError`] when the query fails validation.
    pub fn explore(&self, query: &ExploreQuery) -> Result<ExploreResponse, QueryError> {
        query.validate()?;
        let subset = self.filter(query);
        let ordered = self.order(subset, query);
        let max_places = ordered.len();
        let destinations = paginate(ordered, query.offset, query.n_results)
            .into_iter()
            .map(|destination| self.record(destination, &query.profiles))
            .collect();
        Ok(ExploreResponse {
            max_places,
            max_places_text: prettify(max_places),
            destinations,
        })
    }

    fn filter(&self, query: &ExploreQuery) -> Vec<&'c Destination> {
        let all: Vec<&'c Destination> = self.catalog.destinations().iter().collect();
        if let Some(country) = query.country_filter() {
            let wanted = country.to_lowercase();
            let matched: Vec<&'c Destination> = all
                .iter()
                .copied()
                .filter(|destination| destination.country.to_lowercase() == wanted)
                .collect();
            if !matched.is_empty() {
                log::debug!("country {country:?} matched {} destinations", matched.len());
                return matched;
            }
            log::debug!("country {country:?} matched nothing; falling through");
        }
        if let Some(bbox) = &query.bbox {
            let inside = filter_on_geolocation(all, bbox);
            log::debug!("bounding box kept {} destinations", inside.len());
            return inside;
        }
        all
    }

    fn order(&self, subset: Vec<&'c Destination>, query: &ExploreQuery) -> Vec<&'c Destination> {
        if query.profiles.is_empty() {
            let seed = resolve_seed(query.seed);
            return weighted_shuffle(subset, |destination| destination.sampling_weight(), seed);
        }
        rank_and_filter(
            &subset,
            &query.profiles,
            self.catalog.features(),
            self.catalog.profiles(),
            self.weights,
        )
        .into_iter()
        .map(|row| row.destination)
        .collect()
    }

    fn record(&self, destination: &Destination, profiles: &[String]) -> DestinationRecord {
        DestinationRecord {
            destination: destination.clone(),
            features: select_features_with_profiles(
                destination.id,
                profiles,
                self.catalog.features(),
                self.catalog.profiles(),
                self.selection,
            ),
        }
    }
}
