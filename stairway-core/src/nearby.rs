//! Answer nearby requests.
//!
//! Proximity picks a fixed pool of candidates around the reference place;
//! popularity weight then decides their order, so repeated requests with
//! different seeds surface different neighbours.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Catalog, Destination, NearbyQuery, resolve_seed, sort_by_distance, weighted_shuffle};

/// Number of nearest destinations considered before re-sampling.
pub const CANDIDATE_POOL_SIZE: usize = 30;

/// Destinations near a reference place.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NearbyResponse {
    /// Neighbours in popularity-sampled order.
    pub destinations: Vec<Destination>,
}

/// Nearby engine bound to a catalog.
#[derive(Debug, Clone, Copy)]
pub struct NearbyEngine<'c> {
    catalog: &'c Catalog,
}

impl<'c> NearbyEngine<'c> {
    /// Create an engine over `catalog`.
    #[must_use]
    pub const fn new(catalog: &'c Catalog) -> Self {
        Self { catalog }
    }

    /// Answer a nearby request.
    ///
    /// A missing or unknown `place_id` yields an empty response.
    ///
    /// # Examples
    /// ```
    /// use stairway_core::{Catalog, Destination, FeatureProfileMap, FeatureTable};
    /// use stairway_core::{NearbyEngine, NearbyQuery};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let catalog = Catalog::new(
    ///     vec![
    ///         Destination::new(1, "Delft", 52.01, 4.36)?.with_nr_tokens(50),
    ///         Destination::new(2, "Leiden", 52.16, 4.49)?.with_nr_tokens(80),
    ///     ],
    ///     FeatureTable::default(),
    ///     FeatureProfileMap::new(),
    /// )?;
    /// let engine = NearbyEngine::new(&catalog);
    /// let response = engine.nearby(&NearbyQuery::new(1).with_seed(4));
    /// assert_eq!(response.destinations.len(), 1);
    /// assert!(engine.nearby(&NearbyQuery::from_raw_id("delft")).destinations.is_empty());
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn nearby(&self, query: &NearbyQuery) -> NearbyResponse {
        let Some(place_id) = query.place_id else {
            log::debug!("nearby request without a usable place id");
            return NearbyResponse::default();
        };
        let Some(ranked) = sort_by_distance(self.catalog.destinations(), place_id) else {
            log::debug!("nearby request for unknown place {place_id}");
            return NearbyResponse::default();
        };
        let pool: Vec<&Destination> = ranked
            .into_iter()
            .take(CANDIDATE_POOL_SIZE)
            .map(|row| row.destination)
            .collect();
        let seed = resolve_seed(query.seed);
        let mut shuffled =
            weighted_shuffle(pool, |destination| destination.sampling_weight(), seed);
        shuffled.truncate(query.n_results);
        let destinations = shuffled.into_iter().cloned().collect();
        NearbyResponse { destinations }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DestinationId, FeatureProfileMap, FeatureTable};
    use rstest::{fixture, rstest};

    /// A row of destinations along the equator, one degree apart.
    #[fixture]
    fn equator() -> Catalog {
        let destinations = (0..40_u32)
            .map(|step| {
                Destination::new(u64::from(step), format!("p{step}"), 0.0, f64::from(step))
                    .expect("valid destination")
                    .with_nr_tokens(100)
            })
            .collect();
        Catalog::new(
            destinations,
            FeatureTable::default(),
            FeatureProfileMap::new(),
        )
        .expect("valid catalog")
    }

    fn ids(response: &NearbyResponse) -> Vec<DestinationId> {
        response.destinations.iter().map(|d| d.id).collect()
    }

    #[rstest]
    fn unknown_place_is_empty(equator: Catalog) {
        let response = NearbyEngine::new(&equator).nearby(&NearbyQuery::new(999));
        assert_eq!(response, NearbyResponse::default());
    }

    #[rstest]
    fn malformed_id_is_empty(equator: Catalog) {
        let response = NearbyEngine::new(&equator).nearby(&NearbyQuery::from_raw_id("x1"));
        assert!(response.destinations.is_empty());
    }

    #[rstest]
    fn results_come_from_the_candidate_pool(equator: Catalog) {
        let query = NearbyQuery::new(0).with_n_results(50).with_seed(8);
        let response = NearbyEngine::new(&equator).nearby(&query);
        let found = ids(&response);
        assert_eq!(found.len(), CANDIDATE_POOL_SIZE);
        assert!(!found.contains(&0));
        assert!(found.iter().all(|id| (1..=30).contains(id)));
    }

    #[rstest]
    fn truncates_to_n_results(equator: Catalog) {
        let query = NearbyQuery::new(20).with_n_results(5).with_seed(8);
        let response = NearbyEngine::new(&equator).nearby(&query);
        assert_eq!(response.destinations.len(), 5);
    }

    #[rstest]
    fn seed_makes_order_reproducible(equator: Catalog) {
        let engine = NearbyEngine::new(&equator);
        let query = NearbyQuery::new(10).with_seed(77);
        assert_eq!(ids(&engine.nearby(&query)), ids(&engine.nearby(&query)));
    }

    #[rstest]
    fn zero_results_requested(equator: Catalog) {
        let query = NearbyQuery::new(10).with_n_results(0).with_seed(1);
        let response = NearbyEngine::new(&equator).nearby(&query);
        assert!(response.destinations.is_empty());
    }
}
