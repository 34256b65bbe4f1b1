//! Core domain types and ranking engines for the Stairway destination API.
//!
//! The crate is a pure, synchronous computation layer over an immutable
//! [`Catalog`] of destinations and feature scores. It answers three kinds of
//! request:
//!
//! - **Explore**: filter by country or bounding box, rank by interest
//!   profiles or shuffle by popularity weight, then paginate
//!   ([`ExploreEngine`]).
//! - **Nearby**: order destinations by great-circle distance from a reference
//!   place and re-sample the closest candidates by popularity
//!   ([`NearbyEngine`]).
//! - **Lookup**: fetch a single destination (or a random one) with its most
//!   relevant features attached ([`DestinationLookup`]).
//!
//! Loading the catalog is the job of a [`CatalogProvider`]; nothing in this
//! crate performs I/O or mutates shared state, so a single catalog can be
//! shared across threads behind an `Arc`.
//!
//! # Examples
//!
//! ```
//! use stairway_core::{
//!     Catalog, Destination, ExploreEngine, ExploreQuery, FeatureProfileMap, FeatureTable,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let destinations = vec![
//!     Destination::new(1, "Amsterdam", 52.37, 4.90)?.with_nr_tokens(400),
//!     Destination::new(2, "Utrecht", 52.09, 5.12)?.with_nr_tokens(100),
//! ];
//! let catalog = Catalog::new(destinations, FeatureTable::default(), FeatureProfileMap::new())?;
//!
//! let query = ExploreQuery {
//!     seed: Some(7),
//!     ..ExploreQuery::default()
//! };
//! let response = ExploreEngine::new(&catalog).explore(&query)?;
//! assert_eq!(response.max_places, 2);
//! assert_eq!(response.destinations.len(), 2);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod bbox;
pub mod catalog;
pub mod destination;
pub mod distance;
pub mod explore;
pub mod feature;
pub mod lookup;
pub mod nearby;
pub mod query;
pub mod ranking;
pub mod sampling;
pub mod scoring;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use bbox::{BoundingBox, filter_on_geolocation};
pub use catalog::{Catalog, CatalogError, CatalogProvider};
pub use destination::{
    DEFAULT_POWER_FACTOR, Destination, DestinationError, DestinationId, parse_destination_id,
    token_weight,
};
pub use distance::{DistanceRanked, EARTH_RADIUS_KM, haversine_km, sort_by_distance};
pub use explore::{
    DestinationRecord, ExploreEngine, ExploreResponse, MAX_PLACES_BUCKETS, paginate, prettify,
};
pub use feature::{FeatureProfileMap, FeatureTable, FeatureTableError};
pub use lookup::DestinationLookup;
pub use nearby::{CANDIDATE_POOL_SIZE, NearbyEngine, NearbyResponse};
pub use query::{DEFAULT_N_RESULTS, ExploreQuery, NearbyQuery, QueryError};
pub use ranking::{RankWeights, RankedDestination, add_profile_weight, normalise, rank_and_filter};
pub use sampling::{pick_uniform, resolve_seed, weighted_shuffle};
pub use scoring::{
    FeatureSelection, select_features_with_profiles, select_in_scope_features, select_top_features,
};
