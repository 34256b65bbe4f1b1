//! Facade crate for the Stairway destination engine.
//!
//! This crate re-exports the core domain types and engines, and exposes the
//! table loaders and catalog snapshots behind the `snapshot` feature.

#![forbid(unsafe_code)]

pub use stairway_core::{
    BoundingBox, Catalog, CatalogError, CatalogProvider, Destination, DestinationError,
    DestinationId, DestinationLookup, DestinationRecord, ExploreEngine, ExploreQuery,
    ExploreResponse, FeatureProfileMap, FeatureSelection, FeatureTable, FeatureTableError,
    NearbyEngine, NearbyQuery, NearbyResponse, QueryError, RankWeights, prettify,
};

#[cfg(feature = "snapshot")]
pub use stairway_data::{
    JsonCatalogProvider, LoadError, PrepareError, PrepareOptions, PrepareReport,
    SnapshotCatalogProvider, TablePaths, prepare_catalog, read_snapshot, write_snapshot,
};
