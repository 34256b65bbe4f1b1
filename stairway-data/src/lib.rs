//! Table providers for the Stairway destination engine.
//!
//! This crate owns every piece of I/O the engine needs:
//!
//! - reading the destination, feature score, and feature profile tables from
//!   JSON ([`read_destinations`], [`read_features`], [`read_feature_profiles`]);
//! - the offline enrichment step that scopes destinations and derives their
//!   sampling weights ([`prepare`], [`prepare_catalog`]);
//! - the binary catalog snapshot written by `prepare` and read at start-up
//!   ([`write_snapshot`], [`read_snapshot`]);
//! - [`CatalogProvider`](stairway_core::CatalogProvider) implementations for
//!   both sources ([`JsonCatalogProvider`], [`SnapshotCatalogProvider`]).
//!
//! Paths are UTF-8 (`camino`) and files are opened through `cap-std`.

#![forbid(unsafe_code)]

mod error;
pub mod fs;
mod json;
mod prepare;
mod provider;
mod snapshot;

pub use error::{LoadError, PrepareError};
pub use json::{
    FeatureProfileRecord, FeatureRowRecord, FeatureTableRecord, TablePaths, read_destinations,
    read_feature_profiles, read_features,
};
pub use prepare::{PrepareOptions, PrepareReport, prepare, prepare_catalog};
pub use provider::{JsonCatalogProvider, SnapshotCatalogProvider};
pub use snapshot::{SNAPSHOT_MAGIC, SNAPSHOT_VERSION, read_snapshot, write_snapshot};
