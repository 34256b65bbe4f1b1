//! [`CatalogProvider`] implementations over JSON tables and snapshots.

use camino::{Utf8Path, Utf8PathBuf};
use stairway_core::{Catalog, CatalogProvider};

use crate::{
    LoadError, PrepareOptions, TablePaths, prepare_catalog, read_destinations,
    read_feature_profiles, read_features, read_snapshot,
};

/// Load a catalog from the three JSON tables.
///
/// By default the tables are served as stored. With
/// [`JsonCatalogProvider::with_prepare`] the raw tables are enriched on load
/// instead, as the offline `prepare` step would.
#[derive(Debug, Clone)]
pub struct JsonCatalogProvider {
    paths: TablePaths,
    prepare: Option<PrepareOptions>,
}

impl JsonCatalogProvider {
    /// Serve the tables at `paths` as stored.
    #[must_use]
    pub const fn new(paths: TablePaths) -> Self {
        Self {
            paths,
            prepare: None,
        }
    }

    /// Enrich the tables with `options` while loading.
    #[must_use]
    pub const fn with_prepare(mut self, options: PrepareOptions) -> Self {
        self.prepare = Some(options);
        self
    }

    /// Table locations.
    #[must_use]
    pub const fn paths(&self) -> &TablePaths {
        &self.paths
    }
}

impl CatalogProvider for JsonCatalogProvider {
    type Error = LoadError;

    fn load(&self) -> Result<Catalog, Self::Error> {
        if let Some(options) = self.prepare {
            let (catalog, _) = prepare_catalog(&self.paths, options)?;
            return Ok(catalog);
        }
        let destinations = read_destinations(&self.paths.destinations)?;
        let features = read_features(&self.paths.features)?;
        let profiles = read_feature_profiles(&self.paths.profiles)?;
        Ok(Catalog::new(destinations, features, profiles)?)
    }
}

/// Load a catalog from a snapshot written by `prepare`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotCatalogProvider {
    path: Utf8PathBuf,
}

impl SnapshotCatalogProvider {
    /// Read the snapshot at `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Snapshot location.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl CatalogProvider for SnapshotCatalogProvider {
    type Error = LoadError;

    fn load(&self) -> Result<Catalog, Self::Error> {
        read_snapshot(&self.path)
    }
}
