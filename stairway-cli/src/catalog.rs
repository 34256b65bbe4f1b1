//! Locate and load the catalog a query command serves.
//!
//! An explicit `--catalog` snapshot wins. Otherwise the data directory is
//! searched for `catalog.bin`, falling back to the raw JSON tables, which are
//! enriched on load.

use camino::{Utf8Path, Utf8PathBuf};
use stairway_core::{Catalog, CatalogProvider};
use stairway_data::{JsonCatalogProvider, PrepareOptions, SnapshotCatalogProvider, TablePaths};

use crate::CliError;

pub(crate) const ARG_CATALOG: &str = "catalog";
pub(crate) const ARG_DATA_DIR: &str = "data-dir";

pub(crate) const SNAPSHOT_FILE: &str = "catalog.bin";
pub(crate) const DESTINATIONS_FILE: &str = "destinations.json";
pub(crate) const FEATURES_FILE: &str = "features.json";
pub(crate) const PROFILES_FILE: &str = "feature_profiles.json";

/// Where a query command reads its catalog from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CatalogSource {
    Snapshot(Utf8PathBuf),
    Tables(TablePaths),
}

impl CatalogSource {
    pub(crate) fn resolve(
        catalog: Option<Utf8PathBuf>,
        data_dir: Option<Utf8PathBuf>,
    ) -> Result<Self, CliError> {
        if let Some(snapshot) = catalog {
            require_existing(&snapshot, ARG_CATALOG)?;
            return Ok(Self::Snapshot(snapshot));
        }
        let dir = data_dir.unwrap_or_else(|| Utf8PathBuf::from("."));
        let snapshot = dir.join(SNAPSHOT_FILE);
        let inspect_error = |source| CliError::InspectSourcePath {
            field: ARG_DATA_DIR,
            path: snapshot.clone(),
            source,
        };
        let has_snapshot = stairway_data::fs::is_file(&snapshot).map_err(inspect_error)?;
        if has_snapshot {
            return Ok(Self::Snapshot(snapshot));
        }
        let paths = table_paths(&dir);
        require_existing(&paths.destinations, ARG_DATA_DIR)?;
        require_existing(&paths.features, ARG_DATA_DIR)?;
        require_existing(&paths.profiles, ARG_DATA_DIR)?;
        Ok(Self::Tables(paths))
    }

    pub(crate) fn load(&self) -> Result<Catalog, CliError> {
        let loaded = match self {
            Self::Snapshot(path) => SnapshotCatalogProvider::new(path.clone()).load(),
            Self::Tables(paths) => JsonCatalogProvider::new(paths.clone())
                .with_prepare(PrepareOptions::default())
                .load(),
        };
        let catalog = loaded.map_err(CliError::LoadCatalog)?;
        log::info!("serving {} destinations", catalog.len());
        Ok(catalog)
    }
}

/// Default table locations inside `dir`.
pub(crate) fn table_paths(dir: &Utf8Path) -> TablePaths {
    TablePaths {
        destinations: dir.join(DESTINATIONS_FILE),
        features: dir.join(FEATURES_FILE),
        profiles: dir.join(PROFILES_FILE),
    }
}

pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match stairway_data::fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}
