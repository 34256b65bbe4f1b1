//! JSON layouts of the destination, feature, and profile tables.

use std::collections::BTreeMap;
use std::io::BufReader;

use camino::{Utf8Path, Utf8PathBuf};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use stairway_core::{
    Destination, DestinationId, FeatureProfileMap, FeatureTable, FeatureTableError,
};

use crate::{LoadError, fs};

/// Locations of the three JSON tables making up a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TablePaths {
    /// Array of destination rows.
    pub destinations: Utf8PathBuf,
    /// Feature score table.
    pub features: Utf8PathBuf,
    /// Feature-to-profile membership table.
    pub profiles: Utf8PathBuf,
}

/// On-disk layout of the feature score table.
///
/// ```json
/// {
///   "features": ["hiking", "museums"],
///   "rows": [{ "destination_id": 1, "scores": [0.8, 0.1] }]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureTableRecord {
    /// Feature names in declaration order.
    pub features: Vec<String>,
    /// One row of scores per destination.
    pub rows: Vec<FeatureRowRecord>,
}

/// Scores of one destination, aligned with [`FeatureTableRecord::features`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRowRecord {
    /// Destination the scores belong to.
    pub destination_id: DestinationId,
    /// One score per declared feature.
    pub scores: Vec<f64>,
}

impl FeatureTableRecord {
    /// Build the in-memory table.
    ///
    /// # Errors
    /// Returns [`FeatureTableError`] for duplicate feature names, ragged
    /// rows, or non-finite scores.
    pub fn into_table(self) -> Result<FeatureTable, FeatureTableError> {
        let mut table = FeatureTable::new(self.features)?;
        for row in self.rows {
            table.insert_row(row.destination_id, row.scores)?;
        }
        Ok(table)
    }

    /// Describe an in-memory table, rows ordered by destination id.
    #[must_use]
    pub fn from_table(table: &FeatureTable) -> Self {
        let mut ids: Vec<DestinationId> = table.destination_ids().collect();
        ids.sort_unstable();
        let rows = ids
            .into_iter()
            .filter_map(|id| {
                table.row(id).map(|scores| FeatureRowRecord {
                    destination_id: id,
                    scores: scores.to_vec(),
                })
            })
            .collect();
        Self {
            features: table.features().to_vec(),
            rows,
        }
    }
}

/// Membership of one feature, as weights per profile.
///
/// A feature belongs to every profile whose weight is greater than zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureProfileRecord {
    /// Feature name.
    pub feature: String,
    /// Weight of the feature in each profile.
    pub profiles: BTreeMap<String, f64>,
}

impl FeatureProfileRecord {
    /// Describe every membership of `map`, one record per feature with weight
    /// `1.0` for each profile.
    #[must_use]
    pub fn from_map(map: &FeatureProfileMap) -> Vec<Self> {
        map.iter()
            .map(|(feature, profiles)| Self {
                feature: feature.to_owned(),
                profiles: profiles
                    .iter()
                    .map(|profile| (profile.clone(), 1.0))
                    .collect(),
            })
            .collect()
    }
}

fn read_json<T: DeserializeOwned>(path: &Utf8Path) -> Result<T, LoadError> {
    let file = fs::open_file(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Read the destination table.
///
/// Rows are returned in file order; validation happens when the catalog is
/// assembled.
///
/// # Errors
/// Returns [`LoadError`] when the file cannot be read or parsed.
pub fn read_destinations(path: &Utf8Path) -> Result<Vec<Destination>, LoadError> {
    let destinations: Vec<Destination> = read_json(path)?;
    log::info!("read {} destinations from {path}", destinations.len());
    Ok(destinations)
}

/// Read the feature score table.
///
/// # Errors
/// Returns [`LoadError`] when the file cannot be read or parsed, or the
/// table is malformed.
pub fn read_features(path: &Utf8Path) -> Result<FeatureTable, LoadError> {
    let record: FeatureTableRecord = read_json(path)?;
    let table = record
        .into_table()
        .map_err(|source| LoadError::FeatureTable {
            path: path.to_path_buf(),
            source,
        })?;
    log::info!(
        "read scores for {} destinations over {} features from {path}",
        table.len(),
        table.features().len()
    );
    Ok(table)
}

/// Read the feature-to-profile membership table.
///
/// # Errors
/// Returns [`LoadError`] when the file cannot be read or parsed.
pub fn read_feature_profiles(path: &Utf8Path) -> Result<FeatureProfileMap, LoadError> {
    let records: Vec<FeatureProfileRecord> = read_json(path)?;
    let mut map = FeatureProfileMap::new();
    for record in records {
        for (profile, weight) in record.profiles {
            if weight > 0.0 {
                map.insert(record.feature.as_str(), profile);
            }
        }
    }
    log::info!(
        "read profile membership for {} features from {path}",
        map.len()
    );
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn temp_dir() -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().expect("create temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("UTF-8 temp dir");
        (dir, root)
    }

    fn write(path: &Utf8Path, contents: &str) {
        std::fs::write(path, contents).expect("write fixture");
    }

    #[rstest]
    fn reads_destinations_with_optional_columns(
        #[from(temp_dir)] (_dir, root): (TempDir, Utf8PathBuf),
    ) {
        let path = root.join("destinations.json");
        write(
            &path,
            r#"[
                {"id": 1, "wiki_id": 10, "name": "Bruges", "country": "Belgium",
                 "status": "usable", "type": "city", "lat": 51.2, "lng": 3.2, "nr_tokens": 400},
                {"id": 2, "name": "Ghent", "lat": 51.05, "lng": 3.72,
                 "weight": 9, "nr_tokens_norm": 0.5}
            ]"#,
        );
        let destinations = read_destinations(&path).expect("read destinations");
        assert_eq!(destinations.len(), 2);
        let bruges = destinations.first().expect("first row");
        assert_eq!(bruges.kind, "city");
        assert_eq!(bruges.weight, 0);
        let ghent = destinations.get(1).expect("second row");
        assert_eq!(ghent.weight, 9);
        assert!(ghent.country.is_empty());
    }

    #[rstest]
    #[expect(clippy::float_cmp, reason = "scores are read verbatim")]
    fn reads_feature_table(#[from(temp_dir)] (_dir, root): (TempDir, Utf8PathBuf)) {
        let path = root.join("features.json");
        write(
            &path,
            r#"{"features": ["hiking", "museums"],
                "rows": [{"destination_id": 1, "scores": [0.8, 0.1]}]}"#,
        );
        let table = read_features(&path).expect("read features");
        assert_eq!(table.score(1, "hiking"), 0.8);
        assert_eq!(FeatureTableRecord::from_table(&table).rows.len(), 1);
    }

    #[rstest]
    fn ragged_feature_rows_are_rejected(#[from(temp_dir)] (_dir, root): (TempDir, Utf8PathBuf)) {
        let path = root.join("features.json");
        write(
            &path,
            r#"{"features": ["hiking", "museums"],
                "rows": [{"destination_id": 1, "scores": [0.8]}]}"#,
        );
        let err = read_features(&path).expect_err("ragged row");
        assert!(matches!(
            err,
            LoadError::FeatureTable {
                source: FeatureTableError::RowLength { .. },
                ..
            }
        ));
    }

    #[rstest]
    fn profile_membership_requires_positive_weight(
        #[from(temp_dir)] (_dir, root): (TempDir, Utf8PathBuf),
    ) {
        let path = root.join("profiles.json");
        write(
            &path,
            r#"[{"feature": "castles", "profiles": {"culture": 1, "nature": 0}},
                {"feature": "hiking", "profiles": {"nature": 0.5}}]"#,
        );
        let map = read_feature_profiles(&path).expect("read profiles");
        assert!(map.belongs_to("castles", "culture"));
        assert!(!map.belongs_to("castles", "nature"));
        assert!(map.belongs_to("hiking", "nature"));
    }

    #[rstest]
    fn malformed_json_reports_the_path(#[from(temp_dir)] (_dir, root): (TempDir, Utf8PathBuf)) {
        let path = root.join("destinations.json");
        write(&path, "{ not json");
        let err = read_destinations(&path).expect_err("malformed JSON");
        assert!(matches!(err, LoadError::Json { .. }));
        assert!(err.to_string().contains("destinations.json"));
    }

    #[rstest]
    fn missing_file_is_an_io_error(#[from(temp_dir)] (_dir, root): (TempDir, Utf8PathBuf)) {
        let err = read_feature_profiles(&root.join("absent.json")).expect_err("missing file");
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[rstest]
    fn profile_records_describe_every_membership() {
        let map = FeatureProfileMap::new()
            .with_membership("castles", "culture")
            .with_membership("castles", "history");
        let records = FeatureProfileRecord::from_map(&map);
        assert_eq!(records.len(), 1);
        let castles = records.first().expect("one record");
        assert_eq!(castles.feature, "castles");
        let names: Vec<_> = castles.profiles.keys().collect();
        assert_eq!(names, vec!["culture", "history"]);
    }
}
