//! Shared helpers for writing raw JSON tables in integration tests.

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::{Value, json};
use stairway_data::TablePaths;
use tempfile::TempDir;

/// Temporary directory holding a set of raw tables.
pub struct RawTables {
    /// Keeps the directory alive for the duration of the test.
    pub dir: TempDir,
    /// Locations of the written tables.
    pub paths: TablePaths,
}

impl RawTables {
    /// Directory the tables live in.
    pub fn root(&self) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(self.dir.path().to_path_buf()).expect("UTF-8 temp dir")
    }
}

fn write_json(path: &Utf8Path, value: &Value) {
    let text = serde_json::to_string_pretty(value).expect("serialise fixture");
    std::fs::write(path, text).expect("write fixture");
}

/// Four raw destinations; Doel has no tokens and is dropped by `prepare`.
pub fn raw_destinations() -> Value {
    json!([
        {"id": 101, "wiki_id": 1, "name": "Antwerp", "country": "Belgium", "status": "usable",
         "type": "city", "lat": 51.22, "lng": 4.40, "nr_tokens": 900},
        {"id": 102, "wiki_id": 2, "name": "Doel", "country": "Belgium", "status": "outline",
         "type": "village", "lat": 51.31, "lng": 4.26, "nr_tokens": 0},
        {"id": 103, "wiki_id": 3, "name": "Maastricht", "country": "Netherlands",
         "status": "guide", "type": "city", "lat": 50.85, "lng": 5.69, "nr_tokens": 400},
        {"id": 104, "wiki_id": 4, "name": "Leuven", "country": "Belgium", "status": "usable",
         "type": "city", "lat": 50.88, "lng": 4.70, "nr_tokens": 100}
    ])
}

/// Feature scores for every raw destination, including the dropped one.
pub fn raw_features() -> Value {
    json!({
        "features": ["museums", "nightlife", "hiking"],
        "rows": [
            {"destination_id": 101, "scores": [0.9, 0.7, 0.1]},
            {"destination_id": 102, "scores": [0.0, 0.0, 0.6]},
            {"destination_id": 103, "scores": [0.6, 0.5, 0.3]},
            {"destination_id": 104, "scores": [0.4, 0.8, 0.2]}
        ]
    })
}

/// Profile weights per feature.
pub fn raw_profiles() -> Value {
    json!([
        {"feature": "museums", "profiles": {"culture": 1}},
        {"feature": "nightlife", "profiles": {"party": 1, "culture": 0}},
        {"feature": "hiking", "profiles": {"nature": 1}}
    ])
}

/// Write the three raw tables into a fresh temporary directory.
pub fn write_raw_tables() -> RawTables {
    let dir = TempDir::new().expect("create temp dir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("UTF-8 temp dir");
    let paths = TablePaths {
        destinations: root.join("destinations.json"),
        features: root.join("features.json"),
        profiles: root.join("profiles.json"),
    };
    write_json(&paths.destinations, &raw_destinations());
    write_json(&paths.features, &raw_features());
    write_json(&paths.profiles, &raw_profiles());
    RawTables { dir, paths }
}
