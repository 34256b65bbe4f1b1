//! Test helpers for writing catalog tables and driving CLI invocations.

use super::*;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use stairway_core::test_support::sample_catalog;
use stairway_data::{FeatureProfileRecord, FeatureTableRecord};
use tempfile::TempDir;

use crate::catalog::{DESTINATIONS_FILE, FEATURES_FILE, PROFILES_FILE};

/// Temporary data directory for one test.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn empty() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    /// Workspace holding the raw JSON tables of the sample catalog.
    pub(super) fn with_tables() -> Self {
        let workspace = Self::empty();
        let catalog = sample_catalog();
        let root = workspace.root();
        write_json_file(&root.join(DESTINATIONS_FILE), catalog.destinations());
        write_json_file(
            &root.join(FEATURES_FILE),
            &FeatureTableRecord::from_table(catalog.features()),
        );
        write_json_file(
            &root.join(PROFILES_FILE),
            &FeatureProfileRecord::from_map(catalog.profiles()),
        );
        workspace
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).expect("write file");
}

fn write_json_file<T: Serialize + ?Sized>(path: &Utf8Path, value: &T) {
    let payload = serde_json::to_vec_pretty(value).expect("serialise table");
    write_utf8(path, &payload);
}

/// Parse `args` as a `stairway` invocation and capture its stdout.
pub(super) fn invoke<I, S>(args: I) -> Result<String, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut invocation = vec!["stairway".to_owned()];
    invocation.extend(args.into_iter().map(Into::into));
    let cli = Cli::try_parse_from(invocation).map_err(CliError::ArgumentParsing)?;
    let mut output = Vec::new();
    run_command(cli.command, &mut output)?;
    Ok(String::from_utf8(output).expect("utf-8 output"))
}

/// Parse captured stdout as JSON.
pub(super) fn parse_output(output: &str) -> serde_json::Value {
    serde_json::from_str(output).expect("JSON output")
}

/// Identifiers of the `destinations` array of a response.
pub(super) fn destination_ids(response: &serde_json::Value) -> Vec<u64> {
    response
        .get("destinations")
        .and_then(serde_json::Value::as_array)
        .expect("destinations array")
        .iter()
        .map(|destination| {
            destination
                .get("id")
                .and_then(serde_json::Value::as_u64)
                .expect("numeric id")
        })
        .collect()
}
