//! `nearby` command: destinations close to a reference place.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use stairway_core::{DEFAULT_N_RESULTS, NearbyEngine, NearbyQuery};

use crate::catalog::{ARG_CATALOG, ARG_DATA_DIR, CatalogSource};
use crate::{CliError, write_json};

pub(crate) const ARG_NEARBY_PLACE_ID: &str = "place-id";
pub(crate) const ENV_NEARBY_PLACE_ID: &str = "STAIRWAY_CMDS_NEARBY_PLACE_ID";

/// CLI arguments for the `nearby` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "nearby",
    long_about = "Take the destinations closest to the reference place and \
                 order them by popularity. Identifiers that are not integers \
                 and unknown places produce an empty list.",
    about = "List destinations near a reference place"
)]
#[ortho_config(prefix = "STAIRWAY")]
pub(crate) struct NearbyArgs {
    /// Identifier of the reference destination.
    #[arg(value_name = "place-id")]
    #[serde(default)]
    pub(crate) place_id: Option<String>,
    /// Catalog snapshot to serve.
    #[arg(long = ARG_CATALOG, value_name = "path")]
    #[serde(default)]
    pub(crate) catalog: Option<Utf8PathBuf>,
    /// Directory holding `catalog.bin` or the raw tables.
    #[arg(long = ARG_DATA_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) data_dir: Option<Utf8PathBuf>,
    /// Number of neighbours to return.
    #[arg(long = "n-results", value_name = "n")]
    #[serde(default)]
    pub(crate) n_results: Option<usize>,
    /// Seed making the popularity order reproducible.
    #[arg(long, value_name = "seed")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
}

impl NearbyArgs {
    fn into_config(self) -> Result<NearbyConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        NearbyConfig::try_from(merged)
    }
}

/// Resolved `nearby` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NearbyConfig {
    pub(crate) catalog: Option<Utf8PathBuf>,
    pub(crate) data_dir: Option<Utf8PathBuf>,
    pub(crate) query: NearbyQuery,
}

impl TryFrom<NearbyArgs> for NearbyConfig {
    type Error = CliError;

    fn try_from(args: NearbyArgs) -> Result<Self, Self::Error> {
        let raw_id = args.place_id.ok_or(CliError::MissingArgument {
            field: ARG_NEARBY_PLACE_ID,
            env: ENV_NEARBY_PLACE_ID,
        })?;
        let mut query = NearbyQuery::from_raw_id(&raw_id)
            .with_n_results(args.n_results.unwrap_or(DEFAULT_N_RESULTS));
        query.seed = args.seed;
        Ok(Self {
            catalog: args.catalog,
            data_dir: args.data_dir,
            query,
        })
    }
}

pub(crate) fn run_nearby(args: NearbyArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let catalog = CatalogSource::resolve(config.catalog, config.data_dir)?.load()?;
    let response = NearbyEngine::new(&catalog).nearby(&config.query);
    write_json(writer, &response)
}
