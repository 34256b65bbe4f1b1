//! `explore` command: filter, rank, and paginate destinations.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use stairway_core::{BoundingBox, DEFAULT_N_RESULTS, ExploreEngine, ExploreQuery};

use crate::catalog::{ARG_CATALOG, ARG_DATA_DIR, CatalogSource};
use crate::{CliError, parse_profiles, write_json};

/// CLI arguments for the `explore` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "explore",
    long_about = "Select destinations by country or bounding box, rank them \
                 by interest profiles or shuffle them by popularity, and \
                 print one page of results. The bounding box is only applied \
                 when all four corners are given.",
    about = "Filter, rank, and paginate destinations"
)]
#[ortho_config(prefix = "STAIRWAY")]
pub(crate) struct ExploreArgs {
    /// Catalog snapshot to serve.
    #[arg(long = ARG_CATALOG, value_name = "path")]
    #[serde(default)]
    pub(crate) catalog: Option<Utf8PathBuf>,
    /// Directory holding `catalog.bin` or the raw tables.
    #[arg(long = ARG_DATA_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) data_dir: Option<Utf8PathBuf>,
    /// Case-insensitive country name.
    #[arg(long, value_name = "name")]
    #[serde(default)]
    pub(crate) country: Option<String>,
    /// Latitude of the north-east corner.
    #[arg(long = "ne-lat", value_name = "deg", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) ne_lat: Option<f64>,
    /// Longitude of the north-east corner.
    #[arg(long = "ne-lng", value_name = "deg", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) ne_lng: Option<f64>,
    /// Latitude of the south-west corner.
    #[arg(long = "sw-lat", value_name = "deg", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) sw_lat: Option<f64>,
    /// Longitude of the south-west corner.
    #[arg(long = "sw-lng", value_name = "deg", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) sw_lng: Option<f64>,
    /// Comma-separated interest profiles.
    #[arg(long, value_name = "list")]
    #[serde(default)]
    pub(crate) profiles: Option<String>,
    /// Index of the first result.
    #[arg(long, value_name = "n")]
    #[serde(default)]
    pub(crate) offset: Option<usize>,
    /// Page size.
    #[arg(long = "n-results", value_name = "n")]
    #[serde(default)]
    pub(crate) n_results: Option<usize>,
    /// Seed making the popularity shuffle reproducible.
    #[arg(long, value_name = "seed")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
}

impl ExploreArgs {
    fn into_config(self) -> Result<ExploreConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ExploreConfig::try_from(merged)
    }
}

/// Resolved `explore` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ExploreConfig {
    pub(crate) catalog: Option<Utf8PathBuf>,
    pub(crate) data_dir: Option<Utf8PathBuf>,
    pub(crate) query: ExploreQuery,
}

impl TryFrom<ExploreArgs> for ExploreConfig {
    type Error = CliError;

    fn try_from(args: ExploreArgs) -> Result<Self, Self::Error> {
        let bbox = BoundingBox::from_parts(args.ne_lat, args.ne_lng, args.sw_lat, args.sw_lng)?;
        let query = ExploreQuery {
            seed: args.seed,
            offset: args.offset.unwrap_or(0),
            n_results: args.n_results.unwrap_or(DEFAULT_N_RESULTS),
            country: args.country,
            bbox,
            profiles: parse_profiles(args.profiles.as_deref()),
        };
        query.validate()?;
        Ok(Self {
            catalog: args.catalog,
            data_dir: args.data_dir,
            query,
        })
    }
}

pub(crate) fn run_explore(args: ExploreArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let catalog = CatalogSource::resolve(config.catalog, config.data_dir)?.load()?;
    let response = ExploreEngine::new(&catalog).explore(&config.query)?;
    write_json(writer, &response)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ExploreConfig, CliError> {
    let merged = ExploreArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ExploreConfig::try_from(merged)
}
