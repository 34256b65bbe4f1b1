//! `prepare` command: enrich raw tables and write a catalog snapshot.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use stairway_data::{PrepareOptions, TablePaths, prepare_catalog, write_snapshot};

use crate::catalog::{ARG_DATA_DIR, SNAPSHOT_FILE, require_existing, table_paths};
use crate::{CliError, write_json};

pub(crate) const ARG_PREPARE_DESTINATIONS: &str = "destinations";
pub(crate) const ARG_PREPARE_FEATURES: &str = "features";
pub(crate) const ARG_PREPARE_PROFILES: &str = "profiles";
pub(crate) const ARG_PREPARE_OUTPUT: &str = "output";

/// CLI arguments for the `prepare` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "prepare",
    long_about = "Drop destinations without enough tokens, derive sampling \
                 weights and normalised token counts, and write the result \
                 as a binary catalog snapshot. Table paths default to the \
                 standard file names inside --data-dir.",
    about = "Enrich raw tables and write a catalog snapshot"
)]
#[ortho_config(prefix = "STAIRWAY")]
pub(crate) struct PrepareArgs {
    /// Directory holding the raw tables and receiving the snapshot.
    #[arg(long = ARG_DATA_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) data_dir: Option<Utf8PathBuf>,
    /// Override the destinations table path.
    #[arg(long = ARG_PREPARE_DESTINATIONS, value_name = "path")]
    #[serde(default)]
    pub(crate) destinations: Option<Utf8PathBuf>,
    /// Override the feature score table path.
    #[arg(long = ARG_PREPARE_FEATURES, value_name = "path")]
    #[serde(default)]
    pub(crate) features: Option<Utf8PathBuf>,
    /// Override the feature profile table path.
    #[arg(long = ARG_PREPARE_PROFILES, value_name = "path")]
    #[serde(default)]
    pub(crate) profiles: Option<Utf8PathBuf>,
    /// Override the snapshot output path.
    #[arg(long = ARG_PREPARE_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
    /// Destinations with fewer tokens are dropped.
    #[arg(long = "min-nr-tokens", value_name = "count")]
    #[serde(default)]
    pub(crate) min_nr_tokens: Option<u64>,
    /// Exponent turning token counts into sampling weights.
    #[arg(long = "power-factor", value_name = "exponent")]
    #[serde(default)]
    pub(crate) power_factor: Option<f64>,
}

impl PrepareArgs {
    fn into_config(self) -> Result<PrepareConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(PrepareConfig::from(merged))
    }
}

/// Resolved `prepare` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PrepareConfig {
    pub(crate) tables: TablePaths,
    pub(crate) output: Utf8PathBuf,
    pub(crate) options: PrepareOptions,
}

impl PrepareConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.tables.destinations, ARG_PREPARE_DESTINATIONS)?;
        require_existing(&self.tables.features, ARG_PREPARE_FEATURES)?;
        require_existing(&self.tables.profiles, ARG_PREPARE_PROFILES)?;
        Ok(())
    }
}

impl From<PrepareArgs> for PrepareConfig {
    fn from(args: PrepareArgs) -> Self {
        let data_dir = args.data_dir.unwrap_or_else(|| Utf8PathBuf::from("."));
        let defaults = table_paths(&data_dir);
        let tables = TablePaths {
            destinations: args.destinations.unwrap_or(defaults.destinations),
            features: args.features.unwrap_or(defaults.features),
            profiles: args.profiles.unwrap_or(defaults.profiles),
        };
        let output = args.output.unwrap_or_else(|| data_dir.join(SNAPSHOT_FILE));
        let fallback = PrepareOptions::default();
        let options = PrepareOptions {
            min_nr_tokens: args.min_nr_tokens.unwrap_or(fallback.min_nr_tokens),
            power_factor: args.power_factor.unwrap_or(fallback.power_factor),
        };
        Self {
            tables,
            output,
            options,
        }
    }
}

/// Summary printed once the snapshot is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct PrepareSummary {
    pub(crate) kept: usize,
    pub(crate) dropped: usize,
    pub(crate) output: Utf8PathBuf,
}

pub(crate) fn run_prepare(args: PrepareArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let summary = execute_prepare(&config)?;
    write_json(writer, &summary)
}

pub(crate) fn execute_prepare(config: &PrepareConfig) -> Result<PrepareSummary, CliError> {
    config.validate_sources()?;
    let (catalog, report) =
        prepare_catalog(&config.tables, config.options).map_err(CliError::LoadCatalog)?;
    write_snapshot(&config.output, &catalog)?;
    Ok(PrepareSummary {
        kept: report.kept,
        dropped: report.dropped,
        output: config.output.clone(),
    })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<PrepareConfig, CliError> {
    let merged = PrepareArgs::merge_from_layers(layers).map_err(CliError::from)?;
    Ok(PrepareConfig::from(merged))
}
