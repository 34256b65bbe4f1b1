//! `destination` command: one destination with its features.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use stairway_core::{DestinationLookup, DestinationRecord, parse_destination_id};

use crate::catalog::{ARG_CATALOG, ARG_DATA_DIR, CatalogSource};
use crate::{CliError, parse_profiles, write_json};

/// CLI arguments for the `destination` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "destination",
    long_about = "Print the destination with the given id, or a random \
                 destination when no id is given. Unknown ids print null. \
                 Interest profiles move matching features to the front.",
    about = "Fetch one destination with its features"
)]
#[ortho_config(prefix = "STAIRWAY")]
pub(crate) struct DestinationArgs {
    /// Destination identifier; omit for a random pick.
    #[arg(value_name = "id")]
    #[serde(default)]
    pub(crate) id: Option<String>,
    /// Catalog snapshot to serve.
    #[arg(long = ARG_CATALOG, value_name = "path")]
    #[serde(default)]
    pub(crate) catalog: Option<Utf8PathBuf>,
    /// Directory holding `catalog.bin` or the raw tables.
    #[arg(long = ARG_DATA_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) data_dir: Option<Utf8PathBuf>,
    /// Comma-separated interest profiles.
    #[arg(long, value_name = "list")]
    #[serde(default)]
    pub(crate) profiles: Option<String>,
    /// Seed for the random pick.
    #[arg(long, value_name = "seed")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
}

pub(crate) fn run_destination(
    args: &DestinationArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let source = CatalogSource::resolve(merged.catalog.clone(), merged.data_dir.clone())?;
    let catalog = source.load()?;
    let record = lookup_destination(&DestinationLookup::new(&catalog), &merged);
    if record.is_none() {
        log::debug!("no destination matches {:?}", merged.id);
    }
    write_json(writer, &record)
}

/// Resolve the requested record, or `None` for ids that are unknown or not
/// integers and for a random pick from an empty catalog.
pub(crate) fn lookup_destination(
    lookup: &DestinationLookup<'_>,
    args: &DestinationArgs,
) -> Option<DestinationRecord> {
    let profiles = parse_profiles(args.profiles.as_deref());
    let Some(raw) = args.id.as_deref() else {
        return lookup.lookup(None, &profiles, args.seed);
    };
    let id = parse_destination_id(raw)?;
    lookup.lookup(Some(id), &profiles, args.seed)
}
