//! Command-line interface for the Stairway destination engine.
//!
//! The `stairway` binary loads a catalog once per invocation and answers a
//! single request, writing the JSON response to stdout:
//!
//! - `prepare` enriches the raw JSON tables and writes a catalog snapshot.
//! - `explore` filters, ranks, and paginates destinations.
//! - `nearby` lists destinations close to a reference place.
//! - `destination` returns one destination, or a random one.
//!
//! Every option can also be supplied through configuration files or
//! `STAIRWAY_*` environment variables; see [`ortho_config`].
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};
use serde::Serialize;

mod catalog;
mod destination;
mod error;
mod explore;
mod nearby;
mod prepare;

pub use error::CliError;

use destination::{DestinationArgs, run_destination};
use explore::{ExploreArgs, run_explore};
use nearby::{NearbyArgs, run_nearby};
use prepare::{PrepareArgs, run_prepare};

/// Run the Stairway CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments or configuration are invalid, the
/// catalog cannot be loaded, or the response cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    run_command(cli.command, &mut stdout)
}

fn run_command(command: Command, writer: &mut dyn Write) -> Result<(), CliError> {
    match command {
        Command::Prepare(args) => run_prepare(args, writer),
        Command::Explore(args) => run_explore(args, writer),
        Command::Nearby(args) => run_nearby(args, writer),
        Command::Destination(args) => run_destination(&args, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "stairway",
    about = "Select and rank travel destinations from a prepared catalog",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Enrich raw tables and write a catalog snapshot.
    Prepare(PrepareArgs),
    /// Filter, rank, and paginate destinations.
    Explore(ExploreArgs),
    /// List destinations near a reference place.
    Nearby(NearbyArgs),
    /// Fetch one destination with its features.
    Destination(DestinationArgs),
}

/// Split a comma-separated profile list, dropping blank entries.
fn parse_profiles(raw: Option<&str>) -> Vec<String> {
    raw.into_iter()
        .flat_map(|list| list.split(','))
        .map(str::trim)
        .filter(|profile| !profile.is_empty())
        .map(str::to_owned)
        .collect()
}

fn write_json<T: Serialize>(writer: &mut dyn Write, response: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(response).map_err(CliError::SerialiseResponse)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
