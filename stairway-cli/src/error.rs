//! Error types emitted by the Stairway CLI.

use std::sync::Arc;

use camino::Utf8PathBuf;
use stairway_core::QueryError;
use stairway_data::{LoadError, PrepareError};
use thiserror::Error;

/// Errors emitted by the Stairway CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name without leading dashes.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// A referenced input path does not exist.
    #[error("{field} path {path} does not exist")]
    MissingSourceFile {
        /// Flag naming the input.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path} exists but is not a file")]
    SourcePathNotFile {
        /// Flag naming the input.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected.
    #[error("failed to inspect {field} path {path}: {source}")]
    InspectSourcePath {
        /// Flag naming the input.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The catalog could not be loaded.
    #[error("failed to load catalog: {0}")]
    LoadCatalog(#[source] LoadError),
    /// The offline enrichment step failed.
    #[error("failed to prepare catalog: {0}")]
    Prepare(#[from] PrepareError),
    /// The request was rejected before reaching an engine.
    #[error("invalid request: {0}")]
    InvalidQuery(#[from] QueryError),
    /// Serialising a response failed.
    #[error("failed to serialise response: {0}")]
    SerialiseResponse(#[source] serde_json::Error),
    /// Writing a response failed.
    #[error("failed to write response: {0}")]
    WriteOutput(#[source] std::io::Error),
}
