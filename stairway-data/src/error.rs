//! Error types raised while loading and preparing catalog tables.

use camino::Utf8PathBuf;
use stairway_core::{CatalogError, FeatureTableError};
use thiserror::Error;

/// Error raised when a table or snapshot cannot be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Location of the table on disk.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A JSON table did not match the expected layout.
    #[error("failed to parse JSON table {path}: {source}")]
    Json {
        /// Location of the table on disk.
        path: Utf8PathBuf,
        /// Decoder error returned by `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// The feature score table was malformed.
    #[error("invalid feature table {path}: {source}")]
    FeatureTable {
        /// Location of the table on disk.
        path: Utf8PathBuf,
        /// Validation failure.
        #[source]
        source: FeatureTableError,
    },
    /// The tables loaded but are inconsistent with each other.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// The file did not start with the snapshot magic bytes.
    #[error("{path} is not a catalog snapshot: expected magic {expected:?}, found {found:?}")]
    InvalidMagic {
        /// Location of the snapshot on disk.
        path: Utf8PathBuf,
        /// Expected byte sequence identifying a snapshot.
        expected: [u8; 4],
        /// Sequence read from the file.
        found: [u8; 4],
    },
    /// The snapshot was written by an incompatible version.
    #[error("unsupported snapshot version {found} in {path}; supported version is {supported}")]
    UnsupportedVersion {
        /// Location of the snapshot on disk.
        path: Utf8PathBuf,
        /// Version present in the file header.
        found: u16,
        /// Version written by this build.
        supported: u16,
    },
    /// The snapshot payload could not be decoded.
    #[error("failed to decode snapshot {path}: {source}")]
    Decode {
        /// Location of the snapshot on disk.
        path: Utf8PathBuf,
        /// Decoder error returned by `bincode`.
        #[source]
        source: bincode::Error,
    },
}

/// Error raised by the offline `prepare` step.
#[derive(Debug, Error)]
pub enum PrepareError {
    /// The raw tables could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// Writing the snapshot failed.
    #[error("failed to write snapshot to {path}: {source}")]
    Io {
        /// Destination file path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The catalog could not be encoded.
    #[error("failed to encode snapshot for {path}: {source}")]
    Encode {
        /// Destination file path.
        path: Utf8PathBuf,
        /// Encoder failure from `bincode`.
        #[source]
        source: bincode::Error,
    },
}
