//! Binary catalog snapshots.
//!
//! A snapshot is the 4-byte magic [`SNAPSHOT_MAGIC`], the format version as
//! a `bincode` `u16`, then the `bincode` encoding of the prepared
//! [`Catalog`]. The id index is rebuilt and the catalog invariants are
//! re-checked on load.

use std::io::{BufReader, BufWriter, Read, Write};

use camino::Utf8Path;
use stairway_core::Catalog;

use crate::{LoadError, PrepareError, fs};

/// File identifier for catalog snapshots.
pub const SNAPSHOT_MAGIC: [u8; 4] = *b"STCT";

/// Snapshot format version written and accepted by this build.
pub const SNAPSHOT_VERSION: u16 = 1;

/// Persist `catalog` to `path`, creating parent directories and truncating
/// an existing file.
///
/// # Errors
/// Returns [`PrepareError`] when the file cannot be written or the catalog
/// cannot be encoded.
pub fn write_snapshot(path: &Utf8Path, catalog: &Catalog) -> Result<(), PrepareError> {
    let io_error = |source| PrepareError::Io {
        path: path.to_path_buf(),
        source,
    };
    let encode_error = |source| PrepareError::Encode {
        path: path.to_path_buf(),
        source,
    };
    let file = fs::create_file(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&SNAPSHOT_MAGIC).map_err(io_error)?;
    bincode::serialize_into(&mut writer, &SNAPSHOT_VERSION).map_err(encode_error)?;
    bincode::serialize_into(&mut writer, catalog).map_err(encode_error)?;
    writer.flush().map_err(io_error)?;
    log::info!("wrote snapshot of {} destinations to {path}", catalog.len());
    Ok(())
}

/// Load a catalog snapshot written by [`write_snapshot`].
///
/// # Errors
/// Returns [`LoadError`] when the file cannot be read, is not a snapshot,
/// was written by another format version, or fails to decode.
pub fn read_snapshot(path: &Utf8Path) -> Result<Catalog, LoadError> {
    let decode_error = |source| LoadError::Decode {
        path: path.to_path_buf(),
        source,
    };
    let file = fs::open_file(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);

    let mut header = Vec::with_capacity(SNAPSHOT_MAGIC.len());
    reader
        .by_ref()
        .take(4)
        .read_to_end(&mut header)
        .map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    if header != SNAPSHOT_MAGIC {
        let mut found = [0_u8; 4];
        for (slot, byte) in found.iter_mut().zip(&header) {
            *slot = *byte;
        }
        return Err(LoadError::InvalidMagic {
            path: path.to_path_buf(),
            expected: SNAPSHOT_MAGIC,
            found,
        });
    }

    let version: u16 = bincode::deserialize_from(&mut reader).map_err(decode_error)?;
    if version != SNAPSHOT_VERSION {
        return Err(LoadError::UnsupportedVersion {
            path: path.to_path_buf(),
            found: version,
            supported: SNAPSHOT_VERSION,
        });
    }

    let catalog: Catalog = bincode::deserialize_from(&mut reader).map_err(decode_error)?;
    log::info!(
        "read snapshot of {} destinations from {path}",
        catalog.len()
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::{fixture, rstest};
    use stairway_core::test_support::sample_catalog;
    use tempfile::TempDir;

    #[fixture]
    fn snapshot_path() -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().expect("create temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("UTF-8 temp dir");
        (dir, root.join("out/catalog.bin"))
    }

    #[rstest]
    fn snapshot_preserves_the_catalog(#[from(snapshot_path)] (_dir, path): (TempDir, Utf8PathBuf)) {
        let catalog = sample_catalog();
        write_snapshot(&path, &catalog).expect("write snapshot");
        let loaded = read_snapshot(&path).expect("read snapshot");
        assert_eq!(loaded, catalog);
        assert_eq!(loaded.get(3).map(|d| d.name.as_str()), Some("Bruges"));
    }

    #[rstest]
    fn snapshot_starts_with_magic_and_version(
        #[from(snapshot_path)] (_dir, path): (TempDir, Utf8PathBuf),
    ) {
        write_snapshot(&path, &sample_catalog()).expect("write snapshot");
        let bytes = std::fs::read(&path).expect("read bytes");
        assert_eq!(bytes.get(..4), Some(SNAPSHOT_MAGIC.as_slice()));
        assert_eq!(bytes.get(4..6), Some([1_u8, 0].as_slice()));
    }

    #[rstest]
    #[case(b"".as_slice())]
    #[case(b"ST".as_slice())]
    #[case(b"WSPI\x01\x00".as_slice())]
    fn foreign_files_are_rejected(
        #[from(snapshot_path)] (_dir, path): (TempDir, Utf8PathBuf),
        #[case] contents: &[u8],
    ) {
        fs::create_file(&path)
            .and_then(|mut file| file.write_all(contents))
            .expect("write fixture");
        let err = read_snapshot(&path).expect_err("not a snapshot");
        assert!(matches!(err, LoadError::InvalidMagic { .. }));
    }

    #[rstest]
    fn newer_versions_are_rejected(#[from(snapshot_path)] (_dir, path): (TempDir, Utf8PathBuf)) {
        let mut bytes = SNAPSHOT_MAGIC.to_vec();
        bytes.extend(bincode::serialize(&(SNAPSHOT_VERSION + 1)).expect("encode version"));
        fs::create_file(&path)
            .and_then(|mut file| file.write_all(&bytes))
            .expect("write fixture");
        let err = read_snapshot(&path).expect_err("unsupported version");
        assert!(matches!(
            err,
            LoadError::UnsupportedVersion { found, supported, .. }
                if found == SNAPSHOT_VERSION + 1 && supported == SNAPSHOT_VERSION
        ));
    }

    #[rstest]
    fn truncated_payload_fails_to_decode(
        #[from(snapshot_path)] (_dir, path): (TempDir, Utf8PathBuf),
    ) {
        let mut bytes = SNAPSHOT_MAGIC.to_vec();
        bytes.extend(bincode::serialize(&SNAPSHOT_VERSION).expect("encode version"));
        bytes.extend([3_u8, 0, 0]);
        fs::create_file(&path)
            .and_then(|mut file| file.write_all(&bytes))
            .expect("write fixture");
        let err = read_snapshot(&path).expect_err("truncated payload");
        assert!(matches!(err, LoadError::Decode { .. }));
    }

    #[rstest]
    fn missing_snapshot_is_an_io_error() {
        let err = read_snapshot(Utf8Path::new("/non-existent/catalog.bin")).expect_err("missing");
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
