//! Capability-based file access for UTF-8 paths.
//!
//! Every helper resolves its path against an ambient directory handle
//! (`/`, a drive prefix, or `.`) and performs the operation through
//! `cap-std`, so callers never touch `std::fs` directly.

use std::io;
use std::path::MAIN_SEPARATOR;

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};

/// Open `path` for reading.
///
/// # Errors
/// Returns the underlying I/O error when the file cannot be opened.
pub fn open_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Create or truncate `path` for writing, creating missing parent
/// directories first.
///
/// # Errors
/// Returns the underlying I/O error when a directory or the file cannot be
/// created.
pub fn create_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    ensure_parent_dir(path)?;
    let (dir, name) = parent_and_name(path)?;
    dir.create(name)
}

/// Report whether `path` names a regular file rather than a directory or
/// other entry.
///
/// # Errors
/// Returns the underlying I/O error, including `NotFound` when `path` or a
/// parent directory does not exist.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = parent_and_name(path)?;
    dir.metadata(name).map(|metadata| metadata.is_file())
}

/// Report whether `path` names an existing regular file.
///
/// Missing files and missing parent directories report `false`.
///
/// # Errors
/// Returns other I/O errors, e.g. permission failures.
pub fn is_file(path: &Utf8Path) -> io::Result<bool> {
    match file_is_file(path) {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        other => other,
    }
}

/// Create every missing directory above `path`.
///
/// # Errors
/// Returns the underlying I/O error when a directory cannot be created.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent().filter(|parent| !parent.as_str().is_empty()) else {
        return Ok(());
    };
    let (anchor, relative) = split_anchor(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    anchor.create_dir_all(relative)
}

fn parent_and_name(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{path} has no file name"),
        )
    })?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let (anchor, relative) = split_anchor(parent)?;
    let dir = if relative.as_str().is_empty() {
        anchor
    } else {
        anchor.open_dir(relative)?
    };
    Ok((dir, name.to_owned()))
}

/// Split `path` into an ambient handle for its root (or `.` for relative
/// paths) and the remaining relative part.
fn split_anchor(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let mut components = path.components();
    let anchor = match components.next() {
        Some(Utf8Component::Prefix(prefix)) => {
            if components.clone().next() == Some(Utf8Component::RootDir) {
                components.next();
            }
            format!("{}{MAIN_SEPARATOR}", prefix.as_str())
        }
        Some(Utf8Component::RootDir) => MAIN_SEPARATOR.to_string(),
        _ => {
            components = path.components();
            String::from(".")
        }
    };
    let dir = fs_utf8::Dir::open_ambient_dir(anchor.as_str(), ambient_authority())?;
    Ok((dir, components.as_path().to_path_buf()))
}
