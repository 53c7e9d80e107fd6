//! Destination directory materialization.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::CopyError;

/// Ensure a directory exists, creating it with `mode` if it is absent.
///
/// Trailing separators are stripped before creation. A directory that already
/// exists is treated as success, so calling this twice is harmless. Anything
/// else already at `path`, including a symlink to a directory, is an error.
/// Only the last path component is created; missing parents are an error.
///
/// Returns `true` if the directory was created by this call.
///
/// # Errors
///
/// * If the directory cannot be created for any reason other than already existing
/// * If a non-directory already exists at `path`
pub fn ensure_directory(path: &Path, mode: u32) -> Result<bool, CopyError> {
    let path = strip_trailing_separator(path);

    let mut builder = fs::DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    match builder.create(&path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::AlreadyExists && is_real_directory(&path) => Ok(false),
        Err(e) => Err(CopyError::DirectoryCreateError { path, io_error: e }),
    }
}

/// Apply the exact permission bits `mode` to an existing directory.
///
/// # Errors
///
/// * If the permissions cannot be changed
pub fn apply_directory_mode(path: &Path, mode: u32) -> Result<(), CopyError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|e| {
            CopyError::PermissionsError {
                path: path.to_path_buf(),
                mode,
                io_error: e,
            }
        })?;
    }
    #[cfg(not(unix))]
    let _ = (path, mode);

    Ok(())
}

/// Mode used while a directory's contents are still being written.
///
/// The owner always gets `rwx` so that a read-only source directory can still
/// be populated; [`apply_directory_mode`] restores the real bits afterwards.
#[must_use]
pub const fn populating_mode(mode: u32) -> u32 {
    mode | 0o700
}

/// Whether `path` itself (not a link target) is a directory.
fn is_real_directory(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_dir())
}

/// Rebuild `path` from its components, dropping any trailing separator.
fn strip_trailing_separator(path: &Path) -> PathBuf {
    path.components().collect()
}
