//! Source/destination path validation.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Resolve and check the source and destination of a copy.
///
/// Returns absolute paths. The source must be an existing directory. The
/// destination may be missing, but then its parent must exist, and an existing
/// destination must be a directory. The destination may not be the source or
/// lie anywhere inside it.
///
/// # Errors
///
/// * If any of the conditions above does not hold
pub fn validate_paths(source: &Path, destination: &Path) -> Result<(PathBuf, PathBuf), ConfigError> {
    let resolved_source = fs::canonicalize(source)
        .ok()
        .filter(|p| p.is_dir())
        .ok_or_else(|| ConfigError::SourceNotDirectory(source.to_path_buf()))?;

    let resolved_destination = resolve_destination(destination)?;

    if resolved_destination.starts_with(&resolved_source) {
        return Err(ConfigError::DestinationInsideSource {
            source_dir: resolved_source,
            destination_dir: resolved_destination,
        });
    }

    Ok((resolved_source, resolved_destination))
}

fn resolve_destination(destination: &Path) -> Result<PathBuf, ConfigError> {
    if destination.exists() {
        if !destination.is_dir() {
            return Err(ConfigError::DestinationNotDirectory(destination.to_path_buf()));
        }
        return fs::canonicalize(destination).map_err(|e| ConfigError::IoError {
            path: destination.to_path_buf(),
            source: e,
        });
    }

    let name = destination
        .file_name()
        .ok_or_else(|| ConfigError::DestinationParentMissing(destination.to_path_buf()))?;
    let parent = match destination.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let parent = fs::canonicalize(parent)
        .ok()
        .filter(|p| p.is_dir())
        .ok_or_else(|| ConfigError::DestinationParentMissing(destination.to_path_buf()))?;

    Ok(parent.join(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_paths_new_destination() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source");
        fs::create_dir(&source).unwrap();

        let (src, dst) = validate_paths(&source, &dir.path().join("target")).unwrap();

        assert_eq!(src, fs::canonicalize(&source).unwrap());
        assert_eq!(dst, fs::canonicalize(dir.path()).unwrap().join("target"));
    }

    #[test]
    fn test_validate_paths_missing_source() {
        let dir = TempDir::new().unwrap();

        let err = validate_paths(&dir.path().join("nope"), &dir.path().join("target")).unwrap_err();

        assert!(matches!(err, ConfigError::SourceNotDirectory(_)));
    }

    #[test]
    fn test_validate_paths_source_is_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        let err = validate_paths(&file, &dir.path().join("target")).unwrap_err();

        assert!(matches!(err, ConfigError::SourceNotDirectory(_)));
    }

    #[test]
    fn test_validate_paths_destination_is_file() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("target");
        fs::create_dir(&source).unwrap();
        fs::write(&target, "x").unwrap();

        let err = validate_paths(&source, &target).unwrap_err();

        assert!(matches!(err, ConfigError::DestinationNotDirectory(_)));
    }

    #[test]
    fn test_validate_paths_destination_parent_missing() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source");
        fs::create_dir(&source).unwrap();

        let err = validate_paths(&source, &dir.path().join("a/b/c")).unwrap_err();

        assert!(matches!(err, ConfigError::DestinationParentMissing(_)));
    }

    #[test]
    fn test_validate_paths_destination_inside_source() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source");
        fs::create_dir(&source).unwrap();

        let err = validate_paths(&source, &source.join("backup")).unwrap_err();
        assert!(matches!(err, ConfigError::DestinationInsideSource { .. }));

        let err = validate_paths(&source, &source).unwrap_err();
        assert!(matches!(err, ConfigError::DestinationInsideSource { .. }));
    }

    #[test]
    fn test_validate_paths_sibling_with_common_prefix() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("data");
        fs::create_dir(&source).unwrap();

        // `data-copy` shares a string prefix with `data` but is not inside it.
        assert!(validate_paths(&source, &dir.path().join("data-copy")).is_ok());
    }
}
