//! TOML settings file loader.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::types::Settings;

/// Load a TOML settings file.
///
/// # Arguments
///
/// * `path` - Path to the TOML settings file
///
/// # Errors
///
/// * If the file cannot be read
/// * If the file cannot be parsed as TOML or has unknown keys
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_settings() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
log_level = "debug"
jobs = 4
buffer_size = 65536
"#
        )
        .unwrap();

        let settings = load_settings(file.path()).unwrap();

        assert_eq!(settings.log_level.as_deref(), Some("debug"));
        assert_eq!(settings.jobs, Some(4));
        assert_eq!(settings.buffer_size, Some(65536));
    }

    #[test]
    fn test_load_empty_settings() {
        let file = NamedTempFile::new().unwrap();

        let settings = load_settings(file.path()).unwrap();

        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_settings_rejects_unknown_keys() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "threads = 4").unwrap();

        let err = load_settings(file.path()).unwrap_err();

        assert!(matches!(err, ConfigError::TomlParseError { .. }));
    }

    #[test]
    fn test_load_settings_missing_file() {
        let err = load_settings(Path::new("/nonexistent/parcp/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }
}
