//! Settings file discovery.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::env;
use std::path::{Path, PathBuf};

/// Environment variable naming a settings file.
pub const SETTINGS_ENV_VAR: &str = "PARCP_CONFIG";

/// Locate the settings file to load, if any.
///
/// Checked in order:
///
/// * `explicit`, returned as-is even if it does not exist (loading reports that)
/// * the path in `$PARCP_CONFIG`
/// * `<config_dir>/parcp/config.toml`, only if it is a file
#[must_use]
pub fn discover_settings(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Some(path) = env::var_os(SETTINGS_ENV_VAR).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(path));
    }

    default_settings_path().filter(|path| path.is_file())
}

/// The per-user settings file location, whether or not it exists.
#[must_use]
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("parcp").join("config.toml"))
}
