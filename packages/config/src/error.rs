//! Error types for configuration loading.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the settings file.
    #[error("Failed to read settings file {}: {source}", path.display())]
    ReadError {
        /// Path to the file that couldn't be read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the TOML settings file.
    #[error("Failed to parse TOML settings {}: {source}", path.display())]
    TomlParseError {
        /// Path to the file that couldn't be parsed.
        path: PathBuf,
        /// The underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// Unknown log level name.
    #[error("Unknown log level {0:?} (expected TRACE, DEBUG, INFO, WARN, ERROR, FATAL or OFF)")]
    UnknownLogLevel(String),

    /// The source does not exist or is not a directory.
    #[error("Source {} does not exist or is not a directory", .0.display())]
    SourceNotDirectory(PathBuf),

    /// The destination exists but is not a directory.
    #[error("Destination {} exists and is not a directory", .0.display())]
    DestinationNotDirectory(PathBuf),

    /// The destination's parent directory does not exist.
    #[error("Parent of destination {} does not exist", .0.display())]
    DestinationParentMissing(PathBuf),

    /// The destination is the source or lies inside it.
    #[error("Destination {} is inside source {}", destination_dir.display(), source_dir.display())]
    DestinationInsideSource {
        /// The resolved source directory.
        source_dir: PathBuf,
        /// The resolved destination directory.
        destination_dir: PathBuf,
    },

    /// The copy buffer size is zero.
    #[error("Buffer size must be greater than zero")]
    InvalidBufferSize,

    /// IO error while resolving paths.
    #[error("IO error while resolving {}: {source}", path.display())]
    IoError {
        /// The path being resolved.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}
