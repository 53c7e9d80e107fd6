//! Configuration types for parcp.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;
use std::str::FromStr;

use log::LevelFilter;
use parcp_copy::{Concurrency, CopyOptions};
use serde::Deserialize;

use crate::error::ConfigError;

/// Log verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Everything, including per-entry classification.
    Trace,
    /// Dispatch, join and per-file copy messages.
    Debug,
    /// Start and finish of the copy.
    #[default]
    Info,
    /// Skipped entries.
    Warn,
    /// Recoverable failures.
    Error,
    /// Failures that abort a whole subtree. Reported through the error level.
    Fatal,
    /// Nothing at all.
    Off,
}

impl LogLevel {
    /// The `log` filter for this level.
    #[must_use]
    pub const fn to_level_filter(self) -> LevelFilter {
        match self {
            Self::Trace => LevelFilter::Trace,
            Self::Debug => LevelFilter::Debug,
            Self::Info => LevelFilter::Info,
            Self::Warn => LevelFilter::Warn,
            Self::Error | Self::Fatal => LevelFilter::Error,
            Self::Off => LevelFilter::Off,
        }
    }

    /// Upper-case name of this level.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
            Self::Off => "OFF",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    /// Parse a level name, ignoring case.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            "fatal" => Ok(Self::Fatal),
            "off" => Ok(Self::Off),
            _ => Err(ConfigError::UnknownLogLevel(raw.to_string())),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Contents of a TOML settings file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Default log level name.
    #[serde(default)]
    pub log_level: Option<String>,

    /// Worker pool size; `0` means one worker per logical CPU.
    /// Absent means one thread per directory.
    #[serde(default)]
    pub jobs: Option<usize>,

    /// Chunk size in bytes for streaming file contents.
    #[serde(default)]
    pub buffer_size: Option<usize>,
}

/// What the command line asked for, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigRequest {
    /// Source directory as given.
    pub source: PathBuf,
    /// Destination directory as given.
    pub destination: PathBuf,
    /// Explicit log level, which wins over `quiet`.
    pub log_level: Option<LogLevel>,
    /// Disable all logging.
    pub quiet: bool,
    /// `None` if not given, `Some(None)` for "one per CPU", `Some(Some(n))` for `n`.
    pub jobs: Option<Option<usize>>,
    /// Explicit chunk size.
    pub buffer_size: Option<usize>,
    /// Explicit settings file.
    pub settings_file: Option<PathBuf>,
}

/// A fully resolved and validated configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Absolute source directory.
    pub source: PathBuf,
    /// Absolute destination directory (may not exist yet).
    pub destination: PathBuf,
    /// Log verbosity.
    pub log_level: LogLevel,
    /// Subdirectory scheduling policy.
    pub concurrency: Concurrency,
    /// Chunk size in bytes.
    pub buffer_size: usize,
    /// Settings file that was loaded, if any.
    pub settings_file: Option<PathBuf>,
}

impl Config {
    /// Engine options for this configuration.
    #[must_use]
    pub const fn copy_options(&self) -> CopyOptions {
        CopyOptions {
            concurrency: self.concurrency,
            buffer_size: self.buffer_size,
        }
    }
}
