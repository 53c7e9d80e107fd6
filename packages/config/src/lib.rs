//! Configuration loading and validation for parcp.
//!
//! This crate turns what the user asked for into a validated [`Config`] for the
//! copy engine. Values are layered, lowest precedence first:
//!
//! * Built-in defaults (level INFO, one thread per directory, 8 KiB chunks)
//! * A TOML settings file (`--config`, `$PARCP_CONFIG`, or `<config_dir>/parcp/config.toml`)
//! * Command-line flags
//!
//! # Example
//!
//! ```rust,ignore
//! use parcp_config::{ConfigRequest, resolve_config};
//!
//! let config = resolve_config(&ConfigRequest {
//!     source: "src".into(),
//!     destination: "dst".into(),
//!     ..ConfigRequest::default()
//! })?;
//! println!("{} -> {}", config.source.display(), config.destination.display());
//! ```

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod discovery;
mod error;
mod toml_loader;
mod types;
mod validate;

pub use discovery::{SETTINGS_ENV_VAR, default_settings_path, discover_settings};
pub use error::ConfigError;
pub use toml_loader::load_settings;
pub use types::{Config, ConfigRequest, LogLevel, Settings};
pub use validate::validate_paths;

use parcp_copy::{Concurrency, DEFAULT_BUFFER_SIZE};

/// Resolve a request into a validated configuration.
///
/// # Errors
///
/// * If the settings file cannot be read or parsed
/// * If a log level name is unknown
/// * If the buffer size is zero
/// * If the source or destination path is invalid
pub fn resolve_config(request: &ConfigRequest) -> Result<Config, ConfigError> {
    let settings_file = discover_settings(request.settings_file.as_deref());
    let settings = match &settings_file {
        Some(path) => load_settings(path)?,
        None => Settings::default(),
    };

    let log_level = resolve_log_level(request, &settings)?;
    let concurrency = resolve_concurrency(request.jobs, settings.jobs);

    let buffer_size = request
        .buffer_size
        .or(settings.buffer_size)
        .unwrap_or(DEFAULT_BUFFER_SIZE);
    if buffer_size == 0 {
        return Err(ConfigError::InvalidBufferSize);
    }

    let (source, destination) = validate_paths(&request.source, &request.destination)?;

    Ok(Config {
        source,
        destination,
        log_level,
        concurrency,
        buffer_size,
        settings_file,
    })
}

/// Explicit level, then quiet mode, then the settings file, then INFO.
fn resolve_log_level(request: &ConfigRequest, settings: &Settings) -> Result<LogLevel, ConfigError> {
    if let Some(level) = request.log_level {
        return Ok(level);
    }
    if request.quiet {
        return Ok(LogLevel::Off);
    }
    settings
        .log_level
        .as_deref()
        .map_or(Ok(LogLevel::default()), str::parse)
}

fn resolve_concurrency(flag: Option<Option<usize>>, setting: Option<usize>) -> Concurrency {
    match flag {
        Some(jobs) => pool_of(jobs.unwrap_or(0)),
        None => setting.map_or(Concurrency::Unbounded, pool_of),
    }
}

/// A pool of `jobs` workers, where `0` means one per logical CPU.
fn pool_of(jobs: usize) -> Concurrency {
    if jobs == 0 {
        Concurrency::Bounded(num_cpus::get())
    } else {
        Concurrency::Bounded(jobs)
    }
}
