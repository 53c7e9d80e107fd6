//! parcp CLI entry point.
//!
//! Recursively copies the contents of a directory, copying every subdirectory
//! in parallel.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod args;
mod output;

use std::env;

use clap::Parser;

use args::Args;
use parcp_config::{ConfigRequest, LogLevel, resolve_config};
use parcp_copy::TreeCopier;

/// Exit status when anything failed.
const EXIT_FAILURE: i32 = -1;

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            std::process::exit(if e.use_stderr() { EXIT_FAILURE } else { 0 });
        }
    };

    let request = match args.to_request() {
        Ok(request) => request,
        Err(message) => {
            output::print_error(message);
            output::print_usage_hint();
            std::process::exit(EXIT_FAILURE);
        }
    };

    match run(&request) {
        Ok(true) => {}
        Ok(false) => std::process::exit(EXIT_FAILURE),
        Err(e) => {
            output::print_error(&e.to_string());
            std::process::exit(EXIT_FAILURE);
        }
    }
}

/// Set up `pretty_env_logger` at the configured level. `RUST_LOG` refines it.
fn init_logging(level: LogLevel) {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(level.to_level_filter());
    if let Ok(filters) = env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

/// Resolve the configuration and copy the tree it describes.
///
/// Returns whether every entry was copied. Configuration problems are errors.
fn run(request: &ConfigRequest) -> Result<bool, Box<dyn std::error::Error>> {
    // The log level is part of the configuration; resolution itself does not log.
    let config = resolve_config(request)?;
    init_logging(config.log_level);

    log::trace!("Starting up");
    match &config.settings_file {
        Some(path) => log::debug!("Settings loaded from {}", path.display()),
        None => log::debug!("No settings file found"),
    }
    log::debug!(
        "Copying {} to {} ({:?}, {} byte chunks)",
        config.source.display(),
        config.destination.display(),
        config.concurrency,
        config.buffer_size
    );

    let copier = TreeCopier::new(config.copy_options());
    let outcome = copier.copy_tree(&config.source, &config.destination);

    if config.log_level != LogLevel::Off {
        if outcome.is_success() {
            output::print_success(&config.source, &config.destination);
        } else {
            output::print_failure(&config.source, outcome.diagnostic());
        }
    }

    log::trace!("End of main");
    Ok(outcome.is_success())
}
