//! Terminal output formatting.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::Path;

use colored::Colorize;
use parcp_copy::FailureKind;

/// Print a successful copy summary.
pub fn print_success(source: &Path, destination: &Path) {
    println!(
        "{} Copied {} to {}",
        "✓".green(),
        source.display().to_string().cyan(),
        destination.display().to_string().cyan()
    );
}

/// Print a failed copy summary.
pub fn print_failure(source: &Path, first: Option<FailureKind>) {
    let detail = first.map_or_else(String::new, |kind| format!(" (first failure: {kind})"));
    eprintln!(
        "{} Copy of {} finished with errors{detail}; see the log for details",
        "Error:".red().bold(),
        source.display()
    );
}

/// Print error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message);
}

/// Point at `--help` after an argument error.
pub fn print_usage_hint() {
    eprintln!("Run {} for usage.", "parcp --help".bold());
}
