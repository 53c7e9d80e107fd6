//! CLI argument definitions.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use clap::Parser;
use parcp_config::{ConfigRequest, LogLevel};

/// CLI arguments for parcp.
#[derive(Debug, Parser)]
#[command(
    name = "parcp",
    about = "Recursively copy the contents of a directory, one worker per subdirectory",
    version
)]
pub struct Args {
    /// Source directory, then destination directory. The contents of the
    /// source are copied; the last component of the destination is created if
    /// it does not exist.
    #[arg(value_name = "PATH", num_args = 0..=2)]
    pub paths: Vec<PathBuf>,

    /// Source directory (instead of the first positional path).
    #[arg(short = 'f', long = "from", value_name = "SRC")]
    pub from: Option<PathBuf>,

    /// Destination directory (instead of the last positional path).
    #[arg(short = 't', long = "to", value_name = "DST")]
    pub to: Option<PathBuf>,

    /// Log level: TRACE, DEBUG, INFO, WARN, ERROR, FATAL or OFF.
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Quiet mode, equivalent to `-l OFF`.
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Copy on a pool of N workers instead of one thread per directory.
    /// Without N, use one worker per logical CPU. Attach N (`-j4`) when
    /// paths follow.
    #[arg(short = 'j', long = "jobs", value_name = "N", num_args = 0..=1)]
    pub jobs: Option<Option<usize>>,

    /// Chunk size in bytes for streaming file contents.
    #[arg(short = 'b', long = "buffer-size", value_name = "BYTES")]
    pub buffer_size: Option<usize>,

    /// Settings file to load instead of the default location.
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Build a configuration request from the parsed arguments.
    ///
    /// # Errors
    ///
    /// * If the source or destination is missing
    /// * If more paths were given than needed
    pub fn to_request(&self) -> Result<ConfigRequest, &'static str> {
        let mut positional = self.paths.iter().cloned();

        let source = self
            .from
            .clone()
            .or_else(|| positional.next())
            .ok_or("missing source directory")?;
        let destination = self
            .to
            .clone()
            .or_else(|| positional.next())
            .ok_or("missing destination directory")?;

        if positional.next().is_some() {
            return Err("too many paths given");
        }

        Ok(ConfigRequest {
            source,
            destination,
            log_level: self.log_level,
            quiet: self.quiet,
            jobs: self.jobs,
            buffer_size: self.buffer_size,
            settings_file: self.config.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("parcp").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_positional_paths() {
        let request = parse(&["src", "dst"]).to_request().unwrap();

        assert_eq!(request.source, PathBuf::from("src"));
        assert_eq!(request.destination, PathBuf::from("dst"));
        assert_eq!(request.jobs, None);
        assert!(!request.quiet);
    }

    #[test]
    fn test_named_paths() {
        let request = parse(&["-f", "src", "-t", "dst"]).to_request().unwrap();

        assert_eq!(request.source, PathBuf::from("src"));
        assert_eq!(request.destination, PathBuf::from("dst"));
    }

    #[test]
    fn test_mixed_paths() {
        let request = parse(&["-t", "dst", "src"]).to_request().unwrap();

        assert_eq!(request.source, PathBuf::from("src"));
        assert_eq!(request.destination, PathBuf::from("dst"));
    }

    #[test]
    fn test_missing_destination() {
        assert_eq!(
            parse(&["src"]).to_request().unwrap_err(),
            "missing destination directory"
        );
    }

    #[test]
    fn test_too_many_paths() {
        assert_eq!(
            parse(&["-f", "a", "b", "c"]).to_request().unwrap_err(),
            "too many paths given"
        );
    }

    #[test]
    fn test_jobs_flag_forms() {
        assert_eq!(parse(&["a", "b"]).jobs, None);
        assert_eq!(parse(&["a", "b", "-j"]).jobs, Some(None));
        assert_eq!(parse(&["-j4", "a", "b"]).jobs, Some(Some(4)));
        assert_eq!(parse(&["--jobs=2", "a", "b"]).jobs, Some(Some(2)));
    }

    #[test]
    fn test_log_level_flag() {
        let args = parse(&["-l", "debug", "-q", "a", "b"]);

        assert_eq!(args.log_level, Some(LogLevel::Debug));
        assert!(args.quiet);
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        let result = Args::try_parse_from(["parcp", "-l", "loud", "a", "b"]);
        assert!(result.is_err());
    }
}
