//! Parallel directory tree copy engine.
//!
//! This crate recursively duplicates a directory tree, preserving:
//!
//! * File contents, streamed in fixed-size chunks with short-write detection
//! * Permission bits of files and directories
//! * Symlink target strings, verbatim and unresolved
//!
//! Devices, FIFOs and sockets are skipped with a warning. Every subdirectory is
//! copied by its own execution unit (a thread, or a job on a bounded `rayon`
//! pool), and failures are contained to the smallest scope they affect before
//! being folded into a single [`CopyOutcome`].
//!
//! # Example
//!
//! ```rust,ignore
//! use parcp_copy::{Concurrency, CopyOptions, copy_tree};
//!
//! let outcome = copy_tree(source, destination, CopyOptions {
//!     concurrency: Concurrency::Bounded(8),
//!     ..CopyOptions::default()
//! });
//!
//! if !outcome.is_success() {
//!     eprintln!("some entries failed to copy; see the log");
//! }
//! ```

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod classify;
mod dir;
mod dispatch;
mod error;
mod file;
mod outcome;
mod traverse;

pub use classify::{EntryKind, classify, classify_file_type};
pub use dir::{apply_directory_mode, ensure_directory, populating_mode};
pub use dispatch::Concurrency;
pub use error::{CopyError, FailureKind};
pub use file::{
    DEFAULT_BUFFER_SIZE, copy_regular_file, copy_regular_file_with_buffer, copy_special,
    copy_symlink, permission_bits,
};
pub use outcome::CopyOutcome;
pub use traverse::{CopyOptions, TreeCopier, copy_tree};
