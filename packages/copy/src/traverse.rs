//! Directory traversal: the per-unit copy state machine.
//!
//! A unit copies one directory level. It materializes the destination,
//! enumerates the source, copies files and links inline and dispatches one
//! new unit per subdirectory without waiting. Once enumeration is exhausted
//! and the listing handle is closed, it waits for its own children and folds
//! everything into a single [`CopyOutcome`].

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::ffi::OsStr;
use std::fs::{self, Metadata, ReadDir};
use std::path::{Path, PathBuf};

use rayon::ThreadPool;

use crate::classify::{EntryKind, classify};
use crate::dir::{apply_directory_mode, ensure_directory, populating_mode};
use crate::dispatch::{Concurrency, Dispatch, fan_out};
use crate::error::CopyError;
use crate::file::{
    DEFAULT_BUFFER_SIZE, copy_regular_file_with_buffer, copy_special, copy_symlink,
    permission_bits,
};
use crate::outcome::CopyOutcome;

/// Options controlling a tree copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyOptions {
    /// How subdirectory units are scheduled.
    pub concurrency: Concurrency,
    /// Chunk size used when streaming file contents.
    pub buffer_size: usize,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            concurrency: Concurrency::Unbounded,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

/// A subtree to be copied by one execution unit.
///
/// Plain data: the unit gets its own copy and shares nothing with the parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UnitTask {
    source: PathBuf,
    destination: PathBuf,
    /// Path of this subtree relative to the copy root, used to scope log lines.
    relative: PathBuf,
}

impl UnitTask {
    fn root(source: &Path, destination: &Path) -> Self {
        Self {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            relative: PathBuf::new(),
        }
    }

    fn child(&self, name: &OsStr) -> Self {
        Self {
            source: self.source.join(name),
            destination: self.destination.join(name),
            relative: self.relative.join(name),
        }
    }

    pub(crate) fn source(&self) -> &Path {
        &self.source
    }

    /// Scope label for log lines: the relative path, or `.` for the root.
    pub(crate) fn label(&self) -> String {
        if self.relative.as_os_str().is_empty() {
            ".".to_string()
        } else {
            self.relative.display().to_string()
        }
    }
}

/// One non-directory entry found while scanning.
#[derive(Debug)]
struct CopyTask {
    source: PathBuf,
    destination: PathBuf,
    metadata: Metadata,
    kind: EntryKind,
}

/// Copies directory trees, one execution unit per subdirectory.
#[derive(Debug)]
pub struct TreeCopier {
    options: CopyOptions,
    pool: Option<ThreadPool>,
}

impl TreeCopier {
    /// Create a copier.
    ///
    /// With [`Concurrency::Bounded`] a dedicated thread pool is built. If the
    /// pool cannot be built the copier falls back to unbounded dispatch.
    #[must_use]
    pub fn new(options: CopyOptions) -> Self {
        let pool = match options.concurrency {
            Concurrency::Unbounded => None,
            Concurrency::Bounded(threads) => {
                match rayon::ThreadPoolBuilder::new()
                    .num_threads(threads.max(1))
                    .thread_name(|i| format!("parcp-worker-{i}"))
                    .build()
                {
                    Ok(pool) => Some(pool),
                    Err(e) => {
                        log::warn!(
                            "Failed to build pool of {threads} workers ({e}); using one thread per directory"
                        );
                        None
                    }
                }
            }
        };

        Self { options, pool }
    }

    /// The options this copier was built with.
    #[must_use]
    pub const fn options(&self) -> &CopyOptions {
        &self.options
    }

    pub(crate) const fn pool(&self) -> Option<&ThreadPool> {
        self.pool.as_ref()
    }

    /// Copy the contents of `source` into `destination`.
    ///
    /// The source must be an existing, listable directory. The destination is
    /// created if needed; its parent must already exist. Returns only after
    /// every unit at every depth has finished.
    #[must_use]
    pub fn copy_tree(&self, source: &Path, destination: &Path) -> CopyOutcome {
        log::info!(
            "Copying {} -> {}",
            source.display(),
            destination.display()
        );

        let outcome = self.run_unit(&UnitTask::root(source, destination));

        if outcome.is_success() {
            log::info!("Copy of {} finished", source.display());
        } else {
            log::error!(
                "Copy of {} finished with errors (first: {})",
                source.display(),
                outcome
                    .diagnostic()
                    .map_or_else(|| "unknown".to_string(), |kind| kind.to_string())
            );
        }

        outcome
    }

    /// Entry point of an execution unit.
    pub(crate) fn run_unit(&self, task: &UnitTask) -> CopyOutcome {
        let label = task.label();

        #[cfg(test)]
        assert!(
            task.source.file_name() != Some(OsStr::new(PANICKING_UNIT_NAME)),
            "[{label}] unit told to panic"
        );

        log::trace!("[{label}] Scanning {}", task.source.display());

        // Init
        let mode = match fs::metadata(&task.source) {
            Ok(metadata) => permission_bits(&metadata),
            Err(e) => {
                let error = CopyError::MetadataError {
                    path: task.source.clone(),
                    io_error: e,
                };
                log::error!("[{label}] fatal: {error}");
                return CopyOutcome::from(&error);
            }
        };

        match ensure_directory(&task.destination, populating_mode(mode)) {
            Ok(true) => log::trace!(
                "[{label}] Created directory {} ({:o})",
                task.destination.display(),
                populating_mode(mode)
            ),
            Ok(false) => log::trace!(
                "[{label}] Directory {} already exists",
                task.destination.display()
            ),
            Err(error) => {
                log::error!("[{label}] fatal: {error}");
                return CopyOutcome::from(&error);
            }
        }

        // Scanning, then Draining inside `fan_out` once `scan` has dropped the listing.
        let mut outcome = match fs::read_dir(&task.source) {
            Ok(entries) => fan_out(self, &label, |units| {
                self.scan(task, &label, entries, units)
            }),
            Err(e) => {
                let error = CopyError::DirectoryOpenError {
                    path: task.source.clone(),
                    io_error: e,
                };
                log::error!("[{label}] fatal: {error}");
                CopyOutcome::from(&error)
            }
        };

        // Done
        if let Err(error) = apply_directory_mode(&task.destination, mode) {
            log::error!("[{label}] {error}");
            outcome.merge(CopyOutcome::from(&error));
        }

        log::trace!(
            "[{label}] Finished {} ({})",
            task.source.display(),
            if outcome.is_success() { "ok" } else { "failed" }
        );

        outcome
    }

    /// Enumerate one level, copying entries inline and dispatching subdirectories.
    fn scan(
        &self,
        task: &UnitTask,
        label: &str,
        entries: ReadDir,
        units: &mut dyn Dispatch,
    ) -> CopyOutcome {
        let mut outcome = CopyOutcome::success();

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let error = CopyError::DirectoryOpenError {
                        path: task.source.clone(),
                        io_error: e,
                    };
                    log::error!("[{label}] {error}");
                    outcome.merge(CopyOutcome::from(&error));
                    break;
                }
            };

            let name = entry.file_name();
            if name == "." || name == ".." {
                log::trace!("[{label}] Skipping special entry {}", name.to_string_lossy());
                continue;
            }

            let source = entry.path();
            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(e) => {
                    let error = CopyError::MetadataError {
                        path: source,
                        io_error: e,
                    };
                    log::error!("[{label}] {error}");
                    outcome.merge(CopyOutcome::from(&error));
                    continue;
                }
            };

            let kind = classify(&metadata);
            log::trace!(
                "[{label}] INODE: {}, A {kind}: {}",
                inode(&metadata),
                source.display()
            );

            if kind == EntryKind::Directory {
                units.dispatch(task.child(&name));
                continue;
            }

            let copy = CopyTask {
                destination: task.destination.join(&name),
                source,
                metadata,
                kind,
            };
            outcome.merge(self.copy_entry(&copy, label));
        }

        outcome
    }

    fn copy_entry(&self, task: &CopyTask, label: &str) -> CopyOutcome {
        let result = match task.kind {
            EntryKind::RegularFile => copy_regular_file_with_buffer(
                &task.source,
                &task.destination,
                permission_bits(&task.metadata),
                self.options.buffer_size,
            )
            .map(|bytes| {
                log::debug!(
                    "[{label}] Copied {} -> {} ({bytes} bytes)",
                    task.source.display(),
                    task.destination.display()
                );
            }),
            EntryKind::SymbolicLink => {
                copy_symlink(&task.source, &task.destination, &task.metadata).map(|()| {
                    log::debug!(
                        "[{label}] Symlinked {} -> {}",
                        task.source.display(),
                        task.destination.display()
                    );
                })
            }
            EntryKind::Directory => {
                unreachable!("directories are dispatched, not copied inline")
            }
            kind => {
                copy_special(label, &task.source, kind);
                Ok(())
            }
        };

        if let Err(error) = &result {
            log::error!("[{label}] {error}");
        }

        CopyOutcome::from(&result)
    }
}

/// Copy the contents of `source` into `destination` with the given options.
///
/// Convenience wrapper around [`TreeCopier::copy_tree`].
#[must_use]
pub fn copy_tree(source: &Path, destination: &Path, options: CopyOptions) -> CopyOutcome {
    TreeCopier::new(options).copy_tree(source, destination)
}

/// Subdirectories with this name panic when their unit starts.
#[cfg(test)]
pub(crate) const PANICKING_UNIT_NAME: &str = "unit-panics-here";

#[cfg(unix)]
fn inode(metadata: &Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    metadata.ino()
}

#[cfg(not(unix))]
const fn inode(_metadata: &Metadata) -> u64 {
    0
}
