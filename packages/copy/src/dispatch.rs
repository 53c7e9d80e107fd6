//! Work dispatch and completion tracking for subdirectory units.
//!
//! Every subdirectory is copied by its own execution unit. A unit receives its
//! `(source, destination)` pair by value and shares nothing with its parent
//! except the [`CopyOutcome`] it reports back. A parent only ever waits on its
//! own direct children; grandchildren belong to the child that dispatched them.
//!
//! Two strategies are available:
//!
//! * [`Concurrency::Unbounded`]: one named OS thread per subdirectory
//! * [`Concurrency::Bounded`]: units run as jobs on a fixed-size `rayon` pool;
//!   a parent waiting on its children keeps executing queued units

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::thread::{self, ScopedJoinHandle};

use rayon::ThreadPool;

use crate::error::CopyError;
use crate::outcome::CopyOutcome;
use crate::traverse::{TreeCopier, UnitTask};

/// Name given to unit threads.
const UNIT_THREAD_NAME: &str = "parcp-unit";

/// How subdirectory units are scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Concurrency {
    /// One thread per subdirectory, without limit.
    #[default]
    Unbounded,
    /// A shared pool with this many worker threads.
    Bounded(usize),
}

/// Launches units for the subdirectories found while scanning one level.
pub(crate) trait Dispatch {
    /// Start copying `task` without waiting for it.
    fn dispatch(&mut self, task: UnitTask);
}

/// Run `scan` for one directory level, then wait for every unit it dispatched.
///
/// Returns the outcome of `scan` folded with the outcome of every child unit.
/// A unit that could not be started or whose result cannot be determined
/// counts as a failure.
pub(crate) fn fan_out<F>(copier: &TreeCopier, label: &str, scan: F) -> CopyOutcome
where
    F: FnOnce(&mut dyn Dispatch) -> CopyOutcome + Send,
{
    match copier.pool() {
        Some(pool) => fan_out_pool(copier, pool, label, scan),
        None => fan_out_threads(copier, label, scan),
    }
}

fn fan_out_threads<F>(copier: &TreeCopier, label: &str, scan: F) -> CopyOutcome
where
    F: FnOnce(&mut dyn Dispatch) -> CopyOutcome,
{
    thread::scope(|scope| {
        let mut units = ThreadUnits {
            copier,
            scope,
            label,
            handles: Vec::new(),
            outcome: CopyOutcome::success(),
        };

        let mut outcome = scan(&mut units);
        outcome.merge(units.join_all());
        outcome
    })
}

struct ThreadUnits<'scope, 'env> {
    copier: &'env TreeCopier,
    scope: &'scope thread::Scope<'scope, 'env>,
    label: &'env str,
    handles: Vec<(PathBuf, ScopedJoinHandle<'scope, CopyOutcome>)>,
    outcome: CopyOutcome,
}

impl Dispatch for ThreadUnits<'_, '_> {
    fn dispatch(&mut self, task: UnitTask) {
        let copier = self.copier;
        let source = task.source().to_path_buf();

        let spawned = thread::Builder::new()
            .name(UNIT_THREAD_NAME.to_string())
            .spawn_scoped(self.scope, move || copier.run_unit(&task));

        match spawned {
            Ok(handle) => {
                log::debug!(
                    "[{}] Dispatched unit for {}",
                    self.label,
                    source.display()
                );
                self.handles.push((source, handle));
            }
            Err(e) => {
                let error = CopyError::DispatchError {
                    path: source,
                    io_error: e,
                };
                log::error!("[{}] {error}", self.label);
                self.outcome.merge(CopyOutcome::from(&error));
            }
        }
    }
}

impl ThreadUnits<'_, '_> {
    fn join_all(self) -> CopyOutcome {
        let mut outcome = self.outcome;

        for (source, handle) in self.handles {
            log::debug!("[{}] Waiting for unit {}", self.label, source.display());

            match handle.join() {
                Ok(child) => {
                    log::debug!("[{}] Joined unit {}", self.label, source.display());
                    outcome.merge(child);
                }
                Err(_) => {
                    let error = CopyError::JoinError {
                        path: source,
                        message: "unit panicked".to_string(),
                    };
                    log::error!("[{}] fatal: {error}", self.label);
                    outcome.merge(CopyOutcome::from(&error));
                }
            }
        }

        outcome
    }
}

fn fan_out_pool<F>(copier: &TreeCopier, pool: &ThreadPool, label: &str, scan: F) -> CopyOutcome
where
    F: FnOnce(&mut dyn Dispatch) -> CopyOutcome + Send,
{
    let (sender, receiver) = mpsc::channel();

    let (mut outcome, dispatched) = pool.scope(|scope| {
        let mut units = PoolUnits {
            copier,
            scope,
            label,
            sender,
            dispatched: Vec::new(),
        };

        let outcome = scan(&mut units);
        log::debug!(
            "[{label}] Waiting for {} unit(s)",
            units.dispatched.len()
        );
        (outcome, units.dispatched)
    });

    // The scope has returned, so every unit has either reported or died.
    let mut reported = HashSet::new();
    for (source, child) in receiver.try_iter() {
        log::debug!("[{label}] Joined unit {}", source.display());
        outcome.merge(child);
        reported.insert(source);
    }

    for source in dispatched {
        if !reported.contains(&source) {
            let error = CopyError::JoinError {
                path: source,
                message: "unit ended without reporting an outcome".to_string(),
            };
            log::error!("[{label}] fatal: {error}");
            outcome.merge(CopyOutcome::from(&error));
        }
    }

    outcome
}

struct PoolUnits<'a, 'scope> {
    copier: &'scope TreeCopier,
    scope: &'a rayon::Scope<'scope>,
    label: &'scope str,
    sender: Sender<(PathBuf, CopyOutcome)>,
    dispatched: Vec<PathBuf>,
}

impl Dispatch for PoolUnits<'_, '_> {
    fn dispatch(&mut self, task: UnitTask) {
        let copier = self.copier;
        let sender = self.sender.clone();
        let source = task.source().to_path_buf();

        log::debug!(
            "[{}] Dispatched unit for {}",
            self.label,
            source.display()
        );
        self.dispatched.push(source);

        self.scope.spawn(move |_| {
            let result = panic::catch_unwind(AssertUnwindSafe(|| copier.run_unit(&task)));
            match result {
                Ok(outcome) => {
                    // The receiver outlives the scope, so this cannot fail.
                    let _ = sender.send((task.source().to_path_buf(), outcome));
                }
                Err(_) => {
                    log::error!("[{}] Unit panicked", task.label());
                }
            }
        });
    }
}
