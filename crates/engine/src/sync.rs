//! One full synchronization pass over a directory pair.

use crate::diff::{DiffContext, reconcile_directories, reconcile_files};
use crate::error::SyncError;
use crate::path::ChildPath;
use logging_sink::LogSink;
use std::fs;
use std::path::Path;
use walk::{EntryList, list_files, list_files_and_directories};

/// Strategy for a pass, chosen once at startup from the configuration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SyncMode {
    /// Reconcile regular files only.
    Flat,
    /// Reconcile files and subdirectories, descending into ready ones.
    Recursive,
}

/// Tuning for a synchronization pass.
#[derive(Clone, Copy, Debug)]
pub struct SyncOptions {
    /// Minimal size at which a file is copied through a memory mapping.
    pub threshold: u64,
    /// Flat or recursive reconciliation.
    pub mode: SyncMode,
}

/// Runs one synchronization pass over the pair of trees.
///
/// Per-entry failures are logged and folded into the returned status; a
/// failed subtree never aborts its siblings, and no failure below this level
/// stops the pass early.
pub fn synchronize(
    source: &Path,
    destination: &Path,
    options: SyncOptions,
    log: &dyn LogSink,
) -> Result<(), SyncError> {
    match options.mode {
        SyncMode::Flat => synchronize_flat(source, destination, options.threshold, log),
        SyncMode::Recursive => synchronize_recursive(source, destination, options.threshold, log),
    }
}

fn open_and_sort_files(
    source: &Path,
    destination: &Path,
) -> Result<(EntryList, EntryList), SyncError> {
    let src_stream = fs::read_dir(source).map_err(|error| SyncError::OpenSource {
        path: source.to_path_buf(),
        source: error,
    })?;
    let dst_stream = fs::read_dir(destination).map_err(|error| SyncError::OpenDestination {
        path: destination.to_path_buf(),
        source: error,
    })?;
    let mut src_files = list_files(source, src_stream).map_err(SyncError::ListSource)?;
    let mut dst_files = list_files(destination, dst_stream).map_err(SyncError::ListDestination)?;
    src_files.sort_by_name();
    dst_files.sort_by_name();
    Ok((src_files, dst_files))
}

fn synchronize_flat(
    source: &Path,
    destination: &Path,
    threshold: u64,
    log: &dyn LogSink,
) -> Result<(), SyncError> {
    let (src_files, dst_files) = open_and_sort_files(source, destination)?;
    let cx = DiffContext {
        source_dir: source,
        destination_dir: destination,
        threshold,
        log,
    };
    if reconcile_files(&cx, &src_files, &dst_files) != 0 {
        return Err(SyncError::Files);
    }
    Ok(())
}

fn synchronize_recursive(
    source: &Path,
    destination: &Path,
    threshold: u64,
    log: &dyn LogSink,
) -> Result<(), SyncError> {
    let src_stream = fs::read_dir(source).map_err(|error| SyncError::OpenSource {
        path: source.to_path_buf(),
        source: error,
    })?;
    let dst_stream = fs::read_dir(destination).map_err(|error| SyncError::OpenDestination {
        path: destination.to_path_buf(),
        source: error,
    })?;
    let (mut src_files, mut src_dirs) =
        list_files_and_directories(source, src_stream).map_err(SyncError::ListSource)?;
    let (mut dst_files, mut dst_dirs) =
        list_files_and_directories(destination, dst_stream).map_err(SyncError::ListDestination)?;

    let cx = DiffContext {
        source_dir: source,
        destination_dir: destination,
        threshold,
        log,
    };

    let mut status = Ok(());
    src_files.sort_by_name();
    dst_files.sort_by_name();
    if reconcile_files(&cx, &src_files, &dst_files) != 0 {
        status = Err(SyncError::Files);
    }

    src_dirs.sort_by_name();
    dst_dirs.sort_by_name();
    let (dir_failures, readiness) = reconcile_directories(&cx, &src_dirs, &dst_dirs);
    if dir_failures != 0 {
        status = Err(SyncError::Directories);
    }

    // Descend only into subdirectories that exist in the destination; a
    // failed child folds into this level's status without touching the
    // remaining siblings.
    let mut next_source = ChildPath::new(source);
    let mut next_destination = ChildPath::new(destination);
    for (entry, ready) in src_dirs.iter().zip(readiness.iter().copied()) {
        if !ready {
            continue;
        }
        if synchronize_recursive(
            next_source.set(entry.name()),
            next_destination.set(entry.name()),
            threshold,
            log,
        )
        .is_err()
        {
            status = Err(SyncError::Subtree);
        }
    }
    status
}
