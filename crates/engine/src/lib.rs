#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `engine` reconciles a destination directory tree with a source tree: new
//! and changed files are copied, entries absent from the source are deleted,
//! and in recursive mode the reconciliation descends into every source
//! subdirectory that exists (or was just created) in the destination. The
//! engine is the single-pass half of the daemon; the scheduler in the
//! `daemon` crate decides when a pass runs.
//!
//! # Design
//!
//! - [`synchronize`] runs one pass over a directory pair with the strategy
//!   fixed by [`SyncOptions`]: flat (files only) or recursive.
//! - The differ merge-joins two name-sorted listings with one cursor each,
//!   classifying every name as delete-only, create-only, or reconcile.
//! - [`copy_file`] picks between a buffered loop and a memory-mapped walk by
//!   the configured big-file threshold; both preserve mode and timestamps.
//! - [`remove_directory_recursively`] empties a tree in post-order before
//!   removing the directory itself.
//! - Every individual operation failure is logged through
//!   [`logging_sink::LogSink`] with its path and status, then folded into
//!   the aggregate result; the walk itself never stops early.
//!
//! # Invariants
//!
//! - Listings handed to the differ are sorted byte-wise by name; the differ
//!   never reorders them.
//! - Metadata is queried immediately before it is used and never cached
//!   across operations; an entry vanishing in between is logged and skipped.
//! - Destination files are never visible with a looser mode than either
//!   empty permissions or their final value.
//! - A failed subtree never aborts its siblings.

mod copy;
mod diff;
mod dirops;
mod error;
mod path;
mod sync;

pub use copy::{COPY_BUFFER_SIZE, copy_big_file, copy_file, copy_small_file};
pub use dirops::{create_empty_directory, remove_directory_recursively};
pub use error::{CopyError, CopyStatus, RemoveError, SyncError};
pub use sync::{SyncMode, SyncOptions, synchronize};
