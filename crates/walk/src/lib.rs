#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `walk` provides the single-level directory listings the mirroring engine
//! diffs against each other. A listing pass reads one directory stream to its
//! end, classifying entries into regular files and subdirectories while
//! dropping every other entry type (symbolic links, devices, sockets)
//! silently. The resulting [`EntryList`]s are produced in directory read
//! order and sorted by name before any two of them are merge-joined.
//!
//! # Design
//!
//! - [`Entry`] captures the name and classification of one directory entry.
//!   Entries are immutable once created and owned by exactly one list.
//! - [`EntryList`] is an append-only sequence with an in-place stable sort.
//! - [`list_files`] and [`list_files_and_directories`] consume an already
//!   opened [`std::fs::ReadDir`] stream, so the caller decides when the
//!   directory is opened and can abort a level before any listing work.
//! - [`ListError`] distinguishes a failed read-next-entry call from an
//!   ordinary end of stream and always carries the offending path.
//!
//! # Invariants
//!
//! - A listing is complete or it is an error: a partially filled list is
//!   never returned, because the merge-join downstream requires both sides
//!   to cover their directories exactly.
//! - Sorting compares names byte-wise, the same comparison the merge-join
//!   uses to align two lists.

mod entry;
mod error;
mod list;
mod lister;

pub use entry::{Entry, EntryKind};
pub use error::{ListError, ListErrorKind};
pub use list::EntryList;
pub use lister::{list_files, list_files_and_directories};

#[cfg(test)]
mod tests;
