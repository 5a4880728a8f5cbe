#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `metadata` wraps the `stat`/`chmod`/timestamp surface the mirroring
//! engine relies on. Queries are taken on demand and never cached across
//! operations: the filesystem may change between a listing and the matching
//! query, and a vanished entry surfaces as an ordinary [`MetadataError`]
//! rather than a crash.
//!
//! # Design
//!
//! - [`FileInfo`] is a point-in-time snapshot of the four fields the
//!   synchronizer compares and preserves: size, mode, access time, and
//!   modification time.
//! - Permission changes go through `rustix` so open destination files can be
//!   `fchmod`ed before any data is written to them.
//! - Timestamp application uses `filetime`, which keeps nanosecond
//!   precision; modification times are compared exactly, in both directions.

mod apply;
mod error;
mod info;

pub use apply::{set_file_mode, set_file_times, set_permissions};
pub use error::MetadataError;
pub use info::FileInfo;

pub use filetime::FileTime;
