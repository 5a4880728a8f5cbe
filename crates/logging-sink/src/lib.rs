#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging-sink` carries the daemon's audit and status lines to their
//! destination. Every delete, create, copy, and permission fix in a
//! synchronization pass emits exactly one human-readable line with the
//! affected path and a numeric status preserved verbatim; the scheduler adds
//! sleep/wake and pass boundary lines around them.
//!
//! # Design
//!
//! - [`LogSink`] is the one-method seam between the engine and the backend.
//! - [`SyslogSink`] routes lines to syslog(3) through raw `libc`, the
//!   backend a detached daemon actually has available.
//! - [`StderrSink`] covers diagnostics while the process still owns its
//!   descriptors, and [`MemorySink`] records lines for inspection in tests
//!   and embeddings.

mod sink;
#[cfg(unix)]
pub mod syslog;

pub use sink::{LogSink, MemorySink, StderrSink};
#[cfg(unix)]
pub use syslog::{SYSLOG_TAG, SyslogSink};
