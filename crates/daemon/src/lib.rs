#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `daemon` turns the single-pass engine into a long-lived background
//! process. It forks away from the launching terminal, detaches its session,
//! points the standard descriptors at the null device, and then alternates
//! between an interruptible sleep and one synchronization pass, forever,
//! until told to stop.
//!
//! # Design
//!
//! - [`DaemonConfig`] carries the directory pair, sleep interval, sync mode,
//!   and big-file threshold, immutable for the process lifetime. A
//!   [`DaemonConfigBuilder`] supplies the documented defaults.
//! - [`spawn`] forks: the parent receives the child's PID, the child
//!   detaches and runs the scheduler, exiting with the final status after
//!   logging it.
//! - [`run`] is the scheduler itself, usable in the foreground by embedders
//!   and tests.
//! - The [`signal`] module owns the two request flags. Handlers store one
//!   atomic each and nothing else; `sigprocmask` around every pass defers
//!   delivery so the flags are read-consistent while a pass runs.
//!
//! # Invariants
//!
//! - At most one pass is ever in flight; the loop is the only driver.
//! - A resync request always earns one more full pass before a pending stop
//!   is honored; chained resync requests extend the series indefinitely.
//! - Synchronization failures never terminate the daemon; they are logged
//!   and retried on the next scheduled pass.

mod config;
mod daemonize;
mod error;
mod scheduler;
pub mod signal;

pub use config::{DEFAULT_INTERVAL, DaemonConfig, DaemonConfigBuilder};
pub use engine::{SyncMode, SyncOptions};
pub use error::DaemonError;
pub use scheduler::run;

use logging_sink::{LogSink, SyslogSink};
use std::fs;
use std::process;

/// Forks into the background and runs the scheduler until stopped.
///
/// Returns the child's PID in the parent process. The child never returns:
/// it resolves the configured paths, detaches, schedules passes until a stop
/// is honored, logs `terminating; <status>`, and exits with that status.
pub fn spawn(config: &DaemonConfig) -> Result<i32, DaemonError> {
    match daemonize::fork_process()? {
        Some(child) => Ok(child),
        None => child_main(config),
    }
}

fn child_main(config: &DaemonConfig) -> ! {
    let status = run_child(config);
    let code = match &status {
        Ok(()) => 0,
        Err(error) => error.code(),
    };
    let sink = SyslogSink::open();
    sink.line(&format!("terminating; {code}"));
    drop(sink);
    process::exit(code);
}

fn run_child(config: &DaemonConfig) -> Result<(), DaemonError> {
    // Resolve to absolute paths before the working directory moves to `/`.
    let source = fs::canonicalize(config.source()).map_err(|error| DaemonError::Resolve {
        path: config.source().to_path_buf(),
        source: error,
    })?;
    let destination =
        fs::canonicalize(config.destination()).map_err(|error| DaemonError::Resolve {
            path: config.destination().to_path_buf(),
            source: error,
        })?;

    daemonize::detach()?;
    let sink = SyslogSink::open();
    signal::install_handlers().map_err(DaemonError::InstallHandlers)?;
    scheduler::run(&source, &destination, config, &sink)
}
