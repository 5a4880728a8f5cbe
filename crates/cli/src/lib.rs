#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` parses the daemon's command line, validates the directory pair, and
//! hands the resulting configuration to the `daemon` crate. The surface is
//! deliberately small:
//!
//! ```text
//! oc-dirsyncd [-i <interval>] [-R] [-t <threshold>] <source> <destination>
//! ```
//!
//! The parent process prints the child's PID on success and exits; from then
//! on the daemon reports exclusively through syslog.

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, Command};
use daemon::DaemonConfig;
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

fn command() -> Command {
    Command::new("oc-dirsyncd")
        .about("Directory mirroring daemon")
        .arg(
            Arg::new("interval")
                .short('i')
                .value_name("SECONDS")
                .value_parser(clap::value_parser!(u32))
                .help("Sleep time between synchronization passes (default 300)"),
        )
        .arg(
            Arg::new("recursive")
                .short('R')
                .action(ArgAction::SetTrue)
                .help("Synchronize subdirectories recursively"),
        )
        .arg(
            Arg::new("threshold")
                .short('t')
                .value_name("BYTES")
                .value_parser(clap::value_parser!(u64))
                .help("Minimal size at which a file counts as big and is copied through a memory mapping"),
        )
        .arg(
            Arg::new("source")
                .value_name("SOURCE")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Directory to copy from"),
        )
        .arg(
            Arg::new("destination")
                .value_name("DESTINATION")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Directory to make match the source"),
        )
}

fn parse<I, T>(args: I) -> Result<DaemonConfig, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = command().try_get_matches_from(args)?;
    let source = matches
        .get_one::<PathBuf>("source")
        .cloned()
        .expect("SOURCE is required");
    let destination = matches
        .get_one::<PathBuf>("destination")
        .cloned()
        .expect("DESTINATION is required");

    let mut builder = DaemonConfig::builder(source, destination);
    if let Some(interval) = matches.get_one::<u32>("interval") {
        builder = builder.interval(Duration::from_secs(u64::from(*interval)));
    }
    if matches.get_flag("recursive") {
        builder = builder.recursive(true);
    }
    if let Some(threshold) = matches.get_one::<u64>("threshold") {
        builder = builder.threshold(*threshold);
    }
    Ok(builder.build())
}

/// Checks that `path` names a directory this process can list.
fn directory_valid(path: &Path) -> std::io::Result<()> {
    fs::read_dir(path).map(|_| ())
}

/// Parses arguments, validates both directories, and launches the daemon.
///
/// Returns the parent's exit status; the forked child never comes back
/// through here.
pub fn run_with<I, T>(args: I, stdout: &mut dyn Write, stderr: &mut dyn Write) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let config = match parse(args) {
        Ok(config) => config,
        Err(error) => {
            if matches!(error.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                let _ = write!(stdout, "{error}");
                return ExitCode::SUCCESS;
            }
            let _ = write!(stderr, "{error}");
            return ExitCode::FAILURE;
        }
    };

    for path in [config.source(), config.destination()] {
        if let Err(error) = directory_valid(path) {
            let _ = writeln!(stderr, "{}: {error}", path.display());
            return ExitCode::FAILURE;
        }
    }

    match daemon::spawn(&config) {
        Ok(child) => {
            let _ = writeln!(stdout, "daemon PID: {child}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            let _ = writeln!(stderr, "{error}");
            ExitCode::FAILURE
        }
    }
}
