//! Process detachment.
//!
//! The classic double-step: fork so the parent can report the child PID and
//! exit, then have the child create its own session, move to `/`, and point
//! the standard descriptors at the null device. After these steps the only
//! remaining channels into the process are signals and syslog.

use crate::error::DaemonError;
use std::io;

/// Forks the process.
///
/// Returns `Some(child_pid)` in the parent and `None` in the child.
pub(crate) fn fork_process() -> Result<Option<i32>, DaemonError> {
    // SAFETY: the process is single-threaded at this point, so the child
    // inherits a consistent address space.
    let pid = unsafe { libc::fork() };
    if pid < 0 {
        return Err(DaemonError::Fork(io::Error::last_os_error()));
    }
    Ok((pid > 0).then_some(pid))
}

/// Detaches the calling process from its session and terminal.
pub(crate) fn detach() -> Result<(), DaemonError> {
    // SAFETY: setsid, chdir, close, open, and dup are plain syscalls on
    // descriptors this process owns.
    unsafe {
        if libc::setsid() < 0 {
            return Err(DaemonError::Session(io::Error::last_os_error()));
        }
        if libc::chdir(c"/".as_ptr()) != 0 {
            return Err(DaemonError::Workdir(io::Error::last_os_error()));
        }
        for fd in 0..=2 {
            if libc::close(fd) != 0 {
                return Err(DaemonError::CloseDescriptors(io::Error::last_os_error()));
            }
        }
        // Anything above the standard trio may be inherited from the parent;
        // closing those is best-effort.
        for fd in 3..1024 {
            libc::close(fd);
        }
        // The lowest free descriptor is 0 after the closes, so one open and
        // two dups leave stdin, stdout, and stderr all on /dev/null.
        if libc::open(c"/dev/null".as_ptr(), libc::O_RDWR) < 0 {
            return Err(DaemonError::Redirect(io::Error::last_os_error()));
        }
        if libc::dup(0) < 0 {
            return Err(DaemonError::Redirect(io::Error::last_os_error()));
        }
        if libc::dup(0) < 0 {
            return Err(DaemonError::Redirect(io::Error::last_os_error()));
        }
    }
    Ok(())
}
