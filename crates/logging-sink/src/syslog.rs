// Syslog backend for daemon-mode logging.
//
// Uses libc `openlog`/`syslog`/`closelog` directly rather than pulling in a
// dedicated syslog crate, keeping the dependency graph minimal. Once the
// daemon has detached and redirected its descriptors, syslog(3) is the only
// place its lines can go.

use crate::LogSink;
use std::ffi::CString;
use std::sync::OnceLock;

/// Syslog tag under which the daemon's lines appear.
pub const SYSLOG_TAG: &str = "oc-dirsyncd";

/// Sink that routes lines to syslog(3) at `LOG_INFO` priority.
///
/// Opening the sink calls `openlog(3)` with `LOG_ODELAY | LOG_PID` and the
/// `LOG_DAEMON` facility; dropping it calls `closelog(3)`. One sink should
/// be active at a time per process.
#[derive(Debug)]
pub struct SyslogSink {
    _private: (),
}

impl SyslogSink {
    /// Opens the process-wide syslog connection.
    #[must_use]
    pub fn open() -> Self {
        // syslog(3) stores the ident pointer internally, so it must stay
        // valid for the process lifetime.
        static IDENT: OnceLock<CString> = OnceLock::new();
        let ident = IDENT.get_or_init(|| CString::new(SYSLOG_TAG).unwrap_or_default());

        // SAFETY: the ident pointer lives in a static for the process
        // lifetime, and openlog runs before any logging threads exist.
        unsafe {
            libc::openlog(
                ident.as_ptr(),
                libc::LOG_ODELAY | libc::LOG_PID,
                libc::LOG_DAEMON,
            );
        }
        Self { _private: () }
    }
}

impl LogSink for SyslogSink {
    fn line(&self, message: &str) {
        let Ok(text) = CString::new(message) else {
            return;
        };
        // syslog(3) treats `%` as a format specifier; forwarding through a
        // fixed "%s" avoids format string injection.
        //
        // SAFETY: both pointers are valid NUL-terminated strings and openlog
        // has been called by the constructor.
        unsafe {
            libc::syslog(libc::LOG_INFO, c"%s".as_ptr(), text.as_ptr());
        }
    }
}

impl Drop for SyslogSink {
    fn drop(&mut self) {
        // SAFETY: closelog has no preconditions beyond a prior openlog.
        unsafe {
            libc::closelog();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_and_log_do_not_panic() {
        let sink = SyslogSink::open();
        sink.line("test line from oc-dirsyncd tests");
    }

    #[test]
    fn lines_with_format_specifiers_are_forwarded_literally() {
        let sink = SyslogSink::open();
        sink.line("path with specifiers: /tmp/a%sb %d");
    }

    #[test]
    fn lines_with_nul_bytes_are_dropped_gracefully() {
        let sink = SyslogSink::open();
        sink.line("before\0after");
    }
}
