use std::io::Write;
use std::sync::Mutex;

/// Destination for the daemon's one-line audit and status messages.
///
/// Each call carries one complete, human-readable line. Implementations must
/// tolerate being shared between the engine and the scheduler.
pub trait LogSink: Send + Sync {
    /// Records one line.
    fn line(&self, message: &str);
}

/// Sink that writes lines to standard error.
///
/// Useful while the process still owns its descriptors, before
/// daemonization redirects them to the null device.
#[derive(Debug, Default)]
pub struct StderrSink;

impl LogSink for StderrSink {
    fn line(&self, message: &str) {
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "{message}");
    }
}

/// Sink that appends lines to an in-memory buffer.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every line recorded so far, in order.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|lines| lines.clone()).unwrap_or_default()
    }
}

impl LogSink for MemorySink {
    fn line(&self, message: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(message.to_owned());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_records_lines_in_order() {
        let sink = MemorySink::new();
        sink.line("first");
        sink.line("second");
        assert_eq!(sink.lines(), vec!["first", "second"]);
    }

    #[test]
    fn memory_sink_starts_empty() {
        assert!(MemorySink::new().lines().is_empty());
    }

    #[test]
    fn stderr_sink_does_not_panic() {
        StderrSink.line("stderr sink smoke line");
    }
}
