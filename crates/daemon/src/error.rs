use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal failure of daemon startup or scheduling.
///
/// These abort the process; synchronization failures inside a pass never
/// surface here. Codes are negative and appear in the final
/// `terminating; <status>` log line.
#[derive(Debug, Error)]
pub enum DaemonError {
    /// The background process could not be forked.
    #[error("failed to fork: {0}")]
    Fork(#[source] io::Error),
    /// A configured path could not be resolved to an absolute path.
    #[error("failed to resolve '{}': {source}", path.display())]
    Resolve {
        /// Path that failed to resolve.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
    /// A new session could not be created.
    #[error("failed to create a new session: {0}")]
    Session(#[source] io::Error),
    /// The working directory could not be moved to `/`.
    #[error("failed to change the working directory: {0}")]
    Workdir(#[source] io::Error),
    /// A standard descriptor could not be closed.
    #[error("failed to close inherited descriptors: {0}")]
    CloseDescriptors(#[source] io::Error),
    /// The standard descriptors could not be pointed at the null device.
    #[error("failed to redirect standard descriptors to /dev/null: {0}")]
    Redirect(#[source] io::Error),
    /// The signal handlers could not be installed.
    #[error("failed to install signal handlers: {0}")]
    InstallHandlers(#[source] io::Error),
    /// The synchronization signals could not be blocked before a pass.
    #[error("failed to block synchronization signals: {0}")]
    BlockSignals(#[source] io::Error),
    /// The synchronization signals could not be unblocked after a pass.
    #[error("failed to unblock synchronization signals: {0}")]
    UnblockSignals(#[source] io::Error),
}

impl DaemonError {
    /// Signed status for the final log line and the process exit code.
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::Fork(_) => -1,
            Self::Resolve { .. } => -2,
            Self::Session(_) => -3,
            Self::Workdir(_) => -4,
            Self::CloseDescriptors(_) => -5,
            Self::Redirect(_) => -6,
            Self::InstallHandlers(_) => -7,
            Self::BlockSignals(_) => -8,
            Self::UnblockSignals(_) => -9,
        }
    }
}
