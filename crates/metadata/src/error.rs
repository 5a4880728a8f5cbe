use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error raised while reading or applying filesystem metadata.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The metadata query failed, typically because the entry vanished
    /// between listing and query.
    #[error("failed to read metadata for '{}': {source}", path.display())]
    Query {
        /// Path whose metadata could not be read.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
    /// The permission change failed.
    #[error("failed to change permissions of '{}': {source}", path.display())]
    Permissions {
        /// Path whose mode could not be changed.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
}

impl MetadataError {
    /// Raw OS status of the underlying failure, for audit log lines.
    ///
    /// Returns `0` when the source error carries no OS code.
    #[must_use]
    pub fn raw_os_error(&self) -> i32 {
        match self {
            Self::Query { source, .. } | Self::Permissions { source, .. } => {
                source.raw_os_error().unwrap_or(0)
            }
        }
    }
}
