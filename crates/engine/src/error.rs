use std::io;
use std::path::PathBuf;
use thiserror::Error;
use walk::ListError;

/// Advisory outcome of a copy that completed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CopyStatus {
    /// Copy completed with no reservations.
    Clean,
    /// Copy completed but the sequential-access hint was rejected.
    AdviceIgnored,
}

impl CopyStatus {
    /// Signed status for the audit log: `0` clean, `1` advisory.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Clean => 0,
            Self::AdviceIgnored => 1,
        }
    }
}

/// Critical failure of a single file copy.
///
/// When a copy fails the destination's state is unreliable: it may be
/// missing, truncated, or carry a partial prefix of the source. Codes are
/// negative and appear verbatim in the audit log next to the affected path.
#[derive(Debug, Error)]
pub enum CopyError {
    /// The source file could not be opened for reading.
    #[error("failed to open source file '{}': {source}", path.display())]
    OpenSource {
        /// Source path.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
    /// The destination file could not be created or truncated.
    #[error("failed to create destination file '{}': {source}", path.display())]
    OpenDestination {
        /// Destination path.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
    /// The destination's final mode could not be applied.
    #[error("failed to set the mode of '{}': {source}", path.display())]
    SetMode {
        /// Destination path.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
    /// The source file could not be memory-mapped.
    #[error("failed to map source file '{}': {source}", path.display())]
    Map {
        /// Source path.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
    /// Reading the source failed with an unrecoverable error.
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        /// Source path.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
    /// Writing the destination failed with an unrecoverable error.
    #[error("failed to write '{}': {source}", path.display())]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
    /// The source's timestamps could not be applied to the destination.
    #[error("failed to set timestamps on '{}': {source}", path.display())]
    SetTimes {
        /// Destination path.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
}

impl CopyError {
    /// Signed status for the audit log.
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::OpenSource { .. } => -1,
            Self::OpenDestination { .. } => -2,
            Self::SetMode { .. } => -3,
            Self::Map { .. } => -4,
            Self::Read { .. } => -5,
            Self::Write { .. } => -6,
            Self::SetTimes { .. } => -7,
        }
    }
}

/// Failure of a recursive directory removal.
#[derive(Debug, Error)]
pub enum RemoveError {
    /// The directory could not be opened.
    #[error("failed to open directory '{}': {source}", path.display())]
    Open {
        /// Directory path.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
    /// The directory's contents could not be listed.
    #[error("failed to list directory '{}': {source}", path.display())]
    List {
        /// Directory path.
        path: PathBuf,
        /// Listing failure.
        source: ListError,
    },
    /// A child entry could not be removed, so the directory is not empty
    /// and the final removal was not attempted.
    #[error("failed to remove the contents of '{}'", path.display())]
    Contents {
        /// Directory path.
        path: PathBuf,
    },
    /// The emptied directory itself could not be removed.
    #[error("failed to remove directory '{}': {source}", path.display())]
    Remove {
        /// Directory path.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
}

impl RemoveError {
    /// Signed status for the audit log.
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::Open { .. } => -1,
            Self::List { .. } => -2,
            Self::Contents { .. } => -3,
            Self::Remove { .. } => -4,
        }
    }
}

/// Failure of one synchronization level.
///
/// Per-entry failures inside a level are logged individually and surface
/// here only as the aggregate variants; open and list failures abort the
/// level before any reconciliation work.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The source directory could not be opened.
    #[error("failed to open source directory '{}': {source}", path.display())]
    OpenSource {
        /// Source directory path.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
    /// The destination directory could not be opened.
    #[error("failed to open destination directory '{}': {source}", path.display())]
    OpenDestination {
        /// Destination directory path.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
    /// The source directory could not be listed.
    #[error("failed to list the source directory: {0}")]
    ListSource(ListError),
    /// The destination directory could not be listed.
    #[error("failed to list the destination directory: {0}")]
    ListDestination(ListError),
    /// Some files could not be reconciled.
    #[error("some files could not be reconciled")]
    Files,
    /// Some subdirectories could not be reconciled.
    #[error("some directories could not be reconciled")]
    Directories,
    /// A subdirectory could not be fully synchronized.
    #[error("a subdirectory could not be fully synchronized")]
    Subtree,
}

impl SyncError {
    /// Signed status for the audit log.
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::OpenSource { .. } => -1,
            Self::OpenDestination { .. } => -2,
            Self::ListSource(_) => -3,
            Self::ListDestination(_) => -4,
            Self::Files => -5,
            Self::Directories => -6,
            Self::Subtree => -7,
        }
    }
}
