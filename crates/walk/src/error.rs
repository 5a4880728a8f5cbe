use std::error::Error;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Error returned when a directory listing fails.
#[derive(Debug)]
pub struct ListError {
    kind: ListErrorKind,
}

impl ListError {
    pub(crate) fn read_entry(path: PathBuf, source: io::Error) -> Self {
        Self {
            kind: ListErrorKind::ReadEntry { path, source },
        }
    }

    pub(crate) fn entry_type(path: PathBuf, source: io::Error) -> Self {
        Self {
            kind: ListErrorKind::EntryType { path, source },
        }
    }

    /// Returns the specific failure that terminated the listing.
    #[must_use]
    pub fn kind(&self) -> &ListErrorKind {
        &self.kind
    }

    /// Returns the filesystem path associated with the error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match &self.kind {
            ListErrorKind::ReadEntry { path, .. } | ListErrorKind::EntryType { path, .. } => path,
        }
    }

    /// Raw OS status of the underlying failure, for audit log lines.
    #[must_use]
    pub fn raw_os_error(&self) -> i32 {
        match &self.kind {
            ListErrorKind::ReadEntry { source, .. } | ListErrorKind::EntryType { source, .. } => {
                source.raw_os_error().unwrap_or(0)
            }
        }
    }
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ListErrorKind::ReadEntry { path, source } => {
                write!(
                    f,
                    "failed to read entry in '{}': {}",
                    path.display(),
                    source
                )
            }
            ListErrorKind::EntryType { path, source } => {
                write!(
                    f,
                    "failed to inspect the type of '{}': {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl Error for ListError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            ListErrorKind::ReadEntry { source, .. } | ListErrorKind::EntryType { source, .. } => {
                Some(source)
            }
        }
    }
}

/// Classification of listing failures.
#[derive(Debug)]
pub enum ListErrorKind {
    /// The read-next-entry call reported an error before the end of stream.
    ReadEntry {
        /// Directory whose stream failed.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
    /// The entry's type could not be determined.
    EntryType {
        /// Path of the problematic entry.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn io_error(message: &'static str) -> io::Error {
        io::Error::other(message)
    }

    #[test]
    fn list_error_path_matches_variant_path() {
        let read = ListError::read_entry(PathBuf::from("dir"), io_error("dir"));
        assert_eq!(Path::new("dir"), read.path());

        let kind = ListError::entry_type(PathBuf::from("entry"), io_error("entry"));
        assert_eq!(Path::new("entry"), kind.path());
    }

    #[test]
    fn list_error_display_is_specific_per_variant() {
        let read = ListError::read_entry(PathBuf::from("dir"), io_error("boom"));
        assert_eq!("failed to read entry in 'dir': boom", read.to_string());

        let kind = ListError::entry_type(PathBuf::from("entry"), io_error("boom"));
        assert_eq!(
            "failed to inspect the type of 'entry': boom",
            kind.to_string()
        );
    }

    #[test]
    fn list_error_source_refers_to_underlying_io_error() {
        let error = ListError::read_entry(PathBuf::from("dir"), io_error("source"));
        let source_ref = error
            .source()
            .and_then(|err| err.downcast_ref::<io::Error>())
            .expect("list error should expose the underlying io::Error");
        assert_eq!(source_ref.to_string(), "source");
    }
}
