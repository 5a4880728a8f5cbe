use crate::error::MetadataError;
use filetime::FileTime;
use std::fs;
use std::os::unix::fs::MetadataExt;
use std::path::Path;

/// Point-in-time snapshot of the metadata fields the synchronizer compares
/// and preserves.
#[derive(Clone, Copy, Debug)]
pub struct FileInfo {
    len: u64,
    mode: u32,
    atime: FileTime,
    mtime: FileTime,
}

impl FileInfo {
    /// Queries `path`, following symlinks like `stat(2)`.
    pub fn query(path: &Path) -> Result<Self, MetadataError> {
        let metadata = fs::metadata(path).map_err(|source| MetadataError::Query {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_metadata(&metadata))
    }

    /// Captures the relevant fields of an already-read [`fs::Metadata`].
    #[must_use]
    pub fn from_metadata(metadata: &fs::Metadata) -> Self {
        Self {
            len: metadata.len(),
            mode: metadata.mode(),
            atime: FileTime::from_last_access_time(metadata),
            mtime: FileTime::from_last_modification_time(metadata),
        }
    }

    /// Size in bytes.
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.len
    }

    /// Indicates an empty file.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Full `st_mode` bits, file type included.
    #[must_use]
    pub const fn mode(&self) -> u32 {
        self.mode
    }

    /// Permission bits only, setuid/setgid/sticky included.
    #[must_use]
    pub const fn permissions(&self) -> u32 {
        self.mode & 0o7777
    }

    /// Last access time at query time.
    #[must_use]
    pub const fn atime(&self) -> FileTime {
        self.atime
    }

    /// Last modification time at query time.
    #[must_use]
    pub const fn mtime(&self) -> FileTime {
        self.mtime
    }
}
