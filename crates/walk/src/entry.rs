use std::ffi::{OsStr, OsString};

/// Classification of a directory entry retained by a listing pass.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Subdirectory.
    Directory,
}

/// Single directory entry captured during a listing pass.
///
/// Entries are immutable once created; listings taken from different
/// directories are never mixed into one list.
#[derive(Clone, Debug)]
pub struct Entry {
    name: OsString,
    kind: EntryKind,
}

impl Entry {
    pub(crate) fn new(name: OsString, kind: EntryKind) -> Self {
        Self { name, kind }
    }

    /// Returns the entry's file name.
    #[must_use]
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    /// Returns the entry's classification.
    #[must_use]
    pub const fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Indicates whether the entry names a subdirectory.
    #[must_use]
    pub const fn is_directory(&self) -> bool {
        matches!(self.kind, EntryKind::Directory)
    }
}
