//! Directory creation and recursive removal.

use crate::error::RemoveError;
use crate::path::ChildPath;
use std::fs;
use std::os::unix::fs::DirBuilderExt;
use std::path::Path;
use walk::list_files_and_directories;

/// Creates an empty directory carrying the source's permission bits.
pub fn create_empty_directory(path: &Path, mode: u32) -> std::io::Result<()> {
    fs::DirBuilder::new().mode(mode & 0o7777).create(path)
}

/// Removes a directory tree in post-order.
///
/// Subdirectories are emptied and removed first, then files, then the
/// directory itself. A failure removing any child is critical and suppresses
/// the final removal, because the directory cannot be empty at that point.
pub fn remove_directory_recursively(path: &Path) -> Result<(), RemoveError> {
    let stream = fs::read_dir(path).map_err(|error| RemoveError::Open {
        path: path.to_path_buf(),
        source: error,
    })?;
    let (files, subdirs) =
        list_files_and_directories(path, stream).map_err(|error| RemoveError::List {
            path: path.to_path_buf(),
            source: error,
        })?;

    let mut contents_failed = false;
    let mut child = ChildPath::new(path);
    for entry in &subdirs {
        if remove_directory_recursively(child.set(entry.name())).is_err() {
            contents_failed = true;
        }
    }
    for entry in &files {
        if fs::remove_file(child.set(entry.name())).is_err() {
            contents_failed = true;
        }
    }
    if contents_failed {
        return Err(RemoveError::Contents {
            path: path.to_path_buf(),
        });
    }

    fs::remove_dir(path).map_err(|error| RemoveError::Remove {
        path: path.to_path_buf(),
        source: error,
    })
}
