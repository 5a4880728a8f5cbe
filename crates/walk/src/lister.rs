use crate::entry::{Entry, EntryKind};
use crate::error::ListError;
use crate::list::EntryList;
use std::fs;
use std::path::Path;

/// Collects the regular files of one directory stream.
///
/// Entries of every other type are dropped silently. The stream is consumed
/// to its end; a read failure is distinguished from end-of-stream by the
/// error return, and nothing collected so far is handed out in that case.
pub fn list_files(dir: &Path, stream: fs::ReadDir) -> Result<EntryList, ListError> {
    let mut files = EntryList::new();
    for entry in stream {
        let entry = entry.map_err(|error| ListError::read_entry(dir.to_path_buf(), error))?;
        let file_type = entry
            .file_type()
            .map_err(|error| ListError::entry_type(entry.path(), error))?;
        if file_type.is_file() {
            files.push(Entry::new(entry.file_name(), EntryKind::File));
        }
    }
    Ok(files)
}

/// Collects the regular files and subdirectories of one directory stream.
///
/// Regular files go to the first list, subdirectories to the second; the
/// stream never yields `.` or `..`, and every other entry type (symbolic
/// link, device, socket, fifo) is dropped silently.
pub fn list_files_and_directories(
    dir: &Path,
    stream: fs::ReadDir,
) -> Result<(EntryList, EntryList), ListError> {
    let mut files = EntryList::new();
    let mut subdirs = EntryList::new();
    for entry in stream {
        let entry = entry.map_err(|error| ListError::read_entry(dir.to_path_buf(), error))?;
        let file_type = entry
            .file_type()
            .map_err(|error| ListError::entry_type(entry.path(), error))?;
        if file_type.is_file() {
            files.push(Entry::new(entry.file_name(), EntryKind::File));
        } else if file_type.is_dir() {
            subdirs.push(Entry::new(entry.file_name(), EntryKind::Directory));
        }
    }
    Ok((files, subdirs))
}
