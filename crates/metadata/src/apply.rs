use crate::error::MetadataError;
use filetime::FileTime;
use rustix::fs::Mode;
use std::fs::File;
use std::io;
use std::path::Path;

fn permission_bits(mode: u32) -> Mode {
    Mode::from_raw_mode(mode & 0o7777)
}

/// Applies permission bits to an open file via `fchmod`.
///
/// Used on freshly created destination files so the final mode is in place
/// before the first byte is written; the file is never visible at a looser
/// mode than either empty permissions or its final value.
pub fn set_file_mode(file: &File, mode: u32) -> io::Result<()> {
    rustix::fs::fchmod(file, permission_bits(mode)).map_err(io::Error::from)
}

/// Applies permission bits to `path` via `chmod`.
pub fn set_permissions(path: &Path, mode: u32) -> Result<(), MetadataError> {
    rustix::fs::chmod(path, permission_bits(mode)).map_err(|errno| MetadataError::Permissions {
        path: path.to_path_buf(),
        source: errno.into(),
    })
}

/// Applies access and modification times to an open file.
///
/// Must run after the last write to the file: writing bumps the modification
/// time as a side effect, so the fix-up is only stable once all data is out.
pub fn set_file_times(file: &File, atime: FileTime, mtime: FileTime) -> io::Result<()> {
    filetime::set_file_handle_times(file, Some(atime), Some(mtime))
}
