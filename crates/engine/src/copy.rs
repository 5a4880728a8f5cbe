//! File-copy strategies.
//!
//! Two strategies reconcile one file: a buffered read/write loop for files
//! below the big-file threshold and a memory-mapped walk for everything at
//! or above it. Small files avoid the setup cost of a mapping; large files
//! skip one userspace-to-kernel round trip through the page cache. Both
//! preserve the source's permission bits and timestamps, and both retry
//! reads and writes interrupted by signal delivery.

use crate::error::{CopyError, CopyStatus};
use memmap2::{Advice, Mmap};
use metadata::FileInfo;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::os::fd::AsRawFd;
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

/// Fixed size of the staging buffer shared by both strategies.
pub const COPY_BUFFER_SIZE: usize = 128 * 1024;

/// Copies `source` to `destination` with the strategy selected by
/// `threshold`.
///
/// Files smaller than the threshold use the buffered loop; files at or
/// above it use the mapped walk. Mode and timestamps come from `info`,
/// which the caller queried from the source immediately before the call.
pub fn copy_file(
    source: &Path,
    destination: &Path,
    info: &FileInfo,
    threshold: u64,
) -> Result<CopyStatus, CopyError> {
    if info.len() < threshold {
        copy_small_file(source, destination, info)
    } else {
        copy_big_file(source, destination, info)
    }
}

/// Buffered copy for files below the big-file threshold.
///
/// The loop fills a fixed-size buffer with possibly-multiple reads until it
/// is full or the source is exhausted, then drains it with possibly-multiple
/// writes. A read returning zero bytes ends the copy.
pub fn copy_small_file(
    source: &Path,
    destination: &Path,
    info: &FileInfo,
) -> Result<CopyStatus, CopyError> {
    let mut input = File::open(source).map_err(|error| CopyError::OpenSource {
        path: source.to_path_buf(),
        source: error,
    })?;
    let mut output = open_destination(destination, info.mode())?;
    let status = advise_sequential(&input);

    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    loop {
        let (filled, eof) =
            fill_buffer(&mut input, &mut buffer).map_err(|error| CopyError::Read {
                path: source.to_path_buf(),
                source: error,
            })?;
        drain_buffer(&mut output, &buffer[..filled]).map_err(|error| CopyError::Write {
            path: destination.to_path_buf(),
            source: error,
        })?;
        if eof {
            break;
        }
    }

    apply_times(&output, destination, info)?;
    Ok(status)
}

/// Memory-mapped copy for files at or above the big-file threshold.
///
/// The source is mapped read-only and walked in fixed-size chunks, each
/// staged into a write buffer before it is flushed. Staging decouples write
/// retries from the mapping's lifetime; the mapping is released when it
/// drops, whether or not the writes succeeded.
pub fn copy_big_file(
    source: &Path,
    destination: &Path,
    info: &FileInfo,
) -> Result<CopyStatus, CopyError> {
    let input = File::open(source).map_err(|error| CopyError::OpenSource {
        path: source.to_path_buf(),
        source: error,
    })?;
    let mut output = open_destination(destination, info.mode())?;

    // SAFETY: the mapping is read-only. Truncation of the source while the
    // map is live would fault; external writers are a tolerated race of the
    // design, the same one the metadata queries accept.
    let map = unsafe { Mmap::map(&input) }.map_err(|error| CopyError::Map {
        path: source.to_path_buf(),
        source: error,
    })?;
    let status = if map.advise(Advice::Sequential).is_ok() {
        CopyStatus::Clean
    } else {
        CopyStatus::AdviceIgnored
    };

    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    for chunk in map.chunks(COPY_BUFFER_SIZE) {
        buffer[..chunk.len()].copy_from_slice(chunk);
        drain_buffer(&mut output, &buffer[..chunk.len()]).map_err(|error| CopyError::Write {
            path: destination.to_path_buf(),
            source: error,
        })?;
    }

    apply_times(&output, destination, info)?;
    Ok(status)
}

/// Creates the destination with no permission bits, then raises it to its
/// final mode before any data is written.
///
/// An existing destination is truncated and keeps its previous mode only
/// until the `fchmod`; a fresh one is never visible looser than mode 000.
fn open_destination(destination: &Path, mode: u32) -> Result<File, CopyError> {
    let output = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o000)
        .open(destination)
        .map_err(|error| CopyError::OpenDestination {
            path: destination.to_path_buf(),
            source: error,
        })?;
    metadata::set_file_mode(&output, mode).map_err(|error| CopyError::SetMode {
        path: destination.to_path_buf(),
        source: error,
    })?;
    Ok(output)
}

/// Tells the kernel the file will be read start to finish.
///
/// The copy works without the hint, just less efficiently, so a rejection
/// only downgrades the status.
fn advise_sequential(input: &File) -> CopyStatus {
    // SAFETY: the descriptor is open; POSIX_FADV_SEQUENTIAL only hints.
    let rc = unsafe { libc::posix_fadvise(input.as_raw_fd(), 0, 0, libc::POSIX_FADV_SEQUENTIAL) };
    if rc == 0 {
        CopyStatus::Clean
    } else {
        CopyStatus::AdviceIgnored
    }
}

/// Fills `buffer` from `input`, retrying interrupted reads.
///
/// Returns the number of bytes filled and whether end-of-file was reached.
fn fill_buffer(input: &mut File, buffer: &mut [u8]) -> std::io::Result<(usize, bool)> {
    let mut filled = 0;
    while filled < buffer.len() {
        match input.read(&mut buffer[filled..]) {
            Ok(0) => return Ok((filled, true)),
            Ok(read) => filled += read,
            Err(error) if error.kind() == ErrorKind::Interrupted => {}
            Err(error) => return Err(error),
        }
    }
    Ok((filled, false))
}

/// Writes all of `data` to `output`, retrying interrupted writes.
fn drain_buffer(output: &mut File, mut data: &[u8]) -> std::io::Result<()> {
    while !data.is_empty() {
        match output.write(data) {
            Ok(0) => return Err(ErrorKind::WriteZero.into()),
            Ok(written) => data = &data[written..],
            Err(error) if error.kind() == ErrorKind::Interrupted => {}
            Err(error) => return Err(error),
        }
    }
    Ok(())
}

/// Applies the source's timestamps to the finished destination.
///
/// Runs last: every write bumps the destination's modification time, so the
/// fix-up is only stable once all data is out.
fn apply_times(output: &File, destination: &Path, info: &FileInfo) -> Result<(), CopyError> {
    metadata::set_file_times(output, info.atime(), info.mtime()).map_err(|error| {
        CopyError::SetTimes {
            path: destination.to_path_buf(),
            source: error,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::FileTime;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    fn prepared_source(dir: &Path, name: &str, content: &[u8], mode: u32) -> FileInfo {
        let path = dir.join(name);
        fs::write(&path, content).expect("write source");
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).expect("chmod source");
        filetime::set_file_mtime(&path, FileTime::from_unix_time(1_234_567, 890)).expect("mtime");
        FileInfo::query(&path).expect("query source")
    }

    #[test]
    fn small_copy_preserves_content_mode_and_times() {
        let temp = tempfile::tempdir().expect("tempdir");
        let info = prepared_source(temp.path(), "src", b"small payload", 0o640);
        let source = temp.path().join("src");
        let destination = temp.path().join("dst");

        let status = copy_small_file(&source, &destination, &info).expect("copy succeeds");
        assert_eq!(status, CopyStatus::Clean);
        assert_eq!(fs::read(&destination).expect("read"), b"small payload");

        let copied = FileInfo::query(&destination).expect("query destination");
        assert_eq!(copied.permissions(), 0o640);
        assert_eq!(copied.mtime(), info.mtime());
        assert_eq!(copied.atime(), info.atime());
    }

    #[test]
    fn big_copy_handles_content_larger_than_the_buffer() {
        let temp = tempfile::tempdir().expect("tempdir");
        let content: Vec<u8> = (0..COPY_BUFFER_SIZE * 2 + 513)
            .map(|i| (i % 251) as u8)
            .collect();
        let info = prepared_source(temp.path(), "src", &content, 0o600);
        let source = temp.path().join("src");
        let destination = temp.path().join("dst");

        copy_big_file(&source, &destination, &info).expect("copy succeeds");
        assert_eq!(fs::read(&destination).expect("read"), content);
    }

    #[test]
    fn both_strategies_produce_identical_output() {
        let temp = tempfile::tempdir().expect("tempdir");
        let content: Vec<u8> = (0..40_000).map(|i| (i % 199) as u8).collect();
        let info = prepared_source(temp.path(), "src", &content, 0o644);
        let source = temp.path().join("src");

        let buffered = temp.path().join("buffered");
        let mapped = temp.path().join("mapped");
        copy_small_file(&source, &buffered, &info).expect("buffered copy");
        copy_big_file(&source, &mapped, &info).expect("mapped copy");
        assert_eq!(
            fs::read(&buffered).expect("read"),
            fs::read(&mapped).expect("read")
        );
    }

    #[test]
    fn threshold_boundary_selects_the_mapped_strategy() {
        // An empty source cannot be mapped, which makes the chosen strategy
        // observable: `size >= threshold` must pick the mapping and fail,
        // `size < threshold` must pick the buffered loop and succeed.
        let temp = tempfile::tempdir().expect("tempdir");
        let info = prepared_source(temp.path(), "src", b"", 0o644);
        let source = temp.path().join("src");
        let destination = temp.path().join("dst");

        let error = copy_file(&source, &destination, &info, 0).expect_err("mapping fails");
        assert!(matches!(error, CopyError::Map { .. }));
        assert_eq!(error.code(), -4);

        copy_file(&source, &destination, &info, 1).expect("buffered copy succeeds");
        assert_eq!(fs::read(&destination).expect("read").len(), 0);
    }

    #[test]
    fn an_existing_destination_is_truncated() {
        let temp = tempfile::tempdir().expect("tempdir");
        let info = prepared_source(temp.path(), "src", b"new", 0o644);
        let source = temp.path().join("src");
        let destination = temp.path().join("dst");
        fs::write(&destination, b"previous longer content").expect("seed destination");

        copy_small_file(&source, &destination, &info).expect("copy succeeds");
        assert_eq!(fs::read(&destination).expect("read"), b"new");
    }

    #[test]
    fn a_missing_source_is_a_critical_open_failure() {
        let temp = tempfile::tempdir().expect("tempdir");
        let info = prepared_source(temp.path(), "src", b"x", 0o644);
        let missing = temp.path().join("gone");
        let destination = temp.path().join("dst");

        let error = copy_small_file(&missing, &destination, &info).expect_err("open fails");
        assert!(matches!(error, CopyError::OpenSource { .. }));
        assert_eq!(error.code(), -1);
    }
}
