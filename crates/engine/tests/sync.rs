//! End-to-end passes over real temporary trees.

use engine::{SyncError, SyncMode, SyncOptions, synchronize};
use filetime::FileTime;
use logging_sink::MemorySink;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

fn options(mode: SyncMode) -> SyncOptions {
    SyncOptions {
        threshold: u64::MAX,
        mode,
    }
}

fn roots(temp: &tempfile::TempDir) -> (std::path::PathBuf, std::path::PathBuf) {
    let source = temp.path().join("source");
    let destination = temp.path().join("destination");
    fs::create_dir(&source).expect("mkdir source");
    fs::create_dir(&destination).expect("mkdir destination");
    (source, destination)
}

fn mode_of(path: &Path) -> u32 {
    fs::metadata(path).expect("stat").permissions().mode() & 0o7777
}

fn mtime_of(path: &Path) -> FileTime {
    FileTime::from_last_modification_time(&fs::metadata(path).expect("stat"))
}

#[test]
fn basic_sync_copies_all_files() {
    let temp = tempfile::tempdir().expect("tempdir");
    let (source, destination) = roots(&temp);
    fs::write(source.join("a.txt"), b"1").expect("write");
    fs::write(source.join("b.txt"), b"second").expect("write");
    fs::set_permissions(&source.join("a.txt"), fs::Permissions::from_mode(0o640))
        .expect("chmod");

    let log = MemorySink::new();
    synchronize(&source, &destination, options(SyncMode::Flat), &log).expect("pass succeeds");

    assert_eq!(fs::read(destination.join("a.txt")).expect("read"), b"1");
    assert_eq!(
        fs::read(destination.join("b.txt")).expect("read"),
        b"second"
    );
    assert_eq!(mode_of(&destination.join("a.txt")), 0o640);
    assert_eq!(
        mtime_of(&destination.join("a.txt")),
        mtime_of(&source.join("a.txt"))
    );
}

#[test]
fn deletion_removes_stale_entries_and_leaves_matches_untouched() {
    let temp = tempfile::tempdir().expect("tempdir");
    let (source, destination) = roots(&temp);
    fs::write(source.join("a.txt"), b"keep").expect("write");

    // First pass populates the destination, second pass sees a stale extra.
    let log = MemorySink::new();
    synchronize(&source, &destination, options(SyncMode::Flat), &log).expect("seed pass");
    fs::write(destination.join("stale.txt"), b"old").expect("write stale");
    let kept_mtime = mtime_of(&destination.join("a.txt"));

    let log = MemorySink::new();
    synchronize(&source, &destination, options(SyncMode::Flat), &log).expect("pass succeeds");

    assert!(!destination.join("stale.txt").exists());
    assert_eq!(mtime_of(&destination.join("a.txt")), kept_mtime);
    let lines = log.lines();
    assert!(lines.iter().any(|line| line.contains("stale.txt")));
    assert!(lines.iter().all(|line| !line.contains("a.txt")));
}

#[test]
fn a_second_pass_with_no_changes_performs_no_operations() {
    let temp = tempfile::tempdir().expect("tempdir");
    let (source, destination) = roots(&temp);
    fs::create_dir(source.join("d")).expect("mkdir");
    fs::write(source.join("top.txt"), b"top").expect("write");
    fs::write(source.join("d/x.txt"), b"x").expect("write");

    let log = MemorySink::new();
    synchronize(&source, &destination, options(SyncMode::Recursive), &log).expect("seed pass");

    let log = MemorySink::new();
    synchronize(&source, &destination, options(SyncMode::Recursive), &log)
        .expect("second pass succeeds");
    assert!(log.lines().is_empty(), "unexpected operations: {:?}", log.lines());
}

#[test]
fn merge_classifies_delete_create_and_reconcile_correctly() {
    let temp = tempfile::tempdir().expect("tempdir");
    let (source, destination) = roots(&temp);
    fs::write(source.join("common.txt"), b"c").expect("write");

    let log = MemorySink::new();
    synchronize(&source, &destination, options(SyncMode::Flat), &log).expect("seed pass");

    fs::write(source.join("added.txt"), b"a").expect("write");
    fs::write(destination.join("dropped.txt"), b"d").expect("write");

    let log = MemorySink::new();
    synchronize(&source, &destination, options(SyncMode::Flat), &log).expect("pass succeeds");

    assert!(destination.join("added.txt").exists());
    assert!(!destination.join("dropped.txt").exists());
    let lines = log.lines();
    assert!(lines.iter().any(|line| line.starts_with("copying file") && line.contains("added.txt")));
    assert!(lines.iter().any(|line| line.starts_with("removing file") && line.contains("dropped.txt")));
    assert!(lines.iter().all(|line| !line.contains("common.txt")));
}

#[test]
fn a_modified_destination_is_rewritten_from_the_source() {
    let temp = tempfile::tempdir().expect("tempdir");
    let (source, destination) = roots(&temp);
    fs::write(source.join("f"), b"source wins").expect("write");

    let log = MemorySink::new();
    synchronize(&source, &destination, options(SyncMode::Flat), &log).expect("seed pass");

    // A destination modified behind the daemon's back carries a later mtime;
    // the source still wins.
    fs::write(destination.join("f"), b"local edit").expect("write");
    filetime::set_file_mtime(destination.join("f"), FileTime::from_unix_time(4_000_000_000, 0))
        .expect("mtime");

    let log = MemorySink::new();
    synchronize(&source, &destination, options(SyncMode::Flat), &log).expect("pass succeeds");

    assert_eq!(fs::read(destination.join("f")).expect("read"), b"source wins");
    assert!(log.lines().iter().any(|line| line.starts_with("rewriting ")));
}

#[test]
fn a_mode_only_difference_is_fixed_without_recopying() {
    let temp = tempfile::tempdir().expect("tempdir");
    let (source, destination) = roots(&temp);
    fs::write(source.join("f"), b"same").expect("write");

    let log = MemorySink::new();
    synchronize(&source, &destination, options(SyncMode::Flat), &log).expect("seed pass");

    fs::set_permissions(&destination.join("f"), fs::Permissions::from_mode(0o777))
        .expect("chmod");

    let log = MemorySink::new();
    synchronize(&source, &destination, options(SyncMode::Flat), &log).expect("pass succeeds");

    assert_eq!(mode_of(&destination.join("f")), mode_of(&source.join("f")));
    let lines = log.lines();
    assert!(lines.iter().any(|line| line.starts_with("rewriting permissions of file")));
    assert!(lines.iter().all(|line| !line.starts_with("rewriting /")));
}

#[test]
fn recursive_pass_creates_ready_subdirectories_and_descends() {
    let temp = tempfile::tempdir().expect("tempdir");
    let (source, destination) = roots(&temp);
    fs::create_dir(source.join("d")).expect("mkdir");
    fs::set_permissions(&source.join("d"), fs::Permissions::from_mode(0o750)).expect("chmod");
    fs::write(source.join("d/x.txt"), b"nested").expect("write");

    let log = MemorySink::new();
    synchronize(&source, &destination, options(SyncMode::Recursive), &log)
        .expect("pass succeeds");

    assert_eq!(
        fs::read(destination.join("d/x.txt")).expect("read"),
        b"nested"
    );

    // mkdir honors the process umask; the next pass reconciles any
    // permission drift the mask introduced.
    let log = MemorySink::new();
    synchronize(&source, &destination, options(SyncMode::Recursive), &log)
        .expect("second pass succeeds");
    assert_eq!(mode_of(&destination.join("d")), 0o750);
}

#[test]
fn recursive_pass_deletes_destination_only_subtrees() {
    let temp = tempfile::tempdir().expect("tempdir");
    let (source, destination) = roots(&temp);
    fs::create_dir_all(destination.join("gone/deeper")).expect("mkdirs");
    fs::write(destination.join("gone/deeper/f"), b"f").expect("write");

    let log = MemorySink::new();
    synchronize(&source, &destination, options(SyncMode::Recursive), &log)
        .expect("pass succeeds");

    assert!(!destination.join("gone").exists());
    assert!(
        log.lines()
            .iter()
            .any(|line| line.starts_with("removing directory") && line.ends_with("; 0"))
    );
}

#[test]
fn directory_permission_drift_is_reconciled_without_descending_changes() {
    let temp = tempfile::tempdir().expect("tempdir");
    let (source, destination) = roots(&temp);
    fs::create_dir(source.join("d")).expect("mkdir");

    let log = MemorySink::new();
    synchronize(&source, &destination, options(SyncMode::Recursive), &log).expect("seed pass");

    fs::set_permissions(&destination.join("d"), fs::Permissions::from_mode(0o700))
        .expect("chmod");

    let log = MemorySink::new();
    synchronize(&source, &destination, options(SyncMode::Recursive), &log)
        .expect("pass succeeds");

    assert_eq!(mode_of(&destination.join("d")), mode_of(&source.join("d")));
    assert!(
        log.lines()
            .iter()
            .any(|line| line.starts_with("rewriting permissions of directory"))
    );
}

#[test]
fn convergence_after_mixed_source_changes() {
    let temp = tempfile::tempdir().expect("tempdir");
    let (source, destination) = roots(&temp);
    fs::create_dir(source.join("keep")).expect("mkdir");
    fs::create_dir(source.join("drop")).expect("mkdir");
    fs::write(source.join("keep/old.txt"), b"old").expect("write");
    fs::write(source.join("changed.txt"), b"v1").expect("write");

    let log = MemorySink::new();
    synchronize(&source, &destination, options(SyncMode::Recursive), &log).expect("seed pass");

    // Additions, removals, and modifications applied to the source.
    fs::remove_dir(source.join("drop")).expect("rmdir");
    fs::write(source.join("changed.txt"), b"v2 longer").expect("write");
    fs::write(source.join("keep/new.txt"), b"new").expect("write");
    fs::create_dir(source.join("fresh")).expect("mkdir");
    fs::write(source.join("fresh/leaf.txt"), b"leaf").expect("write");

    let log = MemorySink::new();
    synchronize(&source, &destination, options(SyncMode::Recursive), &log)
        .expect("pass succeeds");

    assert!(!destination.join("drop").exists());
    assert_eq!(
        fs::read(destination.join("changed.txt")).expect("read"),
        b"v2 longer"
    );
    assert_eq!(
        fs::read(destination.join("keep/new.txt")).expect("read"),
        b"new"
    );
    assert_eq!(
        fs::read(destination.join("fresh/leaf.txt")).expect("read"),
        b"leaf"
    );
    assert_eq!(
        mtime_of(&destination.join("changed.txt")),
        mtime_of(&source.join("changed.txt"))
    );
}

#[test]
fn a_missing_source_root_aborts_the_level() {
    let temp = tempfile::tempdir().expect("tempdir");
    let destination = temp.path().join("destination");
    fs::create_dir(&destination).expect("mkdir");

    let log = MemorySink::new();
    let error = synchronize(
        &temp.path().join("absent"),
        &destination,
        options(SyncMode::Flat),
        &log,
    )
    .expect_err("pass fails");
    assert!(matches!(error, SyncError::OpenSource { .. }));
    assert_eq!(error.code(), -1);
    assert!(log.lines().is_empty());
}

#[test]
fn flat_mode_ignores_subdirectories_entirely() {
    let temp = tempfile::tempdir().expect("tempdir");
    let (source, destination) = roots(&temp);
    fs::create_dir(source.join("sub")).expect("mkdir");
    fs::write(source.join("sub/inner.txt"), b"i").expect("write");
    fs::write(source.join("top.txt"), b"t").expect("write");

    let log = MemorySink::new();
    synchronize(&source, &destination, options(SyncMode::Flat), &log).expect("pass succeeds");

    assert!(destination.join("top.txt").exists());
    assert!(!destination.join("sub").exists());
}
