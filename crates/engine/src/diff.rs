//! Merge-join reconciliation of two sorted listings.
//!
//! Both passes walk a source and a destination list with one cursor each.
//! The lists must already be sorted by the same byte-wise name comparison;
//! the walk is a linear merge, never a search, and it never reorders its
//! inputs. A name only in the destination is deleted, a name only in the
//! source is created or copied, and a name in both is reconciled. Individual
//! failures are logged with the affected path and folded into the returned
//! failure count so every entry in both lists is still visited.

use crate::copy::copy_file;
use crate::dirops::{create_empty_directory, remove_directory_recursively};
use crate::path::ChildPath;
use logging_sink::LogSink;
use metadata::FileInfo;
use std::cmp::Ordering;
use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use walk::EntryList;

/// Shared inputs of one directory-level reconciliation.
pub(crate) struct DiffContext<'a> {
    pub source_dir: &'a Path,
    pub destination_dir: &'a Path,
    pub threshold: u64,
    pub log: &'a dyn LogSink,
}

fn compare_names(a: &OsStr, b: &OsStr) -> Ordering {
    a.as_encoded_bytes().cmp(b.as_encoded_bytes())
}

/// Reconciles the destination's files with the source's.
///
/// Returns the number of failed operations; zero means the level is clean.
pub(crate) fn reconcile_files(
    cx: &DiffContext<'_>,
    source: &EntryList,
    destination: &EntryList,
) -> u32 {
    let mut failures = 0;
    let mut src_path = ChildPath::new(cx.source_dir);
    let mut dst_path = ChildPath::new(cx.destination_dir);
    let mut src = source.iter().peekable();
    let mut dst = destination.iter().peekable();

    while let (Some(&s), Some(&d)) = (src.peek(), dst.peek()) {
        match compare_names(s.name(), d.name()) {
            Ordering::Greater => {
                delete_file(cx, dst_path.set(d.name()), &mut failures);
                dst.next();
            }
            Ordering::Less => {
                let spath = src_path.set(s.name());
                match FileInfo::query(spath) {
                    Err(error) => {
                        // The source vanished between listing and query;
                        // there is nothing to copy.
                        cx.log.line(&format!(
                            "copying file {} to directory {}; {}",
                            spath.display(),
                            cx.destination_dir.display(),
                            error.raw_os_error()
                        ));
                        failures += 1;
                    }
                    Ok(info) => {
                        copy_into(cx, spath, dst_path.set(s.name()), &info, &mut failures);
                    }
                }
                src.next();
            }
            Ordering::Equal => {
                let spath = src_path.set(s.name());
                match FileInfo::query(spath) {
                    Err(error) => {
                        cx.log.line(&format!(
                            "reading metadata of source file {}; {}",
                            spath.display(),
                            error.raw_os_error()
                        ));
                        failures += 1;
                    }
                    Ok(src_info) => {
                        let dpath = dst_path.set(d.name());
                        match FileInfo::query(dpath) {
                            Err(error) => {
                                cx.log.line(&format!(
                                    "reading metadata of destination file {}; {}",
                                    dpath.display(),
                                    error.raw_os_error()
                                ));
                                failures += 1;
                            }
                            Ok(dst_info) => {
                                if src_info.mtime() != dst_info.mtime() {
                                    // Stale either way: an earlier destination
                                    // is outdated, a later one was modified
                                    // behind our back. The source wins.
                                    let status =
                                        match copy_file(spath, dpath, &src_info, cx.threshold) {
                                            Ok(outcome) => outcome.code(),
                                            Err(error) => error.code(),
                                        };
                                    if status != 0 {
                                        failures += 1;
                                    }
                                    cx.log.line(&format!(
                                        "rewriting {} to {}; {status}",
                                        spath.display(),
                                        dpath.display()
                                    ));
                                } else if src_info.mode() != dst_info.mode() {
                                    let status = match metadata::set_permissions(
                                        dpath,
                                        src_info.mode(),
                                    ) {
                                        Ok(()) => 0,
                                        Err(error) => {
                                            failures += 1;
                                            error.raw_os_error()
                                        }
                                    };
                                    cx.log.line(&format!(
                                        "rewriting permissions of file {} to {}; {status}",
                                        spath.display(),
                                        dpath.display()
                                    ));
                                }
                            }
                        }
                    }
                }
                src.next();
                dst.next();
            }
        }
    }

    // Remaining destination entries have no source counterpart.
    for d in dst {
        delete_file(cx, dst_path.set(d.name()), &mut failures);
    }
    // Remaining source entries are missing from the destination.
    for s in src {
        let spath = src_path.set(s.name());
        match FileInfo::query(spath) {
            Err(error) => {
                cx.log.line(&format!(
                    "copying file {} to directory {}; {}",
                    spath.display(),
                    cx.destination_dir.display(),
                    error.raw_os_error()
                ));
                failures += 1;
            }
            Ok(info) => {
                copy_into(cx, spath, dst_path.set(s.name()), &info, &mut failures);
            }
        }
    }
    failures
}

/// Reconciles the destination's subdirectories with the source's.
///
/// Returns the failure count and a readiness flag per *sorted source*
/// subdirectory: `true` means the subdirectory exists (or was just created)
/// in the destination and is safe to descend into.
pub(crate) fn reconcile_directories(
    cx: &DiffContext<'_>,
    source: &EntryList,
    destination: &EntryList,
) -> (u32, Vec<bool>) {
    let mut failures = 0;
    let mut readiness = Vec::with_capacity(source.len());
    let mut src_path = ChildPath::new(cx.source_dir);
    let mut dst_path = ChildPath::new(cx.destination_dir);
    let mut src = source.iter().peekable();
    let mut dst = destination.iter().peekable();

    while let (Some(&s), Some(&d)) = (src.peek(), dst.peek()) {
        match compare_names(s.name(), d.name()) {
            Ordering::Greater => {
                delete_directory(cx, dst_path.set(d.name()), &mut failures);
                dst.next();
            }
            Ordering::Less => {
                let spath = src_path.set(s.name());
                match FileInfo::query(spath) {
                    Err(error) => {
                        // Without source metadata the directory cannot be
                        // created, and an uncreated directory must not be
                        // descended into.
                        cx.log.line(&format!(
                            "creating directory {}; {}",
                            dst_path.set(s.name()).display(),
                            error.raw_os_error()
                        ));
                        readiness.push(false);
                        failures += 1;
                    }
                    Ok(info) => {
                        readiness.push(create_directory(
                            cx,
                            dst_path.set(s.name()),
                            &info,
                            &mut failures,
                        ));
                    }
                }
                src.next();
            }
            Ordering::Equal => {
                let spath = src_path.set(s.name());
                match FileInfo::query(spath) {
                    Err(error) => {
                        // The destination directory exists, so descending is
                        // safe; the permissions are assumed to match.
                        cx.log.line(&format!(
                            "reading metadata of source directory {}; {}",
                            spath.display(),
                            error.raw_os_error()
                        ));
                        readiness.push(true);
                        failures += 1;
                    }
                    Ok(src_info) => {
                        readiness.push(true);
                        let dpath = dst_path.set(d.name());
                        match FileInfo::query(dpath) {
                            Err(error) => {
                                cx.log.line(&format!(
                                    "reading metadata of destination directory {}; {}",
                                    dpath.display(),
                                    error.raw_os_error()
                                ));
                                failures += 1;
                            }
                            Ok(dst_info) => {
                                // A directory's modification time changes on
                                // every child add or remove and says nothing
                                // about a sync need, since children are
                                // always walked anyway. Only the permission
                                // bits are reconciled.
                                if src_info.mode() != dst_info.mode() {
                                    let status = match metadata::set_permissions(
                                        dpath,
                                        src_info.mode(),
                                    ) {
                                        Ok(()) => 0,
                                        Err(error) => {
                                            failures += 1;
                                            error.raw_os_error()
                                        }
                                    };
                                    cx.log.line(&format!(
                                        "rewriting permissions of directory {} to {}; {status}",
                                        spath.display(),
                                        dpath.display()
                                    ));
                                }
                            }
                        }
                    }
                }
                src.next();
                dst.next();
            }
        }
    }

    for d in dst {
        delete_directory(cx, dst_path.set(d.name()), &mut failures);
    }
    for s in src {
        let spath = src_path.set(s.name());
        match FileInfo::query(spath) {
            Err(error) => {
                cx.log.line(&format!(
                    "creating directory {}; {}",
                    dst_path.set(s.name()).display(),
                    error.raw_os_error()
                ));
                readiness.push(false);
                failures += 1;
            }
            Ok(info) => {
                readiness.push(create_directory(
                    cx,
                    dst_path.set(s.name()),
                    &info,
                    &mut failures,
                ));
            }
        }
    }
    (failures, readiness)
}

fn delete_file(cx: &DiffContext<'_>, path: &Path, failures: &mut u32) {
    let status = match fs::remove_file(path) {
        Ok(()) => 0,
        Err(_) => {
            *failures += 1;
            -1
        }
    };
    cx.log
        .line(&format!("removing file {}; {status}", path.display()));
}

fn delete_directory(cx: &DiffContext<'_>, path: &Path, failures: &mut u32) {
    let status = match remove_directory_recursively(path) {
        Ok(()) => 0,
        Err(error) => {
            *failures += 1;
            error.code()
        }
    };
    cx.log
        .line(&format!("removing directory {}; {status}", path.display()));
}

fn copy_into(
    cx: &DiffContext<'_>,
    source: &Path,
    destination: &Path,
    info: &FileInfo,
    failures: &mut u32,
) {
    let status = match copy_file(source, destination, info, cx.threshold) {
        Ok(outcome) => outcome.code(),
        Err(error) => error.code(),
    };
    if status != 0 {
        *failures += 1;
    }
    cx.log.line(&format!(
        "copying file {} to directory {}; {status}",
        source.display(),
        cx.destination_dir.display()
    ));
}

fn create_directory(
    cx: &DiffContext<'_>,
    path: &Path,
    info: &FileInfo,
    failures: &mut u32,
) -> bool {
    let status = match create_empty_directory(path, info.mode()) {
        Ok(()) => 0,
        Err(_) => {
            *failures += 1;
            -1
        }
    };
    cx.log
        .line(&format!("creating directory {}; {status}", path.display()));
    status == 0
}
