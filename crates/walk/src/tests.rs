use crate::{Entry, EntryKind, EntryList, list_files, list_files_and_directories};
use std::ffi::OsString;
use std::fs;
use std::os::unix::fs::symlink;
use std::path::Path;

fn names(list: &EntryList) -> Vec<String> {
    list.iter()
        .map(|entry| entry.name().to_string_lossy().into_owned())
        .collect()
}

fn sorted_names(mut list: EntryList) -> Vec<String> {
    list.sort_by_name();
    names(&list)
}

#[test]
fn list_files_keeps_only_regular_files() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path();
    fs::write(root.join("b.txt"), b"b").expect("write");
    fs::write(root.join("a.txt"), b"a").expect("write");
    fs::create_dir(root.join("sub")).expect("mkdir");
    symlink(root.join("a.txt"), root.join("link")).expect("symlink");

    let stream = fs::read_dir(root).expect("read_dir");
    let files = list_files(root, stream).expect("listing succeeds");
    assert_eq!(sorted_names(files), vec!["a.txt", "b.txt"]);
}

#[test]
fn list_files_and_directories_classifies_entries() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path();
    fs::write(root.join("file"), b"x").expect("write");
    fs::create_dir(root.join("inner")).expect("mkdir");
    fs::create_dir(root.join("another")).expect("mkdir");
    symlink(root.join("file"), root.join("alias")).expect("symlink");

    let stream = fs::read_dir(root).expect("read_dir");
    let (files, subdirs) =
        list_files_and_directories(root, stream).expect("listing succeeds");
    assert_eq!(sorted_names(files), vec!["file"]);
    assert_eq!(sorted_names(subdirs), vec!["another", "inner"]);
}

#[test]
fn listing_an_empty_directory_yields_empty_lists() {
    let temp = tempfile::tempdir().expect("tempdir");
    let stream = fs::read_dir(temp.path()).expect("read_dir");
    let (files, subdirs) =
        list_files_and_directories(temp.path(), stream).expect("listing succeeds");
    assert!(files.is_empty());
    assert!(subdirs.is_empty());
}

#[test]
fn sort_by_name_orders_byte_wise() {
    let mut list = EntryList::new();
    for name in ["b", "a", "B", "A", "aa"] {
        list.push(Entry::new(OsString::from(name), EntryKind::File));
    }
    list.sort_by_name();
    // ASCII uppercase sorts before lowercase in byte order.
    assert_eq!(names(&list), vec!["A", "B", "a", "aa", "b"]);
}

#[test]
fn clear_releases_all_entries() {
    let mut list = EntryList::new();
    list.push(Entry::new(OsString::from("x"), EntryKind::File));
    assert_eq!(list.len(), 1);
    list.clear();
    assert!(list.is_empty());
}

#[test]
fn entry_reports_its_kind() {
    let file = Entry::new(OsString::from("f"), EntryKind::File);
    let dir = Entry::new(OsString::from("d"), EntryKind::Directory);
    assert!(!file.is_directory());
    assert!(dir.is_directory());
    assert_eq!(file.kind(), EntryKind::File);
    assert_eq!(dir.name(), Path::new("d").as_os_str());
}
