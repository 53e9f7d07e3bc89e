//! Round-trip tests: archives created from a file tree extract back to an
//! identical tree.

mod common;

use std::fs;

use rezip::{ArchiveEditor, Error, WriteOptions};
use tempfile::TempDir;

use common::{entry_names, read_archive_contents, write_tree};

#[test]
fn test_create_then_extract_reproduces_tree() {
    let work = TempDir::new().unwrap();
    let source = work.path().join("source");
    let files: &[(&str, &[u8])] = &[
        ("a.txt", b"alpha"),
        ("sub/b.txt", b"bravo bravo"),
        ("sub/deeper/c.bin", &[0u8, 1, 2, 3, 255, 254]),
        ("empty.dat", b""),
    ];
    write_tree(&source, files);

    let archive = work.path().join("out.zip");
    let editor = ArchiveEditor::new(&archive);
    let result = editor.create(&source).unwrap();
    assert_eq!(result.entries_written, 4);

    let restored = work.path().join("restored");
    let extract = editor.extract_all(&restored).unwrap();
    assert_eq!(extract.entries_extracted, 4);

    for (relative, content) in files {
        let actual = fs::read(restored.join(relative)).unwrap();
        assert_eq!(&actual, content, "content mismatch for '{}'", relative);
    }
}

#[test]
fn test_concrete_two_file_scenario() {
    // Create from a directory holding a.txt ("hello") and sub/b.txt
    // ("world"); list, remove a.txt, extract the remainder.
    let work = TempDir::new().unwrap();
    let source = work.path().join("input");
    write_tree(&source, &[("a.txt", b"hello"), ("sub/b.txt", b"world")]);

    let archive = work.path().join("two.zip");
    let editor = ArchiveEditor::new(&archive);
    editor.create(&source).unwrap();

    let mut listing = editor.list().unwrap();
    listing.sort_by(|a, b| a.name.cmp(&b.name));
    assert_eq!(listing.len(), 2);
    assert_eq!(listing[0].name.as_str(), "a.txt");
    assert_eq!(listing[0].uncompressed_size, 5);
    assert_eq!(listing[1].name.as_str(), "sub/b.txt");
    assert_eq!(listing[1].uncompressed_size, 5);

    let removed = editor.remove_file("a.txt").unwrap();
    assert_eq!(removed.entries_removed, 1);
    assert_eq!(removed.entries_kept, 1);
    assert_eq!(entry_names(&archive), vec!["sub/b.txt".to_string()]);

    let dest = work.path().join("f");
    editor.extract_all(&dest).unwrap();
    assert_eq!(fs::read(dest.join("sub/b.txt")).unwrap(), b"world");
    assert!(!dest.join("a.txt").exists());
}

#[test]
fn test_create_from_single_file_uses_base_name() {
    let work = TempDir::new().unwrap();
    let source = work.path().join("nested/dir/report.txt");
    fs::create_dir_all(source.parent().unwrap()).unwrap();
    fs::write(&source, b"quarterly numbers").unwrap();

    let archive = work.path().join("single.zip");
    ArchiveEditor::new(&archive).create(&source).unwrap();

    let contents = read_archive_contents(&archive).unwrap();
    assert_eq!(contents.len(), 1);
    assert_eq!(contents[0].0, "report.txt");
    assert_eq!(contents[0].1, b"quarterly numbers");
}

#[test]
fn test_create_missing_source_fails_without_touching_destination() {
    let work = TempDir::new().unwrap();
    let archive = work.path().join("never.zip");
    let err = ArchiveEditor::new(&archive)
        .create(&work.path().join("no-such-source"))
        .unwrap_err();
    assert!(matches!(err, Error::PathNotFound { .. }));
    assert!(!archive.exists());
}

#[test]
fn test_create_makes_parent_directories() {
    let work = TempDir::new().unwrap();
    let source = work.path().join("src");
    write_tree(&source, &[("x.txt", b"x")]);

    let archive = work.path().join("deep/path/to/out.zip");
    ArchiveEditor::new(&archive).create(&source).unwrap();
    assert!(archive.is_file());
}

#[test]
fn test_create_replaces_existing_archive() {
    let work = TempDir::new().unwrap();
    let first = work.path().join("first");
    let second = work.path().join("second");
    write_tree(&first, &[("one.txt", b"1")]);
    write_tree(&second, &[("two.txt", b"2")]);

    let archive = work.path().join("out.zip");
    let editor = ArchiveEditor::new(&archive);
    editor.create(&first).unwrap();
    editor.create(&second).unwrap();

    assert_eq!(entry_names(&archive), vec!["two.txt".to_string()]);
}

#[test]
fn test_roundtrip_at_level_bounds() {
    let work = TempDir::new().unwrap();
    let source = work.path().join("src");
    let payload = b"the quick brown fox jumps over the lazy dog".repeat(20);
    write_tree(&source, &[("fox.txt", &payload)]);

    for level in [0u32, 9] {
        let archive = work.path().join(format!("level{}.zip", level));
        let editor =
            ArchiveEditor::new(&archive).options(WriteOptions::new().level(level).unwrap());
        editor.create(&source).unwrap();

        let restored = work.path().join(format!("restored{}", level));
        editor.extract_all(&restored).unwrap();
        assert_eq!(fs::read(restored.join("fox.txt")).unwrap(), payload);
    }
}

#[test]
fn test_extract_missing_archive_is_wrong_archive_file() {
    let work = TempDir::new().unwrap();
    let editor = ArchiveEditor::new(work.path().join("absent.zip"));
    let err = editor.extract_all(&work.path().join("out")).unwrap_err();
    assert!(matches!(err, Error::WrongArchiveFile { .. }));
    assert!(!work.path().join("out").exists());
}

#[test]
fn test_extract_creates_destination() {
    let work = TempDir::new().unwrap();
    let source = work.path().join("src");
    write_tree(&source, &[("f.txt", b"data")]);

    let archive = work.path().join("a.zip");
    let editor = ArchiveEditor::new(&archive);
    editor.create(&source).unwrap();

    let dest = work.path().join("brand/new/dest");
    editor.extract_all(&dest).unwrap();
    assert_eq!(fs::read(dest.join("f.txt")).unwrap(), b"data");
}
