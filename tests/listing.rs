//! Integration tests for the non-mutating listing operation.

mod common;

use std::fs;

use rezip::{ArchiveEditor, CompressionMethod, Error, WriteOptions};
use tempfile::TempDir;

use common::write_tree;

#[test]
fn test_listing_reports_drained_sizes() {
    let work = TempDir::new().unwrap();
    let source = work.path().join("src");
    let repetitive = b"abcdefgh".repeat(100);
    write_tree(
        &source,
        &[("hello.txt", b"hello"), ("rep.bin", repetitive.as_slice())],
    );

    let archive = work.path().join("a.zip");
    let editor = ArchiveEditor::new(&archive);
    editor.create(&source).unwrap();

    let mut listing = editor.list().unwrap();
    listing.sort_by(|a, b| a.name.cmp(&b.name));

    assert_eq!(listing.len(), 2);
    assert_eq!(listing[0].name.as_str(), "hello.txt");
    assert_eq!(listing[0].uncompressed_size, 5);
    assert_eq!(listing[0].method, CompressionMethod::Deflated);

    assert_eq!(listing[1].name.as_str(), "rep.bin");
    assert_eq!(listing[1].uncompressed_size, 800);
    // Repetitive data must actually compress.
    assert!(listing[1].compressed_size < listing[1].uncompressed_size);
}

#[test]
fn test_listing_stored_archive() {
    let work = TempDir::new().unwrap();
    let source = work.path().join("src");
    write_tree(&source, &[("raw.bin", b"uncompressed bytes")]);

    let archive = work.path().join("stored.zip");
    let editor = ArchiveEditor::new(&archive).options(WriteOptions::new().level(0).unwrap());
    editor.create(&source).unwrap();

    let listing = editor.list().unwrap();
    assert_eq!(listing[0].method, CompressionMethod::Stored);
    assert_eq!(listing[0].compressed_size, listing[0].uncompressed_size);
}

#[test]
fn test_listing_empty_archive() {
    let work = TempDir::new().unwrap();
    let source = work.path().join("empty");
    fs::create_dir_all(&source).unwrap();

    let archive = work.path().join("empty.zip");
    let editor = ArchiveEditor::new(&archive);
    editor.create(&source).unwrap();

    assert!(editor.list().unwrap().is_empty());
}

#[test]
fn test_listing_missing_archive() {
    let work = TempDir::new().unwrap();
    let editor = ArchiveEditor::new(work.path().join("absent.zip"));
    let err = editor.list().unwrap_err();
    assert!(matches!(err, Error::WrongArchiveFile { .. }));
}

#[test]
fn test_listing_directory_path_is_wrong_archive_file() {
    let work = TempDir::new().unwrap();
    let editor = ArchiveEditor::new(work.path());
    let err = editor.list().unwrap_err();
    assert!(matches!(err, Error::WrongArchiveFile { .. }));
}

#[test]
fn test_listing_does_not_mutate() {
    let work = TempDir::new().unwrap();
    let source = work.path().join("src");
    write_tree(&source, &[("a.txt", b"payload")]);

    let archive = work.path().join("a.zip");
    let editor = ArchiveEditor::new(&archive);
    editor.create(&source).unwrap();

    let before = fs::read(&archive).unwrap();
    for _ in 0..3 {
        editor.list().unwrap();
    }
    assert_eq!(fs::read(&archive).unwrap(), before);
}

#[test]
fn test_listing_corrupt_archive_fails() {
    let work = TempDir::new().unwrap();
    let archive = work.path().join("bogus.zip");
    fs::write(&archive, b"certainly not a zip container").unwrap();

    let editor = ArchiveEditor::new(&archive);
    let err = editor.list().unwrap_err();
    assert!(err.is_corruption(), "got: {err}");
}
