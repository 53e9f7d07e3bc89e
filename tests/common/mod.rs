//! Shared test utilities for integration tests.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test
//! file compiles as a separate crate and may only use a subset of these
//! helpers.

#![allow(dead_code)]

use std::fs;
use std::io::Read;
use std::path::Path;

use rezip::read::ArchiveReader;

/// Writes a file tree beneath `root`.
///
/// Each `(relative_path, content)` pair becomes one file; parent
/// directories are created as needed. Relative paths use `/` separators.
pub fn write_tree(root: &Path, files: &[(&str, &[u8])]) {
    for (relative, content) in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
    }
}

/// Reads an archive into `(entry name, decompressed content)` pairs, in
/// storage order.
pub fn read_archive_contents(path: &Path) -> rezip::Result<Vec<(String, Vec<u8>)>> {
    let mut reader = ArchiveReader::open_path(path)?;
    let mut contents = Vec::new();
    while let Some(entry) = reader.next_entry()? {
        let mut payload = Vec::new();
        reader.read_to_end(&mut payload)?;
        reader.finish_entry()?;
        contents.push((entry.name.as_str().to_string(), payload));
    }
    Ok(contents)
}

/// Returns the sorted entry names of an archive.
pub fn entry_names(path: &Path) -> Vec<String> {
    let mut names: Vec<String> = read_archive_contents(path)
        .unwrap()
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    names.sort();
    names
}

/// Returns the content stored under `name`, panicking if absent.
pub fn entry_content(path: &Path, name: &str) -> Vec<u8> {
    read_archive_contents(path)
        .unwrap()
        .into_iter()
        .find(|(n, _)| n == name)
        .unwrap_or_else(|| panic!("entry '{}' not found", name))
        .1
}
