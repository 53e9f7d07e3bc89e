//! Extraction of archive contents to a directory.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use super::reader::ArchiveReader;
use crate::Result;

/// Statistics from a completed extraction.
#[derive(Debug, Clone, Default)]
pub struct ExtractResult {
    /// Number of entries written to the destination (files and
    /// directories).
    pub entries_extracted: usize,
    /// Total uncompressed bytes written.
    pub bytes_extracted: u64,
}

/// Extracts every entry of the archive at `archive_path` beneath
/// `destination`.
///
/// The destination directory is created if absent, as is each entry's
/// parent chain. Entries are written in storage order; when two entries
/// decode to the same output path the later one overwrites the earlier.
/// Entry names are validated on read, so no entry can escape the
/// destination.
///
/// # Errors
///
/// Returns [`Error::WrongArchiveFile`] if `archive_path` is not an existing
/// regular file, and the reader's errors for corrupt content. The archive
/// itself is never modified; a failed extraction leaves whatever files were
/// already written.
///
/// [`Error::WrongArchiveFile`]: crate::Error::WrongArchiveFile
pub fn extract_all(archive_path: &Path, destination: &Path) -> Result<ExtractResult> {
    let mut reader = ArchiveReader::open_path(archive_path)?;

    if !destination.exists() {
        fs::create_dir_all(destination)?;
    }

    let mut result = ExtractResult::default();
    while let Some(entry) = reader.next_entry()? {
        let out_path = destination.join(entry.name.as_str());

        if entry.is_directory {
            fs::create_dir_all(&out_path)?;
            reader.finish_entry()?;
            result.entries_extracted += 1;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = File::create(&out_path)?;
        let copied = io::copy(&mut reader, &mut file)?;
        reader.finish_entry()?;

        result.entries_extracted += 1;
        result.bytes_extracted += copied;
    }

    log::debug!(
        "extracted {} entries ({} bytes) from {} to {}",
        result.entries_extracted,
        result.bytes_extracted,
        archive_path.display(),
        destination.display()
    );
    Ok(result)
}
