//! Non-mutating archive listing.

use std::path::Path;

use super::entry::EntryMetadata;
use super::reader::ArchiveReader;
use crate::Result;

/// Lists every entry of the archive at `path`, in storage order.
///
/// Each payload is fully drained (and discarded) so the reported sizes are
/// the observed ones, reliable even when a local header defers its sizes to
/// a data descriptor. Draining also CRC-checks every entry, so a corrupt
/// archive fails here instead of listing garbage.
///
/// # Errors
///
/// Returns [`Error::WrongArchiveFile`] if `path` is not an existing regular
/// file, and the reader's errors for corrupt or unsupported content.
///
/// [`Error::WrongArchiveFile`]: crate::Error::WrongArchiveFile
pub fn list_entries(path: &Path) -> Result<Vec<EntryMetadata>> {
    let mut reader = ArchiveReader::open_path(path)?;
    let mut entries = Vec::new();
    while let Some(entry) = reader.next_entry()? {
        let sizes = reader.finish_entry()?;
        entries.push(EntryMetadata {
            name: entry.name,
            uncompressed_size: sizes.uncompressed,
            compressed_size: sizes.compressed,
            method: entry.method,
        });
    }
    log::debug!("listed {} entries from {}", entries.len(), path.display());
    Ok(entries)
}
