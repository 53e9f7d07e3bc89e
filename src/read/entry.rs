//! Entry metadata types.

use crate::EntryName;
use crate::codec::CompressionMethod;

/// Header-level view of one archive entry, produced as the reader reaches
/// its local header.
///
/// Size and CRC fields are `None` when the producing writer deferred them
/// to a data descriptor; the definitive values become available once the
/// payload has been drained (see [`ArchiveReader::finish_entry`]).
///
/// [`ArchiveReader::finish_entry`]: crate::read::ArchiveReader::finish_entry
#[derive(Debug, Clone)]
pub struct Entry {
    /// The entry's validated name.
    pub name: EntryName,
    /// Whether the raw name denoted a directory (trailing slash).
    pub is_directory: bool,
    /// Payload encoding.
    pub method: CompressionMethod,
    /// CRC-32 from the local header, if present there.
    pub crc32: Option<u32>,
    /// Compressed size from the local header, if present there.
    pub compressed_size: Option<u64>,
    /// Uncompressed size from the local header, if present there.
    pub uncompressed_size: Option<u64>,
}

/// Point-in-time metadata snapshot for one entry, as reported by listing.
///
/// Sizes are the values observed by fully draining the payload, so they are
/// reliable even for archives whose local headers defer sizes to data
/// descriptors. Snapshots are never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryMetadata {
    /// The entry's name.
    pub name: EntryName,
    /// Uncompressed payload size in bytes.
    pub uncompressed_size: u64,
    /// Compressed payload size in bytes.
    pub compressed_size: u64,
    /// Payload encoding.
    pub method: CompressionMethod,
}

/// Observed sizes of a fully drained payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntrySizes {
    /// Compressed bytes consumed from the container.
    pub compressed: u64,
    /// Uncompressed bytes produced.
    pub uncompressed: u64,
    /// CRC-32 of the uncompressed payload.
    pub crc32: u32,
}
