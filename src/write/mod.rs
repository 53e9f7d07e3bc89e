//! Archive writing API.
//!
//! [`Writer`] appends entries sequentially into a fresh container and
//! finalizes it with the central directory. A writer that is dropped
//! without [`finish`] leaves the destination without a trailing index,
//! which no reader in this crate will mistake for a complete archive.
//!
//! # Example
//!
//! ```rust
//! use std::io::Cursor;
//! use rezip::{EntryName, Writer, WriteOptions};
//!
//! # fn main() -> rezip::Result<()> {
//! let mut writer = Writer::create(Cursor::new(Vec::new()))?
//!     .options(WriteOptions::new().level(9)?);
//! writer.put_entry(EntryName::new("hello.txt")?, &mut &b"hello"[..])?;
//! let result = writer.finish()?;
//! assert_eq!(result.entries_written, 1);
//! # Ok(())
//! # }
//! ```

pub(crate) mod options;

pub use options::{WriteOptions, WriteResult};

use std::collections::HashSet;
use std::io::{Read, Seek, SeekFrom, Write};

use flate2::Compression;
use flate2::write::DeflateEncoder;

use crate::codec::{CompressionMethod, CountingWriter};
use crate::format::{CentralDirectoryRecord, LocalFileHeader, write_end_of_central_directory};
use crate::{EntryName, Error, READ_BUFFER_SIZE, Result};

/// A sequential archive writer.
///
/// Entries are appended one at a time with [`put_entry`]; the session's
/// compression level comes from [`WriteOptions`] and must be set before
/// the first entry. Appending a name twice in one session is a
/// [`DuplicateEntry`] error.
///
/// [`put_entry`]: Writer::put_entry
/// [`DuplicateEntry`]: Error::DuplicateEntry
pub struct Writer<W: Write + Seek> {
    sink: W,
    options: WriteOptions,
    records: Vec<CentralDirectoryRecord>,
    names: HashSet<String>,
    /// Byte offset of the next local header, from the start of the sink.
    offset: u64,
    total_size: u64,
    compressed_bytes: u64,
}

impl<W: Write + Seek> Writer<W> {
    /// Creates a writer over a fresh destination.
    ///
    /// The sink's current position becomes the start of the archive.
    pub fn create(mut sink: W) -> Result<Self> {
        let offset = sink.stream_position()?;
        Ok(Self {
            sink,
            options: WriteOptions::default(),
            records: Vec::new(),
            names: HashSet::new(),
            offset,
            total_size: 0,
            compressed_bytes: 0,
        })
    }

    /// Sets the write options for this session.
    ///
    /// Must be called before the first entry is appended; the level applies
    /// uniformly to all entries.
    pub fn options(mut self, options: WriteOptions) -> Self {
        debug_assert!(self.records.is_empty(), "options set after first entry");
        self.options = options;
        self
    }

    /// Returns `true` if `name` was already appended in this session.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Appends one entry, reading `source` to completion.
    ///
    /// Returns the number of uncompressed payload bytes written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateEntry`] if `name` was already appended in
    /// this session, [`Error::EntryTooLarge`] if the payload or the archive
    /// outgrows the container's 32-bit fields, and [`Error::Io`] on write
    /// failure. On error the destination is no longer a valid archive and
    /// must be discarded.
    pub fn put_entry<S: Read + ?Sized>(&mut self, name: EntryName, source: &mut S) -> Result<u64> {
        if !self.names.insert(name.as_str().to_string()) {
            return Err(Error::DuplicateEntry {
                name: name.as_str().to_string(),
            });
        }

        let method = self.options.method();
        let local_header_offset = self.offset;
        if local_header_offset > u64::from(u32::MAX) {
            return Err(Error::EntryTooLarge {
                name: name.as_str().to_string(),
                size: local_header_offset,
            });
        }

        let header_len =
            LocalFileHeader::write_placeholder(&mut self.sink, name.as_str(), method.code())?;

        let mut hasher = crc32fast::Hasher::new();
        let (uncompressed, compressed) = match method {
            CompressionMethod::Stored => {
                let mut buf = [0u8; READ_BUFFER_SIZE];
                let mut total = 0u64;
                loop {
                    let n = source.read(&mut buf)?;
                    if n == 0 {
                        break;
                    }
                    hasher.update(&buf[..n]);
                    self.sink.write_all(&buf[..n])?;
                    total += n as u64;
                }
                (total, total)
            }
            CompressionMethod::Deflated => {
                let counter = CountingWriter::new(&mut self.sink);
                let mut encoder =
                    DeflateEncoder::new(counter, Compression::new(self.options.level));
                let mut buf = [0u8; READ_BUFFER_SIZE];
                let mut total = 0u64;
                loop {
                    let n = source.read(&mut buf)?;
                    if n == 0 {
                        break;
                    }
                    hasher.update(&buf[..n]);
                    encoder.write_all(&buf[..n])?;
                    total += n as u64;
                }
                let counter = encoder.finish()?;
                (total, counter.bytes_written())
            }
        };
        let crc32 = hasher.finalize();

        if uncompressed > u64::from(u32::MAX) || compressed > u64::from(u32::MAX) {
            return Err(Error::EntryTooLarge {
                name: name.as_str().to_string(),
                size: uncompressed.max(compressed),
            });
        }

        // The header was written with zeroed CRC/size fields; patch them
        // now that the payload has been streamed.
        let data_end = local_header_offset + header_len + compressed;
        self.sink.seek(SeekFrom::Start(
            local_header_offset + LocalFileHeader::CRC_FIELD_OFFSET,
        ))?;
        self.sink.write_all(&crc32.to_le_bytes())?;
        self.sink.write_all(&(compressed as u32).to_le_bytes())?;
        self.sink.write_all(&(uncompressed as u32).to_le_bytes())?;
        self.sink.seek(SeekFrom::Start(data_end))?;

        self.records.push(CentralDirectoryRecord {
            name: name.as_str().to_string(),
            method: method.code(),
            crc32,
            compressed_size: compressed as u32,
            uncompressed_size: uncompressed as u32,
            local_header_offset: local_header_offset as u32,
        });
        self.offset = data_end;
        self.total_size += uncompressed;
        self.compressed_bytes += compressed;

        Ok(uncompressed)
    }

    /// Writes the central directory and closes the archive.
    pub fn finish(mut self) -> Result<WriteResult> {
        self.finalize()
    }

    /// Like [`finish`], but also hands back the sink.
    ///
    /// [`finish`]: Writer::finish
    pub fn finish_into_inner(mut self) -> Result<(WriteResult, W)> {
        let result = self.finalize()?;
        Ok((result, self.sink))
    }

    fn finalize(&mut self) -> Result<WriteResult> {
        let central_directory_offset = self.offset;
        let mut central_directory_size = 0u64;
        for record in &self.records {
            central_directory_size += record.write_to(&mut self.sink)?;
        }

        let entry_count: u16 = self
            .records
            .len()
            .try_into()
            .map_err(|_| Error::TooManyEntries {
                count: self.records.len(),
            })?;
        write_end_of_central_directory(
            &mut self.sink,
            entry_count,
            central_directory_size as u32,
            central_directory_offset as u32,
        )?;
        self.sink.flush()?;

        Ok(WriteResult {
            entries_written: self.records.len(),
            total_size: self.total_size,
            compressed_size: self.compressed_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_empty_archive() {
        let (result, cursor) = Writer::create(Cursor::new(Vec::new()))
            .unwrap()
            .finish_into_inner()
            .unwrap();
        assert_eq!(result.entries_written, 0);
        // Just the end-of-central-directory record.
        assert_eq!(cursor.into_inner().len(), 22);
    }

    #[test]
    fn test_single_entry_layout() {
        let mut writer = Writer::create(Cursor::new(Vec::new())).unwrap();
        writer
            .put_entry(EntryName::new("a.txt").unwrap(), &mut &b"hello"[..])
            .unwrap();
        let (result, cursor) = writer.finish_into_inner().unwrap();
        assert_eq!(result.entries_written, 1);
        assert_eq!(result.total_size, 5);

        let bytes = cursor.into_inner();
        assert_eq!(&bytes[..4], b"PK\x03\x04");
        // Patched sizes must be present in the local header.
        let uncompressed = u32::from_le_bytes(bytes[22..26].try_into().unwrap());
        assert_eq!(uncompressed, 5);
        assert_eq!(&bytes[bytes.len() - 22..bytes.len() - 18], b"PK\x05\x06");
    }

    #[test]
    fn test_stored_at_level_zero() {
        let mut writer = Writer::create(Cursor::new(Vec::new()))
            .unwrap()
            .options(WriteOptions::new().level(0).unwrap());
        writer
            .put_entry(EntryName::new("a.bin").unwrap(), &mut &b"abcdef"[..])
            .unwrap();
        let (result, cursor) = writer.finish_into_inner().unwrap();
        assert_eq!(result.compressed_size, result.total_size);

        let bytes = cursor.into_inner();
        let method = u16::from_le_bytes(bytes[8..10].try_into().unwrap());
        assert_eq!(method, CompressionMethod::Stored.code());
        // Stored payload appears verbatim right after the header.
        let name_len = u16::from_le_bytes(bytes[26..28].try_into().unwrap()) as usize;
        let payload_start = 30 + name_len;
        assert_eq!(&bytes[payload_start..payload_start + 6], b"abcdef");
    }

    #[test]
    fn test_duplicate_entry_rejected() {
        let mut writer = Writer::create(Cursor::new(Vec::new())).unwrap();
        writer
            .put_entry(EntryName::new("x").unwrap(), &mut &b"1"[..])
            .unwrap();
        let err = writer
            .put_entry(EntryName::new("x").unwrap(), &mut &b"2"[..])
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateEntry { .. }));
    }

    #[test]
    fn test_contains_tracks_session_names() {
        let mut writer = Writer::create(Cursor::new(Vec::new())).unwrap();
        assert!(!writer.contains("x"));
        writer
            .put_entry(EntryName::new("x").unwrap(), &mut &b"1"[..])
            .unwrap();
        assert!(writer.contains("x"));
    }
}
