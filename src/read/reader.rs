//! Sequential, storage-order archive reading.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use crate::codec::{CompressionMethod, Inflater};
use crate::format::{
    CENTRAL_DIRECTORY_SIG, DataDescriptor, END_OF_CENTRAL_DIRECTORY_SIG, FLAG_DATA_DESCRIPTOR,
    FLAG_ENCRYPTED, LOCAL_FILE_HEADER_SIG, LocalFileHeader,
};
use crate::{EntryName, Error, READ_BUFFER_SIZE, Result};

use super::entry::{Entry, EntrySizes};

/// A sequential reader over the entries of an archive.
///
/// Entries are visited strictly in storage order, each at most once per
/// pass; the reader holds at most one live payload at a time. Between
/// [`next_entry`] calls the reader itself is the current entry's payload
/// stream: its [`Read`] implementation yields the decompressed bytes and
/// returns `Ok(0)` once the payload is exhausted. Calling [`next_entry`]
/// skips whatever remains of the current payload.
///
/// Two independent passes over the same archive require two reader
/// instances.
///
/// [`next_entry`]: ArchiveReader::next_entry
///
/// # Example
///
/// ```rust,no_run
/// use std::io::Read;
/// use rezip::read::ArchiveReader;
///
/// # fn main() -> rezip::Result<()> {
/// let mut reader = ArchiveReader::open_path("data.zip".as_ref())?;
/// while let Some(entry) = reader.next_entry()? {
///     let mut payload = Vec::new();
///     reader.read_to_end(&mut payload)?;
///     println!("{}: {} bytes", entry.name, payload.len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ArchiveReader<R: BufRead> {
    inner: R,
    /// Bytes consumed from the start of the stream.
    offset: u64,
    state: State,
    finished: bool,
}

#[derive(Debug)]
enum State {
    Idle,
    InEntry(Box<InEntry>),
    Drained(EntrySizes),
}

#[derive(Debug)]
struct InEntry {
    /// Offset of this entry's local header, for error reporting.
    entry_offset: u64,
    hasher: crc32fast::Hasher,
    payload: Payload,
    has_descriptor: bool,
    expected_crc: Option<u32>,
    expected_compressed: Option<u64>,
    expected_uncompressed: Option<u64>,
    uncompressed_read: u64,
}

#[derive(Debug)]
enum Payload {
    Stored { total: u64, remaining: u64 },
    Deflated(Inflater),
}

/// Reads one chunk of the current payload. Split out as a free function so
/// both the `Read` impl and the drain loop can hold disjoint borrows of the
/// reader's fields.
fn read_current<R: BufRead>(
    inner: &mut R,
    current: &mut InEntry,
    buf: &mut [u8],
) -> io::Result<usize> {
    let n = match &mut current.payload {
        Payload::Stored { remaining, .. } => {
            if *remaining == 0 {
                return Ok(0);
            }
            let want = buf.len().min(usize::try_from(*remaining).unwrap_or(usize::MAX));
            let n = inner.read(&mut buf[..want])?;
            if n == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "stored payload truncated",
                ));
            }
            *remaining -= n as u64;
            n
        }
        Payload::Deflated(inflater) => inflater.read(inner, buf)?,
    };
    if n > 0 {
        current.hasher.update(&buf[..n]);
        current.uncompressed_read += n as u64;
    }
    Ok(n)
}

impl ArchiveReader<BufReader<File>> {
    /// Opens an archive file for sequential reading.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WrongArchiveFile`] if `path` does not reference an
    /// existing regular file. This check runs before any bytes are read.
    pub fn open_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::wrong_archive_file(path));
        }
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> ArchiveReader<R> {
    /// Creates a reader over an already-open stream positioned at the start
    /// of the archive.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            offset: 0,
            state: State::Idle,
            finished: false,
        }
    }

    /// Advances to the next entry, skipping any unread remainder of the
    /// current payload.
    ///
    /// Returns `Ok(None)` at the end of the entry sequence (the start of
    /// the central directory, or end of input).
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptEntry`] for a malformed local header or a
    /// current payload that disagrees with its recorded sizes or CRC,
    /// [`Error::UnsupportedMethod`] / [`Error::UnsupportedFeature`] for
    /// entries outside the supported subset, and [`Error::Io`] on read
    /// failure.
    pub fn next_entry(&mut self) -> Result<Option<Entry>> {
        if self.finished {
            return Ok(None);
        }
        if matches!(self.state, State::InEntry(_)) {
            self.finish_entry()?;
        }
        self.state = State::Idle;

        // Clean end of input before a signature is an empty remainder.
        if self.inner.fill_buf()?.is_empty() {
            self.finished = true;
            return Ok(None);
        }

        let entry_offset = self.offset;
        let signature = crate::format::read_u32_le(&mut self.inner).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                Error::corrupt_entry(entry_offset, "truncated header signature")
            } else {
                Error::Io(e)
            }
        })?;
        self.offset += 4;

        match signature {
            LOCAL_FILE_HEADER_SIG => {}
            CENTRAL_DIRECTORY_SIG | END_OF_CENTRAL_DIRECTORY_SIG => {
                self.finished = true;
                return Ok(None);
            }
            _ => {
                return Err(Error::corrupt_entry(
                    entry_offset,
                    "bad local header signature",
                ));
            }
        }

        let (header, consumed) =
            LocalFileHeader::read_after_signature(&mut self.inner).map_err(|e| {
                if e.kind() == io::ErrorKind::UnexpectedEof {
                    Error::corrupt_entry(entry_offset, "truncated local header")
                } else {
                    Error::Io(e)
                }
            })?;
        self.offset += consumed;

        if header.flags & FLAG_ENCRYPTED != 0 {
            return Err(Error::UnsupportedFeature {
                feature: "encrypted entries",
            });
        }

        let raw_name = String::from_utf8(header.name_raw)
            .map_err(|_| Error::corrupt_entry(entry_offset, "entry name is not valid UTF-8"))?
            .replace('\\', "/");
        let (name_str, is_directory) = match raw_name.strip_suffix('/') {
            Some(stripped) => (stripped, true),
            None => (raw_name.as_str(), false),
        };
        let name = EntryName::new(name_str)
            .map_err(|e| Error::corrupt_entry(entry_offset, e.to_string()))?;

        let method = CompressionMethod::from_code(header.method)?;
        let has_descriptor = header.flags & FLAG_DATA_DESCRIPTOR != 0;
        let sizes_in_header = !has_descriptor
            || header.compressed_size != 0
            || header.uncompressed_size != 0;

        let (expected_crc, expected_compressed, expected_uncompressed) = if sizes_in_header {
            (
                (!has_descriptor).then_some(header.crc32),
                Some(u64::from(header.compressed_size)),
                Some(u64::from(header.uncompressed_size)),
            )
        } else {
            (None, None, None)
        };

        let payload = match method {
            CompressionMethod::Stored => {
                let Some(total) = expected_compressed else {
                    return Err(Error::corrupt_entry(
                        entry_offset,
                        "stored entry with deferred sizes",
                    ));
                };
                Payload::Stored {
                    total,
                    remaining: total,
                }
            }
            // Some producers mark zero-length entries as deflated with no
            // payload bytes at all; there is nothing to inflate.
            CompressionMethod::Deflated
                if expected_compressed == Some(0) && expected_uncompressed == Some(0) =>
            {
                Payload::Stored {
                    total: 0,
                    remaining: 0,
                }
            }
            CompressionMethod::Deflated => Payload::Deflated(Inflater::new()),
        };

        let entry = Entry {
            name,
            is_directory,
            method,
            crc32: expected_crc,
            compressed_size: expected_compressed,
            uncompressed_size: expected_uncompressed,
        };

        self.state = State::InEntry(Box::new(InEntry {
            entry_offset,
            hasher: crc32fast::Hasher::new(),
            payload,
            has_descriptor,
            expected_crc,
            expected_compressed,
            expected_uncompressed,
            uncompressed_read: 0,
        }));

        Ok(Some(entry))
    }

    /// Drains the remainder of the current payload, verifies sizes and
    /// CRC-32, and returns the observed sizes.
    ///
    /// After a payload has been drained (by this method or by reading the
    /// payload to its end and then calling this), repeated calls return the
    /// same sizes until [`next_entry`] advances.
    ///
    /// [`next_entry`]: ArchiveReader::next_entry
    pub fn finish_entry(&mut self) -> Result<EntrySizes> {
        let Self {
            inner,
            state,
            offset,
            ..
        } = self;

        let current = match state {
            State::Drained(sizes) => return Ok(*sizes),
            State::Idle => {
                return Err(Error::Io(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "no current entry",
                )));
            }
            State::InEntry(current) => current,
        };

        let mut scratch = [0u8; READ_BUFFER_SIZE];
        loop {
            match read_current(inner, current, &mut scratch) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::UnexpectedEof | io::ErrorKind::InvalidData
                    ) =>
                {
                    return Err(Error::corrupt_entry(current.entry_offset, e.to_string()));
                }
                Err(e) => return Err(Error::Io(e)),
            }
        }

        let compressed = match &current.payload {
            Payload::Stored { total, .. } => *total,
            Payload::Deflated(inflater) => inflater.total_in(),
        };
        *offset += compressed;

        let (expected_crc, expected_compressed, expected_uncompressed) = if current.has_descriptor {
            let (descriptor, consumed) = DataDescriptor::read_from(inner).map_err(|e| {
                if e.kind() == io::ErrorKind::UnexpectedEof {
                    Error::corrupt_entry(current.entry_offset, "truncated data descriptor")
                } else {
                    Error::Io(e)
                }
            })?;
            *offset += consumed;
            (
                Some(descriptor.crc32),
                Some(u64::from(descriptor.compressed_size)),
                Some(u64::from(descriptor.uncompressed_size)),
            )
        } else {
            (
                current.expected_crc,
                current.expected_compressed,
                current.expected_uncompressed,
            )
        };

        let crc32 = current.hasher.clone().finalize();
        if let Some(expected) = expected_compressed {
            if expected != compressed {
                return Err(Error::corrupt_entry(
                    current.entry_offset,
                    format!(
                        "compressed size disagrees with header: recorded {expected}, found {compressed}"
                    ),
                ));
            }
        }
        if let Some(expected) = expected_uncompressed {
            if expected != current.uncompressed_read {
                return Err(Error::corrupt_entry(
                    current.entry_offset,
                    format!(
                        "uncompressed size disagrees with header: recorded {expected}, found {}",
                        current.uncompressed_read
                    ),
                ));
            }
        }
        if let Some(expected) = expected_crc {
            if expected != crc32 {
                return Err(Error::corrupt_entry(
                    current.entry_offset,
                    format!("CRC-32 mismatch: recorded {expected:#010x}, computed {crc32:#010x}"),
                ));
            }
        }

        let sizes = EntrySizes {
            compressed,
            uncompressed: current.uncompressed_read,
            crc32,
        };
        *state = State::Drained(sizes);
        Ok(sizes)
    }
}

impl<R: BufRead> Read for ArchiveReader<R> {
    /// Reads decompressed bytes of the current entry's payload; `Ok(0)`
    /// once it is exhausted or when no entry is current.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let Self { inner, state, .. } = self;
        match state {
            State::InEntry(current) => read_current(inner, current, buf),
            _ => Ok(0),
        }
    }
}
