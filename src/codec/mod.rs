//! Payload compression and decompression.
//!
//! The container supports two entry encodings: Stored (no compression) and
//! Deflated (raw deflate). Decompression runs through [`Inflater`], a
//! pull-based state machine over [`BufRead`] that consumes exactly the
//! compressed bytes belonging to the current entry, which is what lets the
//! sequential reader land on the byte after a payload without seeking.

use std::io::{self, BufRead};

use flate2::{Decompress, FlushDecompress, Status};

use crate::{Error, Result};

/// How an entry's payload is encoded on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    /// Payload bytes are stored verbatim.
    Stored,
    /// Payload is compressed with raw deflate.
    Deflated,
}

impl CompressionMethod {
    /// Decodes a wire-format method code.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedMethod`] for any code other than 0
    /// (Stored) or 8 (Deflate).
    pub fn from_code(code: u16) -> Result<Self> {
        match code {
            0 => Ok(Self::Stored),
            8 => Ok(Self::Deflated),
            method => Err(Error::UnsupportedMethod { method }),
        }
    }

    /// Returns the wire-format code for this method.
    pub fn code(self) -> u16 {
        match self {
            Self::Stored => 0,
            Self::Deflated => 8,
        }
    }

    /// Returns the conventional display name for this method.
    pub fn name(self) -> &'static str {
        match self {
            Self::Stored => "stored",
            Self::Deflated => "deflated",
        }
    }
}

impl std::fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Incremental raw-deflate decompressor over a buffered input.
///
/// Unlike a wrapping decoder, the inflater borrows the input only for the
/// duration of each [`read`] call and reports exactly how many compressed
/// bytes it has consumed, so the caller keeps ownership of the stream and
/// knows where the payload ends.
///
/// [`read`]: Inflater::read
pub struct Inflater {
    raw: Decompress,
    finished: bool,
}

impl std::fmt::Debug for Inflater {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inflater")
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

impl Inflater {
    /// Creates an inflater for a raw deflate stream (no zlib wrapper).
    pub fn new() -> Self {
        Self {
            raw: Decompress::new(false),
            finished: false,
        }
    }

    /// Decompresses the next chunk of the stream into `out`.
    ///
    /// Returns the number of bytes produced; `Ok(0)` once the deflate
    /// stream has ended. Input bytes are consumed from `input` only as far
    /// as the deflate stream extends.
    ///
    /// # Errors
    ///
    /// Returns `InvalidData` if the deflate stream is malformed and
    /// `UnexpectedEof` if the input ends before the stream does.
    pub fn read<R: BufRead + ?Sized>(&mut self, input: &mut R, out: &mut [u8]) -> io::Result<usize> {
        if self.finished || out.is_empty() {
            return Ok(0);
        }
        loop {
            let data = input.fill_buf()?;
            let at_eof = data.is_empty();
            let before_in = self.raw.total_in();
            let before_out = self.raw.total_out();

            let flush = if at_eof {
                FlushDecompress::Finish
            } else {
                FlushDecompress::None
            };
            let status = self
                .raw
                .decompress(data, out, flush)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

            let consumed = (self.raw.total_in() - before_in) as usize;
            let produced = (self.raw.total_out() - before_out) as usize;
            input.consume(consumed);

            match status {
                Status::StreamEnd => {
                    self.finished = true;
                    return Ok(produced);
                }
                _ if produced > 0 => return Ok(produced),
                _ if at_eof => return Err(io::ErrorKind::UnexpectedEof.into()),
                _ if consumed == 0 => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        "deflate stream made no progress",
                    ));
                }
                _ => {} // consumed input without output yet; keep going
            }
        }
    }

    /// Total compressed bytes consumed so far.
    pub fn total_in(&self) -> u64 {
        self.raw.total_in()
    }

    /// Total uncompressed bytes produced so far.
    pub fn total_out(&self) -> u64 {
        self.raw.total_out()
    }

    /// Returns `true` once the deflate stream has ended.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Default for Inflater {
    fn default() -> Self {
        Self::new()
    }
}

/// A writer adapter that counts the bytes passing through it.
///
/// The archive writer wraps its sink in this to learn the compressed size
/// of a deflated payload.
#[derive(Debug)]
pub(crate) struct CountingWriter<W> {
    inner: W,
    written: u64,
}

impl<W: io::Write> CountingWriter<W> {
    pub(crate) fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    pub(crate) fn bytes_written(&self) -> u64 {
        self.written
    }
}

impl<W: io::Write> io::Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
