//! Encoding and decoding of container records.

use std::io::{self, Read, Write};

use super::{
    DATA_DESCRIPTOR_SIG, DOS_DATE, DOS_TIME, END_OF_CENTRAL_DIRECTORY_SIG, FLAG_UTF8,
    LOCAL_FILE_HEADER_SIG, VERSION_MADE_BY, VERSION_NEEDED, read_u16_le, read_u32_le,
};

/// A decoded local file header.
///
/// The four-byte signature is consumed by the caller (it is what
/// distinguishes a further entry from the start of the central directory),
/// so [`LocalFileHeader::read_after_signature`] parses the remaining fixed
/// fields plus the name, and skips the extra field.
#[derive(Debug, Clone)]
pub struct LocalFileHeader {
    /// General-purpose flag bits.
    pub flags: u16,
    /// Wire-format compression method code.
    pub method: u16,
    /// CRC-32 of the uncompressed payload; zero when deferred to a data
    /// descriptor.
    pub crc32: u32,
    /// Compressed payload size; zero when deferred.
    pub compressed_size: u32,
    /// Uncompressed payload size; zero when deferred.
    pub uncompressed_size: u32,
    /// Raw entry name bytes as stored.
    pub name_raw: Vec<u8>,
}

impl LocalFileHeader {
    /// Byte offset of the CRC-32 field from the start of the header,
    /// including the signature. The writer seeks here to patch
    /// CRC/size fields after streaming a payload.
    pub const CRC_FIELD_OFFSET: u64 = 14;

    /// Parses the header fields that follow an already-consumed
    /// `PK\x03\x04` signature. Returns the header and the number of bytes
    /// consumed (excluding the signature).
    pub fn read_after_signature<R: Read + ?Sized>(r: &mut R) -> io::Result<(Self, u64)> {
        let _version_needed = read_u16_le(r)?;
        let flags = read_u16_le(r)?;
        let method = read_u16_le(r)?;
        let _dos_time = read_u16_le(r)?;
        let _dos_date = read_u16_le(r)?;
        let crc32 = read_u32_le(r)?;
        let compressed_size = read_u32_le(r)?;
        let uncompressed_size = read_u32_le(r)?;
        let name_len = read_u16_le(r)? as usize;
        let extra_len = read_u16_le(r)? as usize;

        let mut name_raw = vec![0u8; name_len];
        r.read_exact(&mut name_raw)?;

        // Extra field content is not interpreted.
        let skipped = io::copy(&mut r.take(extra_len as u64), &mut io::sink())?;
        if skipped != extra_len as u64 {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }

        let consumed = 26 + name_len as u64 + extra_len as u64;
        Ok((
            Self {
                flags,
                method,
                crc32,
                compressed_size,
                uncompressed_size,
                name_raw,
            },
            consumed,
        ))
    }

    /// Writes a local header for `name` with zeroed CRC/size fields and no
    /// extra field, returning the number of bytes written.
    ///
    /// The CRC and sizes are not known until the payload has been streamed;
    /// the writer patches them at [`Self::CRC_FIELD_OFFSET`] afterwards.
    pub fn write_placeholder<W: Write + ?Sized>(
        w: &mut W,
        name: &str,
        method: u16,
    ) -> io::Result<u64> {
        let name_bytes = name.as_bytes();
        w.write_all(&LOCAL_FILE_HEADER_SIG.to_le_bytes())?;
        w.write_all(&VERSION_NEEDED.to_le_bytes())?;
        w.write_all(&FLAG_UTF8.to_le_bytes())?;
        w.write_all(&method.to_le_bytes())?;
        w.write_all(&DOS_TIME.to_le_bytes())?;
        w.write_all(&DOS_DATE.to_le_bytes())?;
        w.write_all(&0u32.to_le_bytes())?; // crc32
        w.write_all(&0u32.to_le_bytes())?; // compressed size
        w.write_all(&0u32.to_le_bytes())?; // uncompressed size
        w.write_all(&(name_bytes.len() as u16).to_le_bytes())?;
        w.write_all(&0u16.to_le_bytes())?; // extra length
        w.write_all(name_bytes)?;
        Ok(30 + name_bytes.len() as u64)
    }
}

/// One entry's record in the central directory, written when the archive is
/// finalized.
#[derive(Debug, Clone)]
pub struct CentralDirectoryRecord {
    /// Entry name (UTF-8).
    pub name: String,
    /// Wire-format compression method code.
    pub method: u16,
    /// CRC-32 of the uncompressed payload.
    pub crc32: u32,
    /// Compressed payload size.
    pub compressed_size: u32,
    /// Uncompressed payload size.
    pub uncompressed_size: u32,
    /// Byte offset of the entry's local header from the start of the
    /// archive.
    pub local_header_offset: u32,
}

impl CentralDirectoryRecord {
    /// Writes this record, returning the number of bytes written.
    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<u64> {
        let name_bytes = self.name.as_bytes();
        w.write_all(&super::CENTRAL_DIRECTORY_SIG.to_le_bytes())?;
        w.write_all(&VERSION_MADE_BY.to_le_bytes())?;
        w.write_all(&VERSION_NEEDED.to_le_bytes())?;
        w.write_all(&FLAG_UTF8.to_le_bytes())?;
        w.write_all(&self.method.to_le_bytes())?;
        w.write_all(&DOS_TIME.to_le_bytes())?;
        w.write_all(&DOS_DATE.to_le_bytes())?;
        w.write_all(&self.crc32.to_le_bytes())?;
        w.write_all(&self.compressed_size.to_le_bytes())?;
        w.write_all(&self.uncompressed_size.to_le_bytes())?;
        w.write_all(&(name_bytes.len() as u16).to_le_bytes())?;
        w.write_all(&0u16.to_le_bytes())?; // extra length
        w.write_all(&0u16.to_le_bytes())?; // comment length
        w.write_all(&0u16.to_le_bytes())?; // disk number start
        w.write_all(&0u16.to_le_bytes())?; // internal attributes
        w.write_all(&0u32.to_le_bytes())?; // external attributes
        w.write_all(&self.local_header_offset.to_le_bytes())?;
        w.write_all(name_bytes)?;
        Ok(46 + name_bytes.len() as u64)
    }
}

/// Writes the end-of-central-directory record that closes an archive.
pub fn write_end_of_central_directory<W: Write + ?Sized>(
    w: &mut W,
    entry_count: u16,
    central_directory_size: u32,
    central_directory_offset: u32,
) -> io::Result<()> {
    w.write_all(&END_OF_CENTRAL_DIRECTORY_SIG.to_le_bytes())?;
    w.write_all(&0u16.to_le_bytes())?; // this disk
    w.write_all(&0u16.to_le_bytes())?; // disk with central directory
    w.write_all(&entry_count.to_le_bytes())?;
    w.write_all(&entry_count.to_le_bytes())?;
    w.write_all(&central_directory_size.to_le_bytes())?;
    w.write_all(&central_directory_offset.to_le_bytes())?;
    w.write_all(&0u16.to_le_bytes())?; // comment length
    Ok(())
}

/// Sizes and CRC trailing a payload written by a streaming producer.
#[derive(Debug, Clone, Copy)]
pub struct DataDescriptor {
    /// CRC-32 of the uncompressed payload.
    pub crc32: u32,
    /// Compressed payload size.
    pub compressed_size: u32,
    /// Uncompressed payload size.
    pub uncompressed_size: u32,
}

impl DataDescriptor {
    /// Reads a data descriptor, tolerating both wire forms: with and
    /// without the optional `PK\x07\x08` signature. Returns the descriptor
    /// and the number of bytes consumed.
    pub fn read_from<R: Read + ?Sized>(r: &mut R) -> io::Result<(Self, u64)> {
        let first = read_u32_le(r)?;
        if first == DATA_DESCRIPTOR_SIG {
            Ok((
                Self {
                    crc32: read_u32_le(r)?,
                    compressed_size: read_u32_le(r)?,
                    uncompressed_size: read_u32_le(r)?,
                },
                16,
            ))
        } else {
            Ok((
                Self {
                    crc32: first,
                    compressed_size: read_u32_le(r)?,
                    uncompressed_size: read_u32_le(r)?,
                },
                12,
            ))
        }
    }
}
