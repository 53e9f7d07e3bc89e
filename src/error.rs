//! Error types for ZIP archive operations.
//!
//! All fallible operations in this crate return [`Result<T>`], an alias for
//! `std::result::Result<T, Error>`. Precondition errors (a missing source
//! file, a path that is not an archive, an out-of-range compression level)
//! are raised before any destructive work begins, so a failed mutating
//! operation always leaves the original archive untouched.
//!
//! ```rust,no_run
//! use rezip::{ArchiveEditor, Error};
//!
//! fn remove(editor: &ArchiveEditor) {
//!     match editor.remove_file("old.txt") {
//!         Ok(result) => println!("{} entries kept", result.entries_kept),
//!         Err(Error::WrongArchiveFile { path }) => {
//!             eprintln!("not an archive: {}", path.display());
//!         }
//!         Err(e) => eprintln!("error: {}", e),
//!     }
//! }
//! ```

use std::io;
use std::path::PathBuf;

/// The main error type for ZIP archive operations.
///
/// Each variant carries the context needed to diagnose the failure. Variants
/// fall into three groups: precondition errors (`PathNotFound`,
/// `WrongArchiveFile`, `InvalidCompressionLevel`) checked before any work
/// begins, container errors (`CorruptEntry`, `UnsupportedMethod`,
/// `InvalidEntryName`, size limits) raised while parsing or encoding, and
/// `Io` wrapping any underlying read/write/rename failure.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred during file operations.
    ///
    /// Wraps [`std::io::Error`]; common causes are permission denied, disk
    /// full, and truncated reads. Check the underlying
    /// [`std::io::ErrorKind`] for specific handling.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A source path for create/add does not exist or is not the expected
    /// type (regular file, or file/directory for create).
    #[error("path not found or not a regular file: {path}")]
    PathNotFound {
        /// The offending source path.
        path: PathBuf,
    },

    /// The archive path does not reference an existing regular file.
    ///
    /// Raised before any bytes are read: a missing archive is a
    /// configuration error, not a parse error.
    #[error("not an existing archive file: {path}")]
    WrongArchiveFile {
        /// The path that was expected to be an archive.
        path: PathBuf,
    },

    /// An invalid compression level was provided.
    ///
    /// Levels must be in 0-9: 0 stores entries uncompressed, 9 compresses
    /// hardest.
    #[error("invalid compression level {level}: must be 0-9")]
    InvalidCompressionLevel {
        /// The invalid level that was provided.
        level: u32,
    },

    /// An entry name was appended twice in one write session.
    ///
    /// The writer guards this invariant independently of its callers;
    /// seeing this error from a caller that pre-filtered names indicates a
    /// defect in the caller.
    #[error("duplicate entry: {name}")]
    DuplicateEntry {
        /// The entry name that was already appended.
        name: String,
    },

    /// Archive content failed to parse as a valid entry.
    ///
    /// Covers malformed local headers, payload lengths that disagree with
    /// the header or data descriptor, CRC-32 mismatches, and entry names
    /// the container should never hold. The offset points at the start of
    /// the entry being read.
    #[error("corrupt entry at offset {offset:#x}: {reason}")]
    CorruptEntry {
        /// Byte offset of the entry's local header.
        offset: u64,
        /// A description of what failed to parse.
        reason: String,
    },

    /// An entry name is not valid for this container.
    ///
    /// Entry names use forward-slash separators, are relative, and contain
    /// no `.`/`..` segments. Use [`EntryName::new`] to validate names
    /// before use.
    ///
    /// [`EntryName::new`]: crate::EntryName::new
    #[error("invalid entry name: {0}")]
    InvalidEntryName(String),

    /// The archive uses a compression method other than Stored or Deflate.
    #[error("unsupported compression method: {method}")]
    UnsupportedMethod {
        /// The wire-format method code.
        method: u16,
    },

    /// A container feature this crate does not handle.
    ///
    /// Raised for encrypted entries and other format features outside the
    /// supported subset.
    #[error("unsupported feature: {feature}")]
    UnsupportedFeature {
        /// The name of the unsupported feature.
        feature: &'static str,
    },

    /// An entry's size exceeds the container's 32-bit header fields.
    #[error("entry too large for archive: {name} ({size} bytes)")]
    EntryTooLarge {
        /// The entry name.
        name: String,
        /// The offending size in bytes.
        size: u64,
    },

    /// The archive holds more entries than the container index can record.
    #[error("too many entries for archive: {count}")]
    TooManyEntries {
        /// The number of entries that was attempted.
        count: usize,
    },
}

impl Error {
    /// Returns `true` if this error indicates damaged archive content.
    pub fn is_corruption(&self) -> bool {
        matches!(self, Error::CorruptEntry { .. })
    }

    /// Returns `true` if this is a precondition error.
    ///
    /// Precondition errors are raised before any work is done; the archive
    /// on disk is guaranteed untouched.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Error::PathNotFound { .. }
                | Error::WrongArchiveFile { .. }
                | Error::InvalidCompressionLevel { .. }
        )
    }

    /// Creates a `CorruptEntry` error.
    pub fn corrupt_entry(offset: u64, reason: impl Into<String>) -> Self {
        Error::CorruptEntry {
            offset,
            reason: reason.into(),
        }
    }

    /// Creates a `PathNotFound` error.
    pub fn path_not_found(path: impl Into<PathBuf>) -> Self {
        Error::PathNotFound { path: path.into() }
    }

    /// Creates a `WrongArchiveFile` error.
    pub fn wrong_archive_file(path: impl Into<PathBuf>) -> Self {
        Error::WrongArchiveFile { path: path.into() }
    }
}

/// A specialized Result type for archive operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_from() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_corrupt_entry_display() {
        let err = Error::corrupt_entry(0x1234, "bad local header signature");
        assert!(err.to_string().contains("0x1234"));
        assert!(err.to_string().contains("bad local header signature"));
        assert!(err.is_corruption());
    }

    #[test]
    fn test_precondition_classification() {
        assert!(Error::path_not_found("/no/such/file").is_precondition());
        assert!(Error::wrong_archive_file("/no/such.zip").is_precondition());
        assert!(Error::InvalidCompressionLevel { level: 12 }.is_precondition());
        assert!(!Error::corrupt_entry(0, "x").is_precondition());
        assert!(!Error::Io(io::Error::other("x")).is_precondition());
    }

    #[test]
    fn test_invalid_compression_level_display() {
        let err = Error::InvalidCompressionLevel { level: 15 };
        assert_eq!(err.to_string(), "invalid compression level 15: must be 0-9");
    }

    #[test]
    fn test_duplicate_entry_display() {
        let err = Error::DuplicateEntry {
            name: "a/b.txt".into(),
        };
        assert_eq!(err.to_string(), "duplicate entry: a/b.txt");
    }

    #[test]
    fn test_unsupported_method_display() {
        let err = Error::UnsupportedMethod { method: 12 };
        assert!(err.to_string().contains("12"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
