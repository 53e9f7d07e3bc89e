//! # rezip
//!
//! ZIP archive manipulation with atomic whole-archive rewrites.
//!
//! This crate reads and writes standard ZIP containers (local file headers,
//! compressed payloads, central directory) and mutates existing archives by
//! streaming their entries into a fresh temporary file that atomically
//! replaces the original. Archives it produces are readable by
//! general-purpose ZIP tooling, and it reads archives such tooling
//! produces, including ones whose headers defer sizes to data descriptors.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rezip::{ArchiveEditor, Result};
//!
//! fn main() -> Result<()> {
//!     let editor = ArchiveEditor::new("backup.zip");
//!
//!     // Create an archive from a directory
//!     editor.create("./documents".as_ref())?;
//!
//!     // List entries
//!     for entry in editor.list()? {
//!         println!(
//!             "{}: {} -> {} bytes ({})",
//!             entry.name, entry.uncompressed_size, entry.compressed_size, entry.method
//!         );
//!     }
//!
//!     // Remove an entry; per-entry outcomes come back as notices
//!     let result = editor.remove_file("drafts/old.txt")?;
//!     for notice in &result.notices {
//!         println!("{}", notice);
//!     }
//!
//!     // Extract everything
//!     editor.extract_all("./restored".as_ref())?;
//!     Ok(())
//! }
//! ```
//!
//! ## Mutation model
//!
//! The engine never edits an archive in place. Every mutating operation
//! (create, add, remove, change compression level) writes a complete new
//! container into a temporary file it exclusively owns, then promotes it
//! over the original path with a single rename. If anything fails before
//! the rename, the original archive is untouched; the abandoned temporary
//! file is deleted on drop.
//!
//! One operation runs at a time over blocking I/O with a bounded copy
//! buffer; the engine assumes exclusive access to the archive for the
//! duration of an operation and takes no locks.
//!
//! ## Lower-level APIs
//!
//! [`read::ArchiveReader`] iterates entries sequentially with one live
//! payload stream; [`Writer`] appends entries into a new container. The
//! editor composes the two, but both are usable on their own:
//!
//! ```rust
//! use std::io::Cursor;
//! use rezip::{EntryName, Writer, WriteOptions, read::ArchiveReader};
//!
//! # fn main() -> rezip::Result<()> {
//! let mut writer = Writer::create(Cursor::new(Vec::new()))?
//!     .options(WriteOptions::new().level(9)?);
//! writer.put_entry(EntryName::new("greeting.txt")?, &mut &b"hello"[..])?;
//! let (_, cursor) = writer.finish_into_inner()?;
//!
//! let mut reader = ArchiveReader::new(Cursor::new(cursor.into_inner()));
//! let entry = reader.next_entry()?.unwrap();
//! assert_eq!(entry.name.as_str(), "greeting.txt");
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T>`], an alias for
//! `std::result::Result<T, Error>`. Precondition failures (missing source,
//! missing archive, bad level) abort before any work; mid-stream failures
//! abort with the original archive intact. Per-entry anomalies during add
//! and remove (name already present, name absent) are not errors: they are
//! returned as [`Notice`] values alongside the successful result.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Default buffer size for copy-through I/O (8 KiB).
pub(crate) const READ_BUFFER_SIZE: usize = 8192;

pub mod codec;
pub mod edit;
pub mod entry_name;
pub mod error;
pub mod format;
pub mod read;
pub mod write;

pub use entry_name::EntryName;
pub use error::{Error, Result};

// Re-export the editing API at crate root for convenience
pub use edit::{ArchiveEditor, EditResult, Notice};

// Re-export reading API at crate root for convenience
pub use read::{Entry, EntryMetadata, ExtractResult};

// Re-export writing API at crate root for convenience
pub use write::{WriteOptions, WriteResult, Writer};

// Re-export the method enum; listings expose it per entry
pub use codec::CompressionMethod;
