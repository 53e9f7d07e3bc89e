//! Archive mutation engine.
//!
//! [`ArchiveEditor`] binds to one archive path and exposes the mutating
//! operations (create, add, remove, change compression level) plus the
//! non-mutating listing and extraction. All mutation goes through a single
//! read-rewrite-replace pipeline: the new archive is fully written into an
//! exclusively owned temporary file, and only a successful finalize
//! promotes it over the original with one rename. Readers therefore never
//! observe a partially written archive, and a failed operation leaves the
//! original byte-identical to its prior state.

mod editor;
mod notice;

pub use editor::{ArchiveEditor, EditResult};
pub use notice::Notice;
