//! Archive reading API.
//!
//! [`ArchiveReader`] walks an archive's entries sequentially in storage
//! order, exposing one live payload stream at a time; [`list_entries`]
//! builds the non-mutating metadata listing; [`extract_all`] writes every
//! entry beneath a destination directory.

mod entry;
mod extraction;
mod inspector;
mod reader;

pub use entry::{Entry, EntryMetadata, EntrySizes};
pub use extraction::{ExtractResult, extract_all};
pub use inspector::list_entries;
pub use reader::ArchiveReader;
