//! Structured per-entry events reported by mutating operations.

use std::fmt;
use std::path::PathBuf;

use crate::EntryName;

/// An informational event emitted while an operation runs.
///
/// Notices report per-entry outcomes that are not errors: the operation as
/// a whole still completes and the archive is left valid. They are returned
/// to the caller rather than printed, so the engine stays free of
/// presentation concerns.
#[derive(Debug, Clone)]
pub enum Notice {
    /// A file was appended to the archive.
    Added {
        /// The entry name it was stored under.
        name: EntryName,
        /// The source file on disk.
        path: PathBuf,
    },
    /// A file was skipped because an entry with its base filename already
    /// exists in the archive.
    AlreadyExists {
        /// The source file on disk that was skipped.
        path: PathBuf,
    },
    /// An entry was removed from the archive.
    Removed {
        /// The removed entry's name.
        name: EntryName,
    },
}

impl Notice {
    /// Returns the notice kind as a string.
    pub fn kind(&self) -> &'static str {
        match self {
            Notice::Added { .. } => "added",
            Notice::AlreadyExists { .. } => "already-exists",
            Notice::Removed { .. } => "removed",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Added { name, .. } => write!(f, "added '{}'", name),
            Notice::AlreadyExists { path } => {
                write!(f, "'{}' already exists in the archive", path.display())
            }
            Notice::Removed { name } => write!(f, "removed '{}'", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_kinds() {
        let added = Notice::Added {
            name: EntryName::new("a.txt").unwrap(),
            path: PathBuf::from("/tmp/a.txt"),
        };
        assert_eq!(added.kind(), "added");
        assert_eq!(added.to_string(), "added 'a.txt'");

        let exists = Notice::AlreadyExists {
            path: PathBuf::from("/tmp/a.txt"),
        };
        assert_eq!(exists.kind(), "already-exists");
        assert!(exists.to_string().contains("already exists"));

        let removed = Notice::Removed {
            name: EntryName::new("b.txt").unwrap(),
        };
        assert_eq!(removed.kind(), "removed");
        assert_eq!(removed.to_string(), "removed 'b.txt'");
    }
}
