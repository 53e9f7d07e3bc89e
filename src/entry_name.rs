//! Validated entry names for archive contents.

use std::fmt;
use std::path::Path;

use crate::{Error, Result};

/// A validated name identifying one entry within an archive.
///
/// Entry names use forward slashes as separators regardless of the host
/// platform, keeping the on-disk container portable. Validation rejects:
///
/// - empty names and names containing NUL bytes
/// - absolute paths (leading `/`)
/// - empty segments (`a//b`) and trailing slashes
/// - `.` and `..` segments (prevents path traversal during extraction)
///
/// Within a single archive no two entries share a name; the writer enforces
/// this per session.
///
/// # Examples
///
/// ```
/// use rezip::EntryName;
///
/// let name = EntryName::new("dir/file.txt").unwrap();
/// assert_eq!(name.as_str(), "dir/file.txt");
/// assert_eq!(name.file_name(), "file.txt");
///
/// assert!(EntryName::new("../secret").is_err());
/// assert!(EntryName::new("/absolute").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryName(String);

impl EntryName {
    /// Creates a new `EntryName` from a string, validating it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEntryName`] if the name violates any of the
    /// rules listed on the type.
    pub fn new(s: &str) -> Result<Self> {
        Self::validate(s)?;
        Ok(Self(s.to_string()))
    }

    /// Builds an entry name from a relative filesystem path.
    ///
    /// Host separators are converted to forward slashes. The path must be
    /// relative, valid UTF-8, and free of `.`/`..` components.
    pub fn from_relative_path(path: &Path) -> Result<Self> {
        let mut segments = Vec::new();
        for component in path.components() {
            match component {
                std::path::Component::Normal(seg) => {
                    let seg = seg
                        .to_str()
                        .ok_or_else(|| Error::InvalidEntryName("not valid UTF-8".into()))?;
                    segments.push(seg);
                }
                other => {
                    return Err(Error::InvalidEntryName(format!(
                        "unexpected path component {:?}",
                        other
                    )));
                }
            }
        }
        Self::new(&segments.join("/"))
    }

    fn validate(s: &str) -> Result<()> {
        if s.is_empty() {
            return Err(Error::InvalidEntryName("empty name".into()));
        }
        if s.contains('\0') {
            return Err(Error::InvalidEntryName("contains NUL byte".into()));
        }
        if s.starts_with('/') {
            return Err(Error::InvalidEntryName("absolute path not allowed".into()));
        }
        if s.ends_with('/') {
            return Err(Error::InvalidEntryName("trailing slash not allowed".into()));
        }
        for segment in s.split('/') {
            if segment.is_empty() {
                return Err(Error::InvalidEntryName(
                    "empty segment (consecutive slashes)".into(),
                ));
            }
            if segment == "." {
                return Err(Error::InvalidEntryName("'.' segment not allowed".into()));
            }
            if segment == ".." {
                return Err(Error::InvalidEntryName(
                    "'..' segment not allowed (path traversal)".into(),
                ));
            }
        }
        Ok(())
    }

    /// Returns the name as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the file name (last segment) of this entry name.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Returns the parent portion of this name, if any.
    pub fn parent(&self) -> Option<&str> {
        self.0.rfind('/').map(|idx| &self.0[..idx])
    }
}

impl AsRef<str> for EntryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for EntryName {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for EntryName {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::validate(&s)?;
        Ok(Self(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_valid_simple_file() {
        let name = EntryName::new("file.txt").unwrap();
        assert_eq!(name.as_str(), "file.txt");
    }

    #[test]
    fn test_valid_nested() {
        let name = EntryName::new("a/b/c.txt").unwrap();
        assert_eq!(name.as_str(), "a/b/c.txt");
        assert_eq!(name.file_name(), "c.txt");
        assert_eq!(name.parent(), Some("a/b"));
    }

    #[test]
    fn test_valid_unicode() {
        let name = EntryName::new("документы/файл.txt").unwrap();
        assert_eq!(name.file_name(), "файл.txt");
    }

    #[test]
    fn test_invalid_empty() {
        assert!(matches!(
            EntryName::new("").unwrap_err(),
            Error::InvalidEntryName(_)
        ));
    }

    #[test]
    fn test_invalid_nul_byte() {
        let err = EntryName::new("file\0.txt").unwrap_err();
        assert!(err.to_string().contains("NUL"));
    }

    #[test]
    fn test_invalid_absolute() {
        let err = EntryName::new("/etc/passwd").unwrap_err();
        assert!(err.to_string().contains("absolute"));
    }

    #[test]
    fn test_invalid_trailing_slash() {
        assert!(EntryName::new("dir/").is_err());
    }

    #[test]
    fn test_invalid_traversal() {
        assert!(EntryName::new("../secret").is_err());
        assert!(EntryName::new("a/../b").is_err());
        assert!(EntryName::new("./a").is_err());
        assert!(EntryName::new("a//b").is_err());
    }

    #[test]
    fn test_dots_in_names_allowed() {
        assert!(EntryName::new(".gitignore").is_ok());
        assert!(EntryName::new("file..txt").is_ok());
    }

    #[test]
    fn test_from_relative_path() {
        let path: PathBuf = ["sub", "dir", "b.txt"].iter().collect();
        let name = EntryName::from_relative_path(&path).unwrap();
        assert_eq!(name.as_str(), "sub/dir/b.txt");
    }

    #[test]
    fn test_from_relative_path_rejects_parent() {
        let path: PathBuf = ["..", "b.txt"].iter().collect();
        assert!(EntryName::from_relative_path(&path).is_err());
    }

    #[test]
    fn test_no_parent_for_flat_name() {
        let name = EntryName::new("file.txt").unwrap();
        assert!(name.parent().is_none());
        assert_eq!(name.file_name(), "file.txt");
    }

    #[test]
    fn test_try_from() {
        let name: EntryName = "dir/file.txt".try_into().unwrap();
        assert_eq!(name.as_str(), "dir/file.txt");
        let name: EntryName = String::from("x.bin").try_into().unwrap();
        assert_eq!(name.as_str(), "x.bin");
    }

    #[test]
    fn test_display() {
        let name = EntryName::new("dir/file.txt").unwrap();
        assert_eq!(format!("{}", name), "dir/file.txt");
    }
}
