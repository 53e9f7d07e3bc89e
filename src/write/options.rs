//! Write options and result types for archive creation.

use crate::codec::CompressionMethod;
use crate::{Error, Result};

/// Options for an archive write session.
///
/// The compression level applies uniformly to every entry appended in the
/// session; set it before the first entry is written.
///
/// # Example
///
/// ```rust
/// use rezip::WriteOptions;
///
/// let options = WriteOptions::new().level(9).unwrap();
/// assert_eq!(options.level, 9);
///
/// assert!(WriteOptions::new().level(15).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Compression level (0-9). Level 0 stores entries uncompressed.
    pub level: u32,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self { level: 6 }
    }
}

impl WriteOptions {
    /// Creates options with the default compression level (6).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compression level.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCompressionLevel`] if `level` is greater
    /// than 9.
    pub fn level(mut self, level: u32) -> Result<Self> {
        if level > 9 {
            return Err(Error::InvalidCompressionLevel { level });
        }
        self.level = level;
        Ok(self)
    }

    /// Returns the entry encoding this session will use.
    pub fn method(&self) -> CompressionMethod {
        if self.level == 0 {
            CompressionMethod::Stored
        } else {
            CompressionMethod::Deflated
        }
    }
}

/// Statistics from a completed write session.
#[derive(Debug, Clone, Default)]
pub struct WriteResult {
    /// Number of entries written.
    pub entries_written: usize,
    /// Total uncompressed bytes across all entries.
    pub total_size: u64,
    /// Total compressed bytes across all entries.
    pub compressed_size: u64,
}

impl WriteResult {
    /// Returns the fraction of space saved by compression (0.0 when
    /// nothing was written or nothing was saved).
    pub fn space_savings(&self) -> f64 {
        if self.total_size == 0 {
            0.0
        } else {
            1.0 - (self.compressed_size as f64 / self.total_size as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level() {
        assert_eq!(WriteOptions::new().level, 6);
    }

    #[test]
    fn test_level_bounds() {
        assert_eq!(WriteOptions::new().level(0).unwrap().level, 0);
        assert_eq!(WriteOptions::new().level(9).unwrap().level, 9);
        assert!(matches!(
            WriteOptions::new().level(10),
            Err(Error::InvalidCompressionLevel { level: 10 })
        ));
    }

    #[test]
    fn test_method_selection() {
        assert_eq!(
            WriteOptions::new().level(0).unwrap().method(),
            CompressionMethod::Stored
        );
        assert_eq!(
            WriteOptions::new().level(1).unwrap().method(),
            CompressionMethod::Deflated
        );
    }

    #[test]
    fn test_space_savings() {
        let result = WriteResult {
            entries_written: 1,
            total_size: 1000,
            compressed_size: 250,
        };
        assert!((result.space_savings() - 0.75).abs() < 1e-9);
        assert_eq!(WriteResult::default().space_savings(), 0.0);
    }
}
