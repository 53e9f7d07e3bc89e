//! The archive mutation engine.

use std::collections::HashSet;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::read::{self, ArchiveReader, Entry, EntryMetadata, ExtractResult};
use crate::write::{WriteOptions, WriteResult, Writer};
use crate::{EntryName, Error, Result};

use super::notice::Notice;

/// Result of a mutating archive operation.
#[must_use = "edit result should be checked to verify operation completed as expected"]
#[derive(Debug, Default)]
pub struct EditResult {
    /// Number of existing entries copied unchanged into the new archive.
    pub entries_kept: usize,
    /// Number of entries dropped from the new archive.
    pub entries_removed: usize,
    /// Number of new entries appended.
    pub entries_added: usize,
    /// Per-entry informational events, in operation order.
    pub notices: Vec<Notice>,
}

impl EditResult {
    /// Returns the number of entries in the resulting archive.
    pub fn total_entries(&self) -> usize {
        self.entries_kept + self.entries_added
    }
}

/// A mutation engine bound to one archive path.
///
/// Every mutating operation follows the same shape: validate preconditions,
/// stream entries (optionally combined with new input) into a fresh
/// temporary file, then atomically replace the original via a single
/// rename. The original archive is never edited in place, so a failure at
/// any point before the rename leaves it byte-identical to its prior state.
///
/// The editor assumes exclusive access to the archive file for the
/// duration of each operation and performs no locking.
///
/// # Example
///
/// ```rust,no_run
/// use rezip::{ArchiveEditor, WriteOptions};
///
/// # fn main() -> rezip::Result<()> {
/// let editor = ArchiveEditor::new("backup.zip");
/// editor.create("./documents".as_ref())?;
///
/// let result = editor.remove_file("drafts/old.txt")?;
/// for notice in &result.notices {
///     println!("{}", notice);
/// }
/// # Ok(())
/// # }
/// ```
pub struct ArchiveEditor {
    archive_path: PathBuf,
    options: WriteOptions,
}

impl ArchiveEditor {
    /// Creates an editor bound to the given archive path.
    ///
    /// The path is not required to exist yet; [`create`] is the operation
    /// that brings the archive into being.
    ///
    /// [`create`]: ArchiveEditor::create
    pub fn new(archive_path: impl Into<PathBuf>) -> Self {
        Self {
            archive_path: archive_path.into(),
            options: WriteOptions::default(),
        }
    }

    /// Sets the write options used by create/add/remove sessions.
    pub fn options(mut self, options: WriteOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the archive path this editor operates on.
    pub fn archive_path(&self) -> &Path {
        &self.archive_path
    }

    /// Creates the archive from a source file or directory.
    ///
    /// A directory source contributes one entry per regular file beneath it
    /// (recursively), named by its path relative to the source; a file
    /// source contributes a single entry named by its base filename. The
    /// archive's parent directory is created if absent. An existing archive
    /// at the path is replaced.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PathNotFound`] if `source` is neither a regular
    /// file nor a directory. On any failure the destination path is left as
    /// it was.
    pub fn create(&self, source: &Path) -> Result<WriteResult> {
        let inputs = self.collect_create_inputs(source)?;

        if let Some(parent) = self.archive_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut tmp = self.fresh_temp_file()?;
        let result = {
            let mut writer = Writer::create(tmp.as_file_mut())?.options(self.options.clone());
            for (path, name) in inputs {
                let mut file = File::open(&path)?;
                writer.put_entry(name, &mut file)?;
            }
            writer.finish()?
        };
        self.promote(tmp)?;

        log::debug!(
            "created {} with {} entries from {}",
            self.archive_path.display(),
            result.entries_written,
            source.display()
        );
        Ok(result)
    }

    /// Extracts every entry beneath `destination`, creating it if absent.
    ///
    /// Non-mutating; see [`read::extract_all`] for the contract.
    pub fn extract_all(&self, destination: &Path) -> Result<ExtractResult> {
        read::extract_all(&self.archive_path, destination)
    }

    /// Lists entry metadata, in storage order.
    ///
    /// Non-mutating; see [`read::list_entries`] for the contract.
    pub fn list(&self) -> Result<Vec<EntryMetadata>> {
        read::list_entries(&self.archive_path)
    }

    /// Removes the named entries from the archive.
    ///
    /// Every entry whose full name is not in `names` is copied into the
    /// rewritten archive; each removed entry is reported with a
    /// [`Notice::Removed`]. Names absent from the archive are silently
    /// ignored: removal ensures absence, it does not assert presence.
    pub fn remove_files<S: AsRef<str>>(&self, names: &[S]) -> Result<EditResult> {
        let removal: HashSet<&str> = names.iter().map(|s| s.as_ref()).collect();
        let result = self.rewrite(
            self.options.clone(),
            |entry, notices| {
                if removal.contains(entry.name.as_str()) {
                    notices.push(Notice::Removed {
                        name: entry.name.clone(),
                    });
                    false
                } else {
                    true
                }
            },
            |_, _, _, _| Ok(()),
        )?;
        log::debug!(
            "removed {} of {} requested entries from {}",
            result.entries_removed,
            names.len(),
            self.archive_path.display()
        );
        Ok(result)
    }

    /// Removes a single entry. See [`remove_files`].
    ///
    /// [`remove_files`]: ArchiveEditor::remove_files
    pub fn remove_file(&self, name: &str) -> Result<EditResult> {
        self.remove_files(&[name])
    }

    /// Adds the given files to the archive.
    ///
    /// Existing entries are copied unchanged while their names are
    /// recorded; each path in `paths` is then appended under its base
    /// filename unless that filename is already recorded, in which case the
    /// file is skipped with a [`Notice::AlreadyExists`]. Collision is
    /// checked against the filename only, matching the naming rule of
    /// create-from-single-file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PathNotFound`] if any path is not a regular file;
    /// the whole operation is abandoned and the archive is unchanged.
    pub fn add_files(&self, paths: &[PathBuf]) -> Result<EditResult> {
        let result = self.rewrite(
            self.options.clone(),
            |_, _| true,
            |writer, existing, notices, outcome| {
                for path in paths {
                    if !path.is_file() {
                        return Err(Error::path_not_found(path));
                    }
                    let file_name = path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .ok_or_else(|| Error::path_not_found(path))?;

                    if existing.contains(file_name) {
                        notices.push(Notice::AlreadyExists { path: path.clone() });
                        continue;
                    }

                    let name = EntryName::new(file_name)?;
                    let mut file = File::open(path)?;
                    writer.put_entry(name.clone(), &mut file)?;
                    existing.insert(file_name.to_string());
                    outcome.entries_added += 1;
                    notices.push(Notice::Added {
                        name,
                        path: path.clone(),
                    });
                }
                Ok(())
            },
        )?;
        log::debug!(
            "added {} of {} files to {}",
            result.entries_added,
            paths.len(),
            self.archive_path.display()
        );
        Ok(result)
    }

    /// Adds a single file. See [`add_files`].
    ///
    /// [`add_files`]: ArchiveEditor::add_files
    pub fn add_file(&self, path: impl Into<PathBuf>) -> Result<EditResult> {
        self.add_files(&[path.into()])
    }

    /// Rewrites the archive with every entry re-encoded at `level`.
    ///
    /// Entry identity and content are preserved exactly; only the physical
    /// encoding changes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WrongArchiveFile`] if the archive does not exist
    /// and [`Error::InvalidCompressionLevel`] if `level` is outside 0-9,
    /// both before any work is done.
    pub fn change_compression_level(&self, level: u32) -> Result<EditResult> {
        self.require_archive()?;
        let options = WriteOptions::new().level(level)?;
        let result = self.rewrite(options, |_, _| true, |_, _, _, _| Ok(()))?;
        log::debug!(
            "re-encoded {} entries of {} at level {}",
            result.entries_kept,
            self.archive_path.display(),
            level
        );
        Ok(result)
    }

    /// The shared read, filter, write, replace pipeline behind every
    /// rewrite-based operation.
    ///
    /// `keep` decides per existing entry whether it is copied; `tail` runs
    /// after the copy phase with the writer, the set of names written so
    /// far, and the accumulating notices/result. The temporary file is
    /// promoted over the original only after `Writer::finish` succeeds; on
    /// any earlier error it is dropped (and deleted) with the original
    /// untouched.
    fn rewrite<K, T>(&self, options: WriteOptions, mut keep: K, tail: T) -> Result<EditResult>
    where
        K: FnMut(&Entry, &mut Vec<Notice>) -> bool,
        T: FnOnce(
            &mut Writer<&mut File>,
            &mut HashSet<String>,
            &mut Vec<Notice>,
            &mut EditResult,
        ) -> Result<()>,
    {
        self.require_archive()?;
        let mut reader = ArchiveReader::open_path(&self.archive_path)?;
        let mut tmp = self.fresh_temp_file()?;

        let mut outcome = EditResult::default();
        let mut notices = Vec::new();
        let mut existing: HashSet<String> = HashSet::new();
        {
            let mut writer = Writer::create(tmp.as_file_mut())?.options(options);
            while let Some(entry) = reader.next_entry()? {
                // Directory entries carry no payload and are implied by the
                // paths of the entries beneath them; they are not re-emitted.
                if entry.is_directory {
                    reader.finish_entry()?;
                    continue;
                }
                if keep(&entry, &mut notices) {
                    existing.insert(entry.name.as_str().to_string());
                    writer.put_entry(entry.name.clone(), &mut reader)?;
                    reader.finish_entry()?;
                    outcome.entries_kept += 1;
                } else {
                    outcome.entries_removed += 1;
                }
            }
            tail(&mut writer, &mut existing, &mut notices, &mut outcome)?;
            writer.finish()?;
        }
        self.promote(tmp)?;

        outcome.notices = notices;
        Ok(outcome)
    }

    /// Enumerates the (source file, entry name) pairs for a create
    /// operation, validating the source eagerly.
    fn collect_create_inputs(&self, source: &Path) -> Result<Vec<(PathBuf, EntryName)>> {
        if source.is_dir() {
            let mut inputs = Vec::new();
            for entry in WalkDir::new(source).follow_links(false) {
                let entry = entry.map_err(std::io::Error::from)?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let relative = entry.path().strip_prefix(source).unwrap_or(entry.path());
                let name = EntryName::from_relative_path(relative)?;
                inputs.push((entry.path().to_path_buf(), name));
            }
            Ok(inputs)
        } else if source.is_file() {
            let file_name = source
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| Error::path_not_found(source))?;
            Ok(vec![(source.to_path_buf(), EntryName::new(file_name)?)])
        } else {
            Err(Error::path_not_found(source))
        }
    }

    fn require_archive(&self) -> Result<()> {
        if !self.archive_path.is_file() {
            return Err(Error::wrong_archive_file(&self.archive_path));
        }
        Ok(())
    }

    /// Creates the replacement file next to the archive, so the promoting
    /// rename never crosses a filesystem.
    fn fresh_temp_file(&self) -> Result<NamedTempFile> {
        let dir = match self.archive_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        Ok(NamedTempFile::new_in(dir)?)
    }

    /// Promotes the fully written replacement over the original archive
    /// with a single rename.
    fn promote(&self, tmp: NamedTempFile) -> Result<()> {
        tmp.persist(&self.archive_path).map_err(|e| {
            log::warn!(
                "failed to replace {}: {}",
                self.archive_path.display(),
                e.error
            );
            Error::Io(e.error)
        })?;
        Ok(())
    }
}
