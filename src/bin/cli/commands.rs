//! Command implementations for the CLI.

use std::path::{Path, PathBuf};

use rezip::{ArchiveEditor, EditResult, WriteOptions};

use crate::exit_codes::{ExitCode, error_to_exit_code};

fn report_notices(result: &EditResult, quiet: bool) {
    if quiet {
        return;
    }
    for notice in &result.notices {
        println!("{}", notice);
    }
}

pub fn create(archive: &Path, source: &Path, level: u32, quiet: bool) -> ExitCode {
    let options = match WriteOptions::new().level(level) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::BadArgs;
        }
    };
    let editor = ArchiveEditor::new(archive).options(options);
    match editor.create(source) {
        Ok(result) => {
            if !quiet {
                println!(
                    "Created '{}' with {} entries ({:.1}% space saved)",
                    archive.display(),
                    result.entries_written,
                    result.space_savings() * 100.0
                );
            }
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            error_to_exit_code(&e)
        }
    }
}

pub fn list(archive: &Path) -> ExitCode {
    let editor = ArchiveEditor::new(archive);
    match editor.list() {
        Ok(entries) => {
            println!("{:>12} {:>12} {:>9} Name", "Size", "Packed", "Method");
            for entry in &entries {
                println!(
                    "{:>12} {:>12} {:>9} {}",
                    entry.uncompressed_size, entry.compressed_size, entry.method, entry.name
                );
            }
            println!("{} entries", entries.len());
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            error_to_exit_code(&e)
        }
    }
}

pub fn extract(archive: &Path, output: &Path, quiet: bool) -> ExitCode {
    let editor = ArchiveEditor::new(archive);
    match editor.extract_all(output) {
        Ok(result) => {
            if !quiet {
                println!(
                    "Extracted {} entries ({} bytes) to '{}'",
                    result.entries_extracted,
                    result.bytes_extracted,
                    output.display()
                );
            }
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            error_to_exit_code(&e)
        }
    }
}

pub fn add(archive: &Path, files: Vec<PathBuf>, quiet: bool) -> ExitCode {
    let editor = ArchiveEditor::new(archive);
    match editor.add_files(&files) {
        Ok(result) => {
            report_notices(&result, quiet);
            if !quiet {
                println!(
                    "Added {} of {} files to '{}'",
                    result.entries_added,
                    files.len(),
                    archive.display()
                );
            }
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            error_to_exit_code(&e)
        }
    }
}

pub fn remove(archive: &Path, names: &[String], quiet: bool) -> ExitCode {
    let editor = ArchiveEditor::new(archive);
    match editor.remove_files(names) {
        Ok(result) => {
            report_notices(&result, quiet);
            if !quiet {
                println!(
                    "Removed {} entries, {} kept",
                    result.entries_removed, result.entries_kept
                );
            }
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            error_to_exit_code(&e)
        }
    }
}

pub fn change_level(archive: &Path, level: u32, quiet: bool) -> ExitCode {
    let editor = ArchiveEditor::new(archive);
    match editor.change_compression_level(level) {
        Ok(result) => {
            if !quiet {
                println!(
                    "Re-encoded {} entries of '{}' at level {}",
                    result.entries_kept,
                    archive.display(),
                    level
                );
            }
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            error_to_exit_code(&e)
        }
    }
}
