//! Fuzz target for sequential archive reading with arbitrary byte input.
//!
//! This target exercises the container parsing and inflate paths with
//! potentially malformed or adversarial input. The goal is to find panics,
//! hangs, or memory issues in the parsing logic.
//!
//! Run with: cargo +nightly fuzz run archive_read

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::{Cursor, Read};

fuzz_target!(|data: &[u8]| {
    let mut reader = rezip::read::ArchiveReader::new(Cursor::new(data));

    // We don't care about the result - we're looking for panics or hangs.
    let mut buf = [0u8; 4096];
    loop {
        match reader.next_entry() {
            Ok(Some(entry)) => {
                let _ = entry.name.as_str();
                let _ = entry.uncompressed_size;
                let _ = entry.is_directory;

                // Drain the payload to exercise decompression
                loop {
                    match reader.read(&mut buf) {
                        Ok(0) => break,
                        Ok(_) => {}
                        Err(_) => break,
                    }
                }
                if reader.finish_entry().is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(_) => break,
        }
    }
});
