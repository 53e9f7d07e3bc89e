//! Fuzz target for EntryName::new with arbitrary string input.
//!
//! This target exercises the name validation logic with potentially
//! malformed or adversarial strings. The goal is to find panics or logic
//! errors in the security checks.
//!
//! Run with: cargo +nightly fuzz run entry_name
//!
//! Key security properties being tested:
//! - Path traversal rejection (../)
//! - Absolute path rejection
//! - NUL byte handling

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(name_str) = std::str::from_utf8(data) {
        if let Ok(name) = rezip::EntryName::new(name_str) {
            let validated = name.as_str();

            // Must not contain traversal segments
            assert!(
                !validated.split('/').any(|segment| segment == ".."),
                "Path traversal accepted: {:?}",
                validated
            );

            // Must not be absolute
            assert!(
                !validated.starts_with('/'),
                "Absolute path accepted: {:?}",
                validated
            );

            // Must not contain NUL bytes
            assert!(
                !validated.contains('\0'),
                "NUL byte accepted: {:?}",
                validated
            );
        }
    }
});
