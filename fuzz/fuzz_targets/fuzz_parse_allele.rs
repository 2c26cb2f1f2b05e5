//! Fuzz target for allele classification
//!
//! Arbitrary strings are classified against a fixed reference; breakend
//! parsing must fail with an error, never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if input.len() > 1000 {
            return;
        }

        let _ = ferro_sv::variant::analyze_allele("G", input);
        let _ = ferro_sv::variant::parse_breakend(input);
    }
});
