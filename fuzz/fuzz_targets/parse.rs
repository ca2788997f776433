//! Fuzz the parser: arbitrary bytes must never panic, and anything
//! that parses must serialize and re-parse cleanly.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(value) = fastjson::parse_bytes(data) {
        let text = value.to_json_string().to_string();
        // our own output always parses
        let _ = fastjson::parse(&text).unwrap();
    }
});
