//! JSON string escaping.
//!
//! Escaping dominates serialization time for string-heavy documents,
//! so the common case - a byte that passes through untouched - must be
//! as cheap as possible. A 256-entry classification table answers
//! "does this byte need escaping" with a single indexed load, and the
//! walker keeps a sliding start offset so runs of pass-through bytes
//! are flushed to the sink in one call instead of byte by byte.
//!
//! The engine is byte-oriented: it never decodes UTF-8, and multi-byte
//! sequences pass through verbatim. Embedded NUL bytes are legal input
//! and escape to `\u0000`.

use crate::constants::HEX_CHARS;
use crate::printbuf::Sink;

/// Classification table: true for bytes that cannot appear verbatim
/// inside a JSON string (controls, `"`, `\`, `/`).
static NEEDS_ESCAPE: [bool; 256] = build_table();

const fn build_table() -> [bool; 256] {
    let mut table = [false; 256];
    let mut i = 0;
    while i < 0x20 {
        table[i] = true;
        i += 1;
    }
    table[b'"' as usize] = true;
    table[b'\\' as usize] = true;
    table[b'/' as usize] = true;
    table
}

/// Write the escaped form of `bytes` to `out`, without surrounding
/// quotes. Returns the number of bytes the sink accepted.
pub(crate) fn escape_bytes(out: &mut dyn Sink, bytes: &[u8]) -> usize {
    let mut written = 0;
    let mut start = 0;
    for (i, &b) in bytes.iter().enumerate() {
        if !NEEDS_ESCAPE[b as usize] {
            continue;
        }
        if i > start {
            written += out.write(&bytes[start..i]);
        }
        written += match b {
            0x08 => out.write(b"\\b"),
            b'\t' => out.write(b"\\t"),
            b'\n' => out.write(b"\\n"),
            0x0c => out.write(b"\\f"),
            b'\r' => out.write(b"\\r"),
            b'"' => out.write(b"\\\""),
            b'\\' => out.write(b"\\\\"),
            b'/' => out.write(b"\\/"),
            _ => {
                let seq = [
                    b'\\',
                    b'u',
                    b'0',
                    b'0',
                    HEX_CHARS[(b >> 4) as usize],
                    HEX_CHARS[(b & 0x0f) as usize],
                ];
                out.write(&seq)
            }
        };
        start = i + 1;
    }
    if start < bytes.len() {
        written += out.write(&bytes[start..]);
    }
    written
}
