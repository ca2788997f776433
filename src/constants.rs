//! Centralized constants and tunables for the fastjson crate.
//!
//! # Environment Variables
//!
//! | Variable                 | Default | Description                          |
//! |--------------------------|---------|--------------------------------------|
//! | `FASTJSON_PRINTBUF_SIZE` | 32      | Initial capacity of render buffers   |
//!
//! The print-buffer size is read once per process. Applications that
//! routinely render large documents can raise it to skip the first few
//! buffer growth steps.

use std::sync::OnceLock;

// ============================================================================
// VALUE STORAGE
// ============================================================================

/// Strings shorter than this many bytes are stored inline in the value
/// itself; longer strings go to a separate heap allocation.
pub const INLINE_STRING_CAPACITY: usize = 16;

// ============================================================================
// PARSER LIMITS
// ============================================================================

/// Maximum nesting depth accepted by the parser.
///
/// This doubles as the documented safe-nesting bound for serialization
/// and destruction, both of which walk the tree recursively.
pub const MAX_PARSE_DEPTH: usize = 64;

// ============================================================================
// RENDER BUFFERS
// ============================================================================

/// Default initial capacity for render buffers - conservative, most
/// rendered values fit a cache line or two.
const DEFAULT_PRINTBUF_CAPACITY: usize = 32;

/// Cached print-buffer capacity from environment.
static PRINTBUF_CAPACITY_CACHE: OnceLock<usize> = OnceLock::new();

/// Returns the initial capacity used for newly created render buffers.
///
/// Reads `FASTJSON_PRINTBUF_SIZE` on first call and caches the result
/// for the lifetime of the process. Falls back to 32 bytes if the
/// variable is unset or invalid.
#[inline]
pub fn printbuf_initial_capacity() -> usize {
    *PRINTBUF_CAPACITY_CACHE.get_or_init(|| {
        std::env::var("FASTJSON_PRINTBUF_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PRINTBUF_CAPACITY)
    })
}

// ============================================================================
// ENCODING
// ============================================================================

/// Hex character lookup table for `\u00xy` escape sequences.
pub(crate) const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";
