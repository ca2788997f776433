//! Output plumbing: the [`Sink`] abstraction and the [`PrintBuf`]
//! growable byte buffer.
//!
//! Serialization writes through a `Sink` so the same engine can fill a
//! value's cached render buffer, append to a plain `Vec<u8>`, or hand
//! chunks to a user callback. A sink reports how many bytes it
//! accepted; a sink that accepts fewer bytes than offered produces
//! truncated output, which the serializer reports but never retries.

use crate::constants;

/// Destination for serialized bytes.
pub trait Sink {
    /// Append `bytes`, returning how many were accepted.
    fn write(&mut self, bytes: &[u8]) -> usize;
}

/// A growable byte buffer for rendering JSON text.
///
/// New buffers start at the capacity returned by
/// [`constants::printbuf_initial_capacity`] and grow geometrically
/// through the underlying `Vec`. Each [`Value`](crate::Value) keeps one
/// of these cached so repeated renders of the same root reuse the
/// allocation.
#[derive(Debug)]
pub struct PrintBuf {
    buf: Vec<u8>,
}

impl PrintBuf {
    /// Create a buffer with the process-wide default initial capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(constants::printbuf_initial_capacity())
    }

    /// Create a buffer with an explicit initial capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// A buffer with no backing allocation. Used for static defaults.
    pub(crate) const fn empty() -> Self {
        Self { buf: Vec::new() }
    }

    /// Clear the contents, keeping the allocation for reuse.
    pub fn reset(&mut self) {
        self.buf.clear();
    }

    /// Number of bytes currently in the buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True if nothing has been written since creation or reset.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// The accumulated bytes as text, if they are valid UTF-8.
    ///
    /// Rendering a value whose strings were built from arbitrary bytes
    /// can produce non-UTF-8 output; everything else is guaranteed
    /// valid.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.buf).ok()
    }

    /// Consume the buffer, returning the accumulated bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for PrintBuf {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for PrintBuf {
    #[inline]
    fn write(&mut self, bytes: &[u8]) -> usize {
        self.buf.extend_from_slice(bytes);
        bytes.len()
    }
}

impl Sink for Vec<u8> {
    #[inline]
    fn write(&mut self, bytes: &[u8]) -> usize {
        self.extend_from_slice(bytes);
        bytes.len()
    }
}

/// Adapter turning a closure into a [`Sink`].
///
/// The closure receives each chunk and returns how many bytes it
/// accepted, which lets callers stream serialized output anywhere:
///
/// ```
/// use fastjson::{FnSink, Flags};
///
/// let value = fastjson::int(7);
/// let mut out = Vec::new();
/// let written = value.write_ext(
///     &mut FnSink(|bytes: &[u8]| {
///         out.extend_from_slice(bytes);
///         bytes.len()
///     }),
///     Flags::empty(),
/// );
/// assert_eq!(written, 1);
/// assert_eq!(out, b"7");
/// ```
pub struct FnSink<F>(pub F);

impl<F: FnMut(&[u8]) -> usize> Sink for FnSink<F> {
    #[inline]
    fn write(&mut self, bytes: &[u8]) -> usize {
        (self.0)(bytes)
    }
}

impl<F> std::fmt::Debug for FnSink<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSink").finish_non_exhaustive()
    }
}
