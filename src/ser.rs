//! The serialization engine: presentation flags, per-kind dispatch,
//! container layout, and the cached-buffer render path.
//!
//! Dispatch order at every node: a null handle emits `null`; a value
//! with a custom serializer installed defers to it; otherwise the
//! default rendering for the value's kind runs. Containers recurse
//! through the same dispatch, so a custom serializer fires wherever
//! its value appears in a document.

use std::cell::Ref;
use std::fmt;
use std::ops::Deref;

use crate::escape;
use crate::num;
use crate::printbuf::{PrintBuf, Sink};
use crate::value::{Payload, Value};

bitflags::bitflags! {
    /// Presentation flags, bitwise-combinable.
    ///
    /// The empty set is the compact form: no whitespace at all. The
    /// simple entry points ([`Value::to_json_string`],
    /// [`std::fmt::Display`]) use [`Flags::SPACED`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Flags: u32 {
        /// A space after each `:`, and padding inside `{` `}` braces.
        /// Ignored where `PRETTY` already separates entries.
        const SPACED = 1 << 0;
        /// One entry per line, nested levels indented two spaces.
        const PRETTY = 1 << 1;
        /// Keep exactly one zero after the decimal point of doubles,
        /// dropping the rest.
        const NO_TRAILING_ZERO = 1 << 2;
        /// With `PRETTY`, indent with one tab per level instead of two
        /// spaces.
        const PRETTY_TAB = 1 << 3;
    }
}

/// Render `value` into `out`. Returns bytes accepted by the sink.
pub(crate) fn write_value(value: &Value, out: &mut dyn Sink, level: usize, flags: Flags) -> usize {
    let Some(node) = value.node.as_deref() else {
        return out.write(b"null");
    };

    let custom = node.custom.borrow();
    if let Some(serializer) = custom.as_ref() {
        return serializer(value, out, level, flags);
    }
    drop(custom);

    match &node.payload {
        Payload::Boolean(true) => out.write(b"true"),
        Payload::Boolean(false) => out.write(b"false"),
        Payload::Int(i) => num::write_int(out, *i),
        Payload::Double(d) => num::write_double(out, *d, flags),
        Payload::String(s) => {
            out.write(b"\"") + escape::escape_bytes(out, s.as_bytes()) + out.write(b"\"")
        }
        Payload::Object(_) => write_object(value, out, level, flags),
        Payload::Array(_) => write_array(value, out, level, flags),
    }
}

fn indent(out: &mut dyn Sink, level: usize, flags: Flags) -> usize {
    if !flags.contains(Flags::PRETTY) {
        return 0;
    }
    let fill: &[u8] = if flags.contains(Flags::PRETTY_TAB) {
        b"\t"
    } else {
        b"  "
    };
    let mut written = 0;
    for _ in 0..level {
        written += out.write(fill);
    }
    written
}

fn write_object(value: &Value, out: &mut dyn Sink, level: usize, flags: Flags) -> usize {
    let Some(Payload::Object(cell)) = value.payload() else {
        return 0;
    };
    let map = cell.borrow();
    let pretty = flags.contains(Flags::PRETTY);
    let spaced = flags.contains(Flags::SPACED);

    let mut written = out.write(b"{");
    if pretty {
        written += out.write(b"\n");
    }
    let mut first = true;
    for (key, entry) in map.iter() {
        if !first {
            written += out.write(b",");
            if pretty {
                written += out.write(b"\n");
            }
        }
        first = false;
        if spaced && !pretty {
            written += out.write(b" ");
        }
        written += indent(out, level + 1, flags);
        written += out.write(b"\"");
        written += escape::escape_bytes(out, key.as_bytes());
        written += out.write(if spaced { b"\": ".as_slice() } else { b"\":" });
        written += write_value(entry, out, level + 1, flags);
    }
    if pretty {
        if !first {
            written += out.write(b"\n");
        }
        written += indent(out, level, flags);
    }
    written += if spaced && !pretty {
        out.write(b" }")
    } else {
        out.write(b"}")
    };
    written
}

fn write_array(value: &Value, out: &mut dyn Sink, level: usize, flags: Flags) -> usize {
    let Some(Payload::Array(cell)) = value.payload() else {
        return 0;
    };
    let items = cell.borrow();
    let pretty = flags.contains(Flags::PRETTY);
    let spaced = flags.contains(Flags::SPACED);

    let mut written = out.write(b"[");
    if pretty {
        written += out.write(b"\n");
    }
    let mut first = true;
    for item in items.iter() {
        if !first {
            written += out.write(b",");
            if pretty {
                written += out.write(b"\n");
            }
        }
        first = false;
        if spaced && !pretty {
            written += out.write(b" ");
        }
        written += indent(out, level + 1, flags);
        written += write_value(item, out, level + 1, flags);
    }
    if pretty {
        if !first {
            written += out.write(b"\n");
        }
        written += indent(out, level, flags);
    }
    written += if spaced && !pretty {
        out.write(b" ]")
    } else {
        out.write(b"]")
    };
    written
}

static EMPTY_BUF: PrintBuf = PrintBuf::empty();

/// Rendered JSON text, borrowed from a value's cached render buffer.
///
/// Returned by [`Value::to_json_string`] and
/// [`Value::to_json_string_ext`]; dereferences to `str`. The borrow
/// lasts until the guard drops, and the underlying buffer is reused by
/// the next render of the same value.
///
/// String values built from non-UTF-8 bytes render to non-UTF-8
/// output; for those, the guard holds a lossy copy instead (use
/// [`Value::to_bytes`] when the exact bytes matter).
pub struct Rendered<'a> {
    inner: RenderedInner<'a>,
}

enum RenderedInner<'a> {
    Literal(&'static str),
    Cached(Ref<'a, str>),
    Owned(String),
}

impl<'a> Rendered<'a> {
    pub(crate) fn literal(text: &'static str) -> Self {
        Self {
            inner: RenderedInner::Literal(text),
        }
    }

    pub(crate) fn from_cell(slot: Ref<'a, Option<PrintBuf>>) -> Self {
        let buf = Ref::map(slot, |opt| opt.as_ref().unwrap_or(&EMPTY_BUF));
        if buf.as_str().is_some() {
            Self {
                inner: RenderedInner::Cached(Ref::map(buf, |b| b.as_str().unwrap_or(""))),
            }
        } else {
            Self {
                inner: RenderedInner::Owned(String::from_utf8_lossy(buf.as_bytes()).into_owned()),
            }
        }
    }
}

impl Deref for Rendered<'_> {
    type Target = str;

    fn deref(&self) -> &str {
        match &self.inner {
            RenderedInner::Literal(s) => s,
            RenderedInner::Cached(r) => r,
            RenderedInner::Owned(s) => s,
        }
    }
}

impl AsRef<str> for Rendered<'_> {
    fn as_ref(&self) -> &str {
        self
    }
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self)
    }
}

impl fmt::Debug for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

impl PartialEq<&str> for Rendered<'_> {
    fn eq(&self, other: &&str) -> bool {
        &**self == *other
    }
}
