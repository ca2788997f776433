//! The JSON value model: a reference-counted, kind-tagged node behind
//! a cheap-to-clone handle.
//!
//! # Null handles
//!
//! The JSON value `null` is represented by a handle with no backing
//! node at all. Every operation accepts such a handle and treats it as
//! a null value, so code never needs a "is this really null" check
//! before calling an accessor.
//!
//! # Sharing and mutation
//!
//! Cloning a [`Value`] is a reference-count bump; clones are handles
//! to the *same* node, and in-place mutators ([`Value::insert`],
//! [`Value::append`], ...) are visible through every handle. The node
//! is destroyed exactly once, when the last handle drops, releasing
//! children recursively.
//!
//! `Value` uses `Rc` internally and is **not** `Send` or `Sync`: a
//! value and its transitive children belong to one thread. This is
//! intentional - the library targets serialization-heavy hot paths
//! where non-atomic reference counting is measurably cheaper, and the
//! compiler enforces the single-thread contract instead of leaving it
//! to documentation.

use std::borrow::Cow;
use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::constants::INLINE_STRING_CAPACITY;
use crate::num;
use crate::printbuf::{FnSink, Sink};
use crate::ser::{self, Flags, Rendered};

/// Insertion-ordered key/value table backing object values.
///
/// Keys are `Cow<'static, str>`: runtime keys are copied in at
/// insertion, while keys added through [`Value::insert_static`] borrow
/// the caller's static data and are never duplicated or freed.
pub(crate) type ObjectMap = IndexMap<Cow<'static, str>, Value, ahash::RandomState>;

/// String payload with small-string optimization.
///
/// The byte count is authoritative; embedded NUL bytes are legal and
/// preserved. Content is not required to be UTF-8.
pub(crate) enum StrStorage {
    Inline {
        len: u8,
        data: [u8; INLINE_STRING_CAPACITY],
    },
    Heap(Box<[u8]>),
}

impl StrStorage {
    pub(crate) fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.len() < INLINE_STRING_CAPACITY {
            let mut data = [0u8; INLINE_STRING_CAPACITY];
            data[..bytes.len()].copy_from_slice(bytes);
            Self::Inline {
                len: bytes.len() as u8,
                data,
            }
        } else {
            Self::Heap(bytes.into())
        }
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Inline { len, data } => &data[..usize::from(*len)],
            Self::Heap(bytes) => bytes,
        }
    }

    #[cfg(test)]
    pub(crate) fn is_inline(&self) -> bool {
        matches!(self, Self::Inline { .. })
    }
}

/// Kind-specific payload of a node.
pub(crate) enum Payload {
    Boolean(bool),
    Int(i64),
    Double(f64),
    String(StrStorage),
    Object(RefCell<ObjectMap>),
    Array(RefCell<Vec<Value>>),
}

/// A custom per-value serializer.
///
/// Receives the value being rendered, the output sink, the current
/// indent level and the active flags, and returns the number of bytes
/// the sink accepted. State the serializer needs travels inside the
/// closure; when the closure is dropped - on replacement or on final
/// release of the value, whichever happens first - its captures are
/// dropped with it, running their destructors exactly once.
pub type SerializeFn = dyn Fn(&Value, &mut dyn Sink, usize, Flags) -> usize;

pub(crate) struct Node {
    pub(crate) payload: Payload,
    /// Custom serializer slot; `None` means the default per-kind path.
    pub(crate) custom: RefCell<Option<Box<SerializeFn>>>,
    /// Lazily-created render buffer, reused across repeated renders of
    /// this value.
    pub(crate) format_buf: RefCell<Option<crate::PrintBuf>>,
}

impl Node {
    fn new(payload: Payload) -> Rc<Self> {
        Rc::new(Self {
            payload,
            custom: RefCell::new(None),
            format_buf: RefCell::new(None),
        })
    }
}

/// The seven JSON kinds a [`Value`] can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// The absent value; reported by null handles.
    Null,
    /// `true` or `false`.
    Boolean,
    /// A signed 64-bit integer.
    Int,
    /// A 64-bit IEEE float.
    Double,
    /// A byte string (usually UTF-8, embedded NULs allowed).
    String,
    /// An insertion-ordered string-keyed map.
    Object,
    /// An index-ordered sequence.
    Array,
}

impl Kind {
    /// Human-readable kind name, handy in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Int => "int",
            Self::Double => "double",
            Self::String => "string",
            Self::Object => "object",
            Self::Array => "array",
        }
    }
}

/// A JSON value handle.
///
/// Build values with the free constructors in [`crate::builder`],
/// chain with [`set`](Self::set)/[`push`](Self::push), read with the
/// coercing accessors, and render with
/// [`to_json_string`](Self::to_json_string) or
/// [`write_ext`](Self::write_ext):
///
/// ```
/// use fastjson::{obj, str, int, Flags};
///
/// let value = obj()
///     .set("abc", int(12))
///     .set("foo", str("bar"));
///
/// assert_eq!(&*value.to_json_string(), r#"{ "abc": 12, "foo": "bar" }"#);
/// assert_eq!(
///     &*value.to_json_string_ext(Flags::empty()),
///     r#"{"abc":12,"foo":"bar"}"#
/// );
/// ```
#[derive(Clone, Default)]
pub struct Value {
    pub(crate) node: Option<Rc<Node>>,
}

impl Value {
    pub(crate) fn from_payload(payload: Payload) -> Self {
        Self {
            node: Some(Node::new(payload)),
        }
    }

    /// The null handle.
    #[must_use]
    pub const fn null() -> Self {
        Self { node: None }
    }

    #[inline]
    pub(crate) fn payload(&self) -> Option<&Payload> {
        self.node.as_deref().map(|n| &n.payload)
    }

    // === Inspection ===

    /// The kind of this value. Null handles report [`Kind::Null`].
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self.payload() {
            None => Kind::Null,
            Some(Payload::Boolean(_)) => Kind::Boolean,
            Some(Payload::Int(_)) => Kind::Int,
            Some(Payload::Double(_)) => Kind::Double,
            Some(Payload::String(_)) => Kind::String,
            Some(Payload::Object(_)) => Kind::Object,
            Some(Payload::Array(_)) => Kind::Array,
        }
    }

    /// True for the null handle.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.node.is_none()
    }

    /// True if this value reports `kind`.
    #[must_use]
    pub fn is_kind(&self, kind: Kind) -> bool {
        self.kind() == kind
    }

    // === Coercing accessors ===
    //
    // Accessors never fail: a value of an unexpected kind coerces
    // (ints and doubles test non-zero for bool, strings parse for
    // numbers, ...) or falls back to a documented default.

    /// The value as a boolean.
    ///
    /// Booleans return themselves; ints and doubles test non-zero;
    /// strings test non-empty; everything else is `false`.
    #[must_use]
    pub fn bool(&self) -> bool {
        match self.payload() {
            Some(Payload::Boolean(b)) => *b,
            Some(Payload::Int(i)) => *i != 0,
            Some(Payload::Double(d)) => *d != 0.0,
            Some(Payload::String(s)) => !s.as_bytes().is_empty(),
            _ => false,
        }
    }

    /// The value as an `i64`.
    ///
    /// Doubles truncate toward zero, booleans map to 0/1, strings go
    /// through [`crate::parse_int64`]; everything else is 0.
    #[must_use]
    pub fn int64(&self) -> i64 {
        match self.payload() {
            Some(Payload::Int(i)) => *i,
            Some(Payload::Double(d)) => *d as i64,
            Some(Payload::Boolean(b)) => i64::from(*b),
            Some(Payload::String(s)) => {
                let text = String::from_utf8_lossy(s.as_bytes());
                num::parse_int64(&text).unwrap_or(0)
            }
            _ => 0,
        }
    }

    /// The value as an `i32`, saturating at the `i32` bounds.
    #[must_use]
    pub fn int(&self) -> i32 {
        self.int64()
            .clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }

    /// The value as an `f64`.
    ///
    /// Ints widen, booleans map to 0.0/1.0, strings must parse in
    /// full (otherwise 0.0); everything else is 0.0.
    #[must_use]
    pub fn float(&self) -> f64 {
        match self.payload() {
            Some(Payload::Double(d)) => *d,
            Some(Payload::Int(i)) => *i as f64,
            Some(Payload::Boolean(b)) => f64::from(u8::from(*b)),
            Some(Payload::String(s)) => {
                let text = String::from_utf8_lossy(s.as_bytes());
                num::string_to_double(&text)
            }
            _ => 0.0,
        }
    }

    /// The value as text.
    ///
    /// Strings return their content (lossily converted if the bytes
    /// are not UTF-8); any other kind returns its rendered JSON form,
    /// the same text [`to_json_string`](Self::to_json_string) produces.
    #[must_use]
    pub fn str(&self) -> Cow<'_, str> {
        match self.payload() {
            Some(Payload::String(s)) => String::from_utf8_lossy(s.as_bytes()),
            _ => Cow::Owned((*self.to_json_string()).to_owned()),
        }
    }

    /// Byte length of a string value; 0 for every other kind.
    #[must_use]
    pub fn str_len(&self) -> usize {
        match self.payload() {
            Some(Payload::String(s)) => s.as_bytes().len(),
            _ => 0,
        }
    }

    /// Raw bytes of a string value.
    #[must_use]
    pub fn str_bytes(&self) -> Option<&[u8]> {
        match self.payload() {
            Some(Payload::String(s)) => Some(s.as_bytes()),
            _ => None,
        }
    }

    #[cfg(test)]
    pub(crate) fn string_is_inline(&self) -> Option<bool> {
        match self.payload() {
            Some(Payload::String(s)) => Some(s.is_inline()),
            _ => None,
        }
    }

    // === Objects ===

    /// Look up `key`, returning a handle to the stored value or a null
    /// handle on a miss (or when this is not an object).
    #[must_use]
    pub fn get(&self, key: &str) -> Value {
        self.try_get(key).unwrap_or_default()
    }

    /// Look up `key`, distinguishing "absent" from "stored null".
    #[must_use]
    pub fn try_get(&self, key: &str) -> Option<Value> {
        match self.payload() {
            Some(Payload::Object(cell)) => cell.borrow().get(key).cloned(),
            _ => None,
        }
    }

    /// Insert or replace `key`.
    ///
    /// Replacement swaps the value in place: the entry keeps its
    /// position in iteration order and its original key instance. Has
    /// no effect unless this value is an object.
    pub fn insert(&self, key: &str, value: Value) {
        if let Some(Payload::Object(cell)) = self.payload() {
            let mut map = cell.borrow_mut();
            if let Some(slot) = map.get_mut(key) {
                *slot = value;
            } else {
                map.insert(Cow::Owned(key.to_owned()), value);
            }
        }
    }

    /// [`insert`](Self::insert) for a `'static` key: the caller's
    /// string is borrowed, never copied.
    pub fn insert_static(&self, key: &'static str, value: Value) {
        if let Some(Payload::Object(cell)) = self.payload() {
            let mut map = cell.borrow_mut();
            if let Some(slot) = map.get_mut(key) {
                *slot = value;
            } else {
                map.insert(Cow::Borrowed(key), value);
            }
        }
    }

    /// Remove `key`, preserving the order of the surviving entries.
    /// Returns whether the key was present.
    pub fn remove(&self, key: &str) -> bool {
        match self.payload() {
            Some(Payload::Object(cell)) => cell.borrow_mut().shift_remove(key).is_some(),
            _ => false,
        }
    }

    /// The keys of an object in insertion order; empty for any other
    /// kind.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        match self.payload() {
            Some(Payload::Object(cell)) => {
                cell.borrow().keys().map(|k| k.as_ref().to_owned()).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Iterate an object's entries in insertion order.
    ///
    /// Yields owned `(key, value)` pairs, the value being a handle to
    /// the stored node. The iterator is empty for non-objects.
    /// Mutating the object while iterating is safe but the resulting
    /// entry sequence is unspecified.
    #[must_use]
    pub fn entries(&self) -> Entries<'_> {
        Entries {
            value: self,
            index: 0,
        }
    }

    // === Arrays ===

    /// The element at `index`, or a null handle when out of bounds (or
    /// when this is not an array).
    #[must_use]
    pub fn at(&self, index: usize) -> Value {
        match self.payload() {
            Some(Payload::Array(cell)) => cell.borrow().get(index).cloned().unwrap_or_default(),
            _ => Value::null(),
        }
    }

    /// Append to an array. Has no effect on other kinds.
    pub fn append(&self, value: Value) {
        if let Some(Payload::Array(cell)) = self.payload() {
            cell.borrow_mut().push(value);
        }
    }

    /// Store `value` at `index`, growing the array as needed.
    ///
    /// Intermediate slots created by growth hold null handles; an
    /// existing occupant of `index` is released. Has no effect on
    /// other kinds.
    pub fn put(&self, index: usize, value: Value) {
        if let Some(Payload::Array(cell)) = self.payload() {
            let mut items = cell.borrow_mut();
            if index < items.len() {
                items[index] = value;
            } else {
                while items.len() < index {
                    items.push(Value::null());
                }
                items.push(value);
            }
        }
    }

    /// Sort an array in place with `cmp`. Has no effect on other
    /// kinds.
    pub fn sort_by<F: FnMut(&Value, &Value) -> Ordering>(&self, mut cmp: F) {
        if let Some(Payload::Array(cell)) = self.payload() {
            cell.borrow_mut().sort_by(|a, b| cmp(a, b));
        }
    }

    /// Binary-search a sorted array, returning a handle to the match.
    #[must_use]
    pub fn binary_search_by<F: FnMut(&Value) -> Ordering>(&self, cmp: F) -> Option<Value> {
        match self.payload() {
            Some(Payload::Array(cell)) => {
                let items = cell.borrow();
                let index = items.binary_search_by(cmp).ok()?;
                items.get(index).cloned()
            }
            _ => None,
        }
    }

    // === Containers, shared ===

    /// Entry count of an object or element count of an array; `None`
    /// for every other kind.
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        match self.payload() {
            Some(Payload::Object(cell)) => Some(cell.borrow().len()),
            Some(Payload::Array(cell)) => Some(cell.borrow().len()),
            _ => None,
        }
    }

    /// True for an empty object or array.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len().is_some_and(|len| len == 0)
    }

    // === Fluent building ===

    /// Chainable [`insert`](Self::insert).
    #[must_use]
    pub fn set(self, key: &str, value: Value) -> Value {
        self.insert(key, value);
        self
    }

    /// Chainable [`append`](Self::append).
    #[must_use]
    pub fn push(self, value: Value) -> Value {
        self.append(value);
        self
    }

    // === Custom serialization ===

    /// Install or clear a custom serializer for this value.
    ///
    /// While installed, the closure replaces the default rendering of
    /// this node wherever it appears - standalone or nested inside a
    /// larger document. Passing `None` restores the default for the
    /// value's kind.
    ///
    /// Any previously installed closure is dropped *immediately*, even
    /// if other handles to this value are still alive; only the
    /// still-installed closure waits for the final handle to drop. A
    /// no-op on null handles.
    ///
    /// Calling this from inside the value's own custom serializer is
    /// not supported and will panic.
    pub fn set_serializer(&self, serializer: Option<Box<SerializeFn>>) {
        if let Some(node) = self.node.as_deref() {
            *node.custom.borrow_mut() = serializer;
        }
    }

    // === Rendering ===

    /// Render with the default presentation ([`Flags::SPACED`]).
    ///
    /// The returned guard borrows the value's cached render buffer; it
    /// stays valid until the next render of the same value. See
    /// [`to_json_string_ext`](Self::to_json_string_ext).
    #[must_use]
    pub fn to_json_string(&self) -> Rendered<'_> {
        self.to_json_string_ext(Flags::SPACED)
    }

    /// Render with explicit [`Flags`].
    ///
    /// Output lands in a buffer cached on the value, so repeated
    /// renders of the same root reuse one allocation. Rendering while
    /// a previous [`Rendered`] guard for the same value is still alive
    /// will panic; let the guard go first.
    #[must_use]
    pub fn to_json_string_ext(&self, flags: Flags) -> Rendered<'_> {
        let Some(node) = self.node.as_deref() else {
            return Rendered::literal("null");
        };
        {
            let mut slot = node.format_buf.borrow_mut();
            let buf = slot.get_or_insert_with(crate::PrintBuf::new);
            buf.reset();
            ser::write_value(self, buf, 0, flags);
        }
        Rendered::from_cell(node.format_buf.borrow())
    }

    /// Stream the rendered form into `out`, returning how many bytes
    /// the sink accepted. A refusing sink yields truncated output and
    /// a short count; nothing is retried.
    pub fn write_ext(&self, out: &mut dyn Sink, flags: Flags) -> usize {
        ser::write_value(self, out, 0, flags)
    }

    /// Render to owned bytes with the default presentation.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_ext(&mut out, Flags::SPACED);
        out
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut result = Ok(());
        {
            let mut sink = FnSink(|bytes: &[u8]| {
                if result.is_err() {
                    return 0;
                }
                match f.write_str(&String::from_utf8_lossy(bytes)) {
                    Ok(()) => bytes.len(),
                    Err(e) => {
                        result = Err(e);
                        0
                    }
                }
            });
            self.write_ext(&mut sink, Flags::SPACED);
        }
        result
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Iterator over an object's entries in insertion order.
///
/// Created by [`Value::entries`].
#[derive(Debug)]
pub struct Entries<'a> {
    value: &'a Value,
    index: usize,
}

impl Iterator for Entries<'_> {
    type Item = (String, Value);

    fn next(&mut self) -> Option<Self::Item> {
        match self.value.payload()? {
            Payload::Object(cell) => {
                let map = cell.borrow();
                let (key, value) = map.get_index(self.index)?;
                self.index += 1;
                Some((key.as_ref().to_owned(), value.clone()))
            }
            _ => None,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .value
            .len()
            .unwrap_or(0)
            .saturating_sub(self.index);
        (0, Some(remaining))
    }
}
