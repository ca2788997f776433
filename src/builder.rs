//! Constructor functions for building JSON values.

use std::cell::RefCell;

use crate::value::{ObjectMap, Payload, StrStorage, Value};

/// Create an empty object `{}`.
#[must_use]
pub fn obj() -> Value {
    Value::from_payload(Payload::Object(RefCell::new(ObjectMap::default())))
}

/// Create an empty array `[]`.
#[must_use]
pub fn arr() -> Value {
    Value::from_payload(Payload::Array(RefCell::new(Vec::new())))
}

/// Create a string value from text.
#[must_use]
pub fn str<S: AsRef<str>>(value: S) -> Value {
    string_bytes(value.as_ref().as_bytes())
}

/// Create a string value from raw bytes.
///
/// The byte count is authoritative: embedded NUL bytes are stored and
/// serialized (`\u0000`), and content is not required to be UTF-8.
/// Strings shorter than the inline capacity live inside the value
/// itself; longer ones get their own heap allocation.
#[must_use]
pub fn string_bytes(value: &[u8]) -> Value {
    Value::from_payload(Payload::String(StrStorage::from_bytes(value)))
}

/// Create an integer value.
#[must_use]
pub fn int(value: i64) -> Value {
    Value::from_payload(Payload::Int(value))
}

/// Create a double value.
#[must_use]
pub fn float(value: f64) -> Value {
    Value::from_payload(Payload::Double(value))
}

/// Create a double value that serializes as `text`, verbatim.
///
/// Useful when the original textual spelling of a number matters more
/// than the shortest form, e.g. to keep `0.1` exactly as it appeared
/// in some upstream document. Accessors see `value`; only
/// serialization uses `text`.
///
/// ```
/// let v = fastjson::double_s(0.1, "0.1");
/// assert_eq!(&*v.to_json_string(), "0.1");
/// assert_eq!(v.float(), 0.1);
/// ```
#[must_use]
pub fn double_s(value: f64, text: &str) -> Value {
    let v = float(value);
    let text = text.to_owned();
    v.set_serializer(Some(Box::new(move |_, out, _, _| {
        out.write(text.as_bytes())
    })));
    v
}

/// Create a boolean value.
#[must_use]
pub fn bool(value: bool) -> Value {
    Value::from_payload(Payload::Boolean(value))
}

/// Create a null handle.
#[must_use]
pub fn null() -> Value {
    Value::null()
}
