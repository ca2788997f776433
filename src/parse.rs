//! JSON parsing into the value model.
//!
//! A recursive-descent parser with a fixed nesting limit
//! ([`crate::constants::MAX_PARSE_DEPTH`]). Literals are strict and
//! case-sensitive: `true`, `false` and `null` parse, `True`, `False`
//! and `Null` do not. The non-finite number tokens this library emits
//! (`NaN`, `Infinity`, `-Infinity`) are accepted back, so every
//! serialized document round-trips.
//!
//! Strings are handled byte-oriented, like the rest of the crate: raw
//! string content is copied verbatim without UTF-8 validation, escape
//! sequences (including `\uXXXX` with surrogate pairs) decode to
//! UTF-8, and a decoded `\u0000` produces a real NUL byte in the stored
//! string.

use std::fmt;

use crate::builder;
use crate::constants::MAX_PARSE_DEPTH;
use crate::value::Value;

/// Error type for parsing failures.
///
/// Offsets are byte positions into the input.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    /// Input ended in the middle of a value.
    UnexpectedEof,
    /// A byte that cannot start or continue the expected construct.
    UnexpectedByte {
        /// Position of the offending byte.
        offset: usize,
        /// The byte found.
        byte: u8,
    },
    /// A keyword that is not exactly `true`, `false`, `null`, `NaN`,
    /// `Infinity` or `-Infinity`.
    InvalidLiteral {
        /// Position where the keyword started.
        offset: usize,
    },
    /// A malformed number token.
    InvalidNumber {
        /// Position where the number started.
        offset: usize,
    },
    /// A malformed escape sequence, including unpaired surrogates.
    InvalidEscape {
        /// Position of the backslash.
        offset: usize,
    },
    /// Nesting deeper than the supported limit.
    DepthExceeded {
        /// The limit that was hit.
        limit: usize,
    },
    /// Non-whitespace content after the end of the value.
    TrailingData {
        /// Position of the first trailing byte.
        offset: usize,
    },
}

impl ParseError {
    /// The byte offset associated with this error, when there is one.
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::UnexpectedEof | Self::DepthExceeded { .. } => None,
            Self::UnexpectedByte { offset, .. }
            | Self::InvalidLiteral { offset }
            | Self::InvalidNumber { offset }
            | Self::InvalidEscape { offset }
            | Self::TrailingData { offset } => Some(*offset),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof => write!(f, "unexpected end of input"),
            Self::UnexpectedByte { offset, byte } => {
                write!(f, "unexpected byte 0x{byte:02x} at offset {offset}")
            }
            Self::InvalidLiteral { offset } => {
                write!(f, "invalid literal at offset {offset}")
            }
            Self::InvalidNumber { offset } => {
                write!(f, "invalid number at offset {offset}")
            }
            Self::InvalidEscape { offset } => {
                write!(f, "invalid escape sequence at offset {offset}")
            }
            Self::DepthExceeded { limit } => {
                write!(f, "nesting exceeds the supported depth of {limit}")
            }
            Self::TrailingData { offset } => {
                write!(f, "trailing data after value at offset {offset}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse a JSON document from text.
///
/// ```
/// let value = fastjson::parse(r#"{"b":2,"a":1}"#).unwrap();
/// assert_eq!(value.get("b").int64(), 2);
/// assert_eq!(value.keys(), ["b", "a"]);
/// ```
pub fn parse(text: &str) -> Result<Value, ParseError> {
    parse_bytes(text.as_bytes())
}

/// Parse a JSON document from bytes.
///
/// Raw (unescaped) string content is taken verbatim, so the resulting
/// string values carry the input's bytes whether or not they are valid
/// UTF-8.
pub fn parse_bytes(bytes: &[u8]) -> Result<Value, ParseError> {
    let mut parser = Parser { bytes, pos: 0 };
    let value = parser.parse_value(0)?;
    parser.skip_ws();
    if parser.pos < parser.bytes.len() {
        return Err(ParseError::TrailingData { offset: parser.pos });
    }
    Ok(value)
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn skip_ws(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.bytes.get(self.pos) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn parse_value(&mut self, depth: usize) -> Result<Value, ParseError> {
        if depth >= MAX_PARSE_DEPTH {
            return Err(ParseError::DepthExceeded {
                limit: MAX_PARSE_DEPTH,
            });
        }
        self.skip_ws();
        let Some(b) = self.peek() else {
            return Err(ParseError::UnexpectedEof);
        };
        match b {
            b'{' => self.parse_object(depth),
            b'[' => self.parse_array(depth),
            b'"' => {
                let bytes = self.parse_string_bytes()?;
                Ok(builder::string_bytes(&bytes))
            }
            b't' => self.literal(b"true", builder::bool(true)),
            b'f' => self.literal(b"false", builder::bool(false)),
            b'n' => self.literal(b"null", Value::null()),
            b'N' => self.literal(b"NaN", builder::float(f64::NAN)),
            b'I' => self.literal(b"Infinity", builder::float(f64::INFINITY)),
            b'-' if self.bytes.get(self.pos + 1) == Some(&b'I') => {
                self.literal(b"-Infinity", builder::float(f64::NEG_INFINITY))
            }
            b'-' | b'0'..=b'9' => self.parse_number(),
            _ => Err(ParseError::UnexpectedByte {
                offset: self.pos,
                byte: b,
            }),
        }
    }

    fn literal(&mut self, expected: &[u8], value: Value) -> Result<Value, ParseError> {
        let end = self.pos + expected.len();
        if self.bytes.get(self.pos..end) == Some(expected) {
            self.pos = end;
            Ok(value)
        } else {
            Err(ParseError::InvalidLiteral { offset: self.pos })
        }
    }

    fn parse_object(&mut self, depth: usize) -> Result<Value, ParseError> {
        self.pos += 1; // consume '{'
        let object = builder::obj();
        self.skip_ws();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            return Ok(object);
        }
        loop {
            self.skip_ws();
            match self.peek() {
                Some(b'"') => {}
                Some(byte) => {
                    return Err(ParseError::UnexpectedByte {
                        offset: self.pos,
                        byte,
                    })
                }
                None => return Err(ParseError::UnexpectedEof),
            }
            let key_bytes = self.parse_string_bytes()?;
            let key = String::from_utf8_lossy(&key_bytes).into_owned();
            self.skip_ws();
            match self.peek() {
                Some(b':') => self.pos += 1,
                Some(byte) => {
                    return Err(ParseError::UnexpectedByte {
                        offset: self.pos,
                        byte,
                    })
                }
                None => return Err(ParseError::UnexpectedEof),
            }
            let value = self.parse_value(depth + 1)?;
            // duplicate keys replace, keeping the first key's position
            object.insert(&key, value);
            self.skip_ws();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b'}') => {
                    self.pos += 1;
                    return Ok(object);
                }
                Some(byte) => {
                    return Err(ParseError::UnexpectedByte {
                        offset: self.pos,
                        byte,
                    })
                }
                None => return Err(ParseError::UnexpectedEof),
            }
        }
    }

    fn parse_array(&mut self, depth: usize) -> Result<Value, ParseError> {
        self.pos += 1; // consume '['
        let array = builder::arr();
        self.skip_ws();
        if self.peek() == Some(b']') {
            self.pos += 1;
            return Ok(array);
        }
        loop {
            let value = self.parse_value(depth + 1)?;
            array.append(value);
            self.skip_ws();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b']') => {
                    self.pos += 1;
                    return Ok(array);
                }
                Some(byte) => {
                    return Err(ParseError::UnexpectedByte {
                        offset: self.pos,
                        byte,
                    })
                }
                None => return Err(ParseError::UnexpectedEof),
            }
        }
    }

    fn parse_string_bytes(&mut self) -> Result<Vec<u8>, ParseError> {
        self.pos += 1; // consume '"'
        let mut out = Vec::new();
        loop {
            let Some(&b) = self.bytes.get(self.pos) else {
                return Err(ParseError::UnexpectedEof);
            };
            match b {
                b'"' => {
                    self.pos += 1;
                    return Ok(out);
                }
                b'\\' => {
                    self.pos += 1;
                    self.parse_escape(&mut out)?;
                }
                0x00..=0x1f => {
                    return Err(ParseError::UnexpectedByte {
                        offset: self.pos,
                        byte: b,
                    })
                }
                _ => {
                    out.push(b);
                    self.pos += 1;
                }
            }
        }
    }

    fn parse_escape(&mut self, out: &mut Vec<u8>) -> Result<(), ParseError> {
        let offset = self.pos - 1;
        let Some(&b) = self.bytes.get(self.pos) else {
            return Err(ParseError::UnexpectedEof);
        };
        self.pos += 1;
        let decoded = match b {
            b'"' => b'"',
            b'\\' => b'\\',
            b'/' => b'/',
            b'b' => 0x08,
            b'f' => 0x0c,
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'u' => {
                let unit = self.hex4(offset)?;
                let codepoint = if (0xD800..=0xDBFF).contains(&unit) {
                    if self.bytes.get(self.pos..self.pos + 2) != Some(b"\\u".as_slice()) {
                        return Err(ParseError::InvalidEscape { offset });
                    }
                    self.pos += 2;
                    let low = self.hex4(offset)?;
                    if !(0xDC00..=0xDFFF).contains(&low) {
                        return Err(ParseError::InvalidEscape { offset });
                    }
                    0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00)
                } else if (0xDC00..=0xDFFF).contains(&unit) {
                    return Err(ParseError::InvalidEscape { offset });
                } else {
                    unit
                };
                let ch = char::from_u32(codepoint)
                    .ok_or(ParseError::InvalidEscape { offset })?;
                let mut buf = [0u8; 4];
                out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
                return Ok(());
            }
            _ => return Err(ParseError::InvalidEscape { offset }),
        };
        out.push(decoded);
        Ok(())
    }

    fn hex4(&mut self, offset: usize) -> Result<u32, ParseError> {
        let digits = self
            .bytes
            .get(self.pos..self.pos + 4)
            .ok_or(ParseError::UnexpectedEof)?;
        let mut unit = 0u32;
        for &d in digits {
            let nibble = match d {
                b'0'..=b'9' => u32::from(d - b'0'),
                b'a'..=b'f' => u32::from(d - b'a') + 10,
                b'A'..=b'F' => u32::from(d - b'A') + 10,
                _ => return Err(ParseError::InvalidEscape { offset }),
            };
            unit = unit << 4 | nibble;
        }
        self.pos += 4;
        Ok(unit)
    }

    fn parse_number(&mut self) -> Result<Value, ParseError> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        match self.peek() {
            Some(b'0') => self.pos += 1,
            Some(b'1'..=b'9') => {
                while let Some(b'0'..=b'9') = self.peek() {
                    self.pos += 1;
                }
            }
            _ => return Err(ParseError::InvalidNumber { offset: start }),
        }
        let mut is_float = false;
        if self.peek() == Some(b'.') {
            is_float = true;
            self.pos += 1;
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(ParseError::InvalidNumber { offset: start });
            }
            while let Some(b'0'..=b'9') = self.peek() {
                self.pos += 1;
            }
        }
        if let Some(b'e' | b'E') = self.peek() {
            is_float = true;
            self.pos += 1;
            if let Some(b'+' | b'-') = self.peek() {
                self.pos += 1;
            }
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(ParseError::InvalidNumber { offset: start });
            }
            while let Some(b'0'..=b'9') = self.peek() {
                self.pos += 1;
            }
        }
        let token = std::str::from_utf8(&self.bytes[start..self.pos])
            .map_err(|_| ParseError::InvalidNumber { offset: start })?;
        if !is_float {
            // integral tokens beyond the i64 range fall back to double
            if let Ok(i) = token.parse::<i64>() {
                return Ok(builder::int(i));
            }
        }
        token
            .parse::<f64>()
            .map(builder::float)
            .map_err(|_| ParseError::InvalidNumber { offset: start })
    }
}
