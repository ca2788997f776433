//! Numeric rendering and numeric string coercions.
//!
//! Integers render through `itoa`, finite doubles through `ryu`. Both
//! produce the shortest round-trip-safe form, and `ryu` keeps doubles
//! visibly float (`1.0`, never `1`) so an integer-valued double stays a
//! double on re-parse. Non-finite doubles follow ECMA 262 and render as
//! `NaN`, `Infinity` and `-Infinity`; JSON proper has no spelling for
//! them.

use crate::printbuf::Sink;
use crate::ser::Flags;

/// Render a signed 64-bit integer as shortest decimal.
pub(crate) fn write_int(out: &mut dyn Sink, value: i64) -> usize {
    let mut buf = itoa::Buffer::new();
    out.write(buf.format(value).as_bytes())
}

/// Render a double, honoring [`Flags::NO_TRAILING_ZERO`].
pub(crate) fn write_double(out: &mut dyn Sink, value: f64, flags: Flags) -> usize {
    if value.is_nan() {
        return out.write(b"NaN");
    }
    if value.is_infinite() {
        return if value.is_sign_positive() {
            out.write(b"Infinity")
        } else {
            out.write(b"-Infinity")
        };
    }
    let mut buf = ryu::Buffer::new();
    let text = buf.format_finite(value);
    if flags.contains(Flags::NO_TRAILING_ZERO) {
        out.write(trim_trailing_zeros(text).as_bytes())
    } else {
        out.write(text.as_bytes())
    }
}

/// Drop redundant zeros after the decimal point, always keeping one so
/// the value stays recognisable as a float (`1.250 -> 1.25`,
/// `1.0 -> 1.0`). Exponent forms are left alone.
pub(crate) fn trim_trailing_zeros(text: &str) -> &str {
    let Some(dot) = text.find('.') else {
        return text;
    };
    if text.contains(['e', 'E']) {
        return text;
    }
    let significant = text.trim_end_matches('0').len();
    // never trim past "X.0"
    &text[..significant.max(dot + 2)]
}

/// Parse the leading signed decimal integer out of `text`.
///
/// Mirrors the C library's converter: leading whitespace and an
/// optional sign are accepted, digits are consumed as far as they go
/// (trailing junk is ignored), and overflow saturates at the `i64`
/// bounds. Returns `None` when no digits are present at all.
#[must_use]
pub fn parse_int64(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let bytes = trimmed.as_bytes();
    let (negative, digits) = match bytes.first()? {
        b'-' => (true, &bytes[1..]),
        b'+' => (false, &bytes[1..]),
        _ => (false, bytes),
    };

    let mut acc: i128 = 0;
    let mut seen = false;
    for &b in digits {
        if !b.is_ascii_digit() {
            break;
        }
        seen = true;
        // once past the i64 range the exact magnitude no longer matters
        if acc <= i128::from(i64::MAX) {
            acc = acc * 10 + i128::from(b - b'0');
        }
    }
    if !seen {
        return None;
    }
    let signed = if negative { -acc } else { acc };
    Some(signed.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64)
}

/// Coerce string content to a double the way `strtod` callers expect:
/// the whole remainder after leading whitespace must parse, and a
/// parse that overflows to infinity (rather than spelling an infinity
/// out) collapses to `0.0`.
pub(crate) fn string_to_double(text: &str) -> f64 {
    let trimmed = text.trim_start();
    match trimmed.parse::<f64>() {
        Ok(d) if d.is_infinite() && !is_infinity_literal(trimmed) => 0.0,
        Ok(d) => d,
        Err(_) => 0.0,
    }
}

fn is_infinity_literal(text: &str) -> bool {
    let unsigned = text
        .strip_prefix(['-', '+'])
        .unwrap_or(text);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}
