//! Numeric coercions between dump tokens and encoded fields.
//!
//! The text dump is transcoded permissively: a token that is not a number
//! becomes NaN, and integer fields are produced from whatever float they hold
//! by truncation and 32-bit wrapping. Every such conversion lives here.

/// 2^32 as `f64`.
const TWO_POW_32: f64 = 4_294_967_296.0;

// =============================================================================
// Token parsing
// =============================================================================

/// Parse one array token as a number.
///
/// Accepts decimal literals with optional sign, fraction and exponent
/// (`1`, `-0.5`, `.5`, `3.`, `1e-3`), unsigned `0x`/`0o`/`0b` integers, and
/// `Infinity` with an optional sign. Surrounding whitespace is ignored and a
/// blank token is `0`. Anything else is NaN; tokens such as `inf`, `nan` or
/// `1_000` are not numbers.
pub fn parse_number(token: &str) -> f64 {
    let s = token.trim_matches(is_space);
    if s.is_empty() {
        return 0.0;
    }

    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    if let Some(value) = parse_prefixed_integer(s) {
        return value;
    }

    if is_decimal_literal(s) {
        return s.parse().unwrap_or(f64::NAN);
    }

    f64::NAN
}

/// Whitespace trimmed around tokens and lines.
pub(crate) fn is_space(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// `0x..`, `0o..` or `0b..`. Returns `None` when `s` has none of the prefixes,
/// `Some(NaN)` when it has one but the digits are invalid.
fn parse_prefixed_integer(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'0' {
        return None;
    }
    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };

    let digits = &s[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }

    let mut value = 0.0f64;
    for c in digits.chars() {
        match c.to_digit(radix) {
            Some(d) => value = value * radix as f64 + d as f64,
            None => return Some(f64::NAN),
        }
    }
    Some(value)
}

/// `[+-]? (digits [. digits?] | . digits) ([eE] [+-]? digits)?`
fn is_decimal_literal(s: &str) -> bool {
    let b = s.as_bytes();
    let mut i = 0;

    if i < b.len() && (b[i] == b'+' || b[i] == b'-') {
        i += 1;
    }

    let int_start = i;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = i - int_start;

    let mut frac_digits = 0;
    if i < b.len() && b[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        frac_digits = i - frac_start;
    }

    if int_digits == 0 && frac_digits == 0 {
        return false;
    }

    if i < b.len() && (b[i] == b'e' || b[i] == b'E') {
        i += 1;
        if i < b.len() && (b[i] == b'+' || b[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == b.len()
}

/// Tokenize an array value: split on single spaces, drop empty tokens, parse
/// each with [`parse_number`].
pub fn parse_number_array(value: &str) -> Vec<f64> {
    value
        .split(' ')
        .filter(|token| !token.is_empty())
        .map(parse_number)
        .collect()
}

// =============================================================================
// Field coercion
// =============================================================================

/// Low 32 bits of `value` truncated toward zero, as unsigned.
///
/// NaN and infinities map to `0`; `-1.0` maps to `0xFFFF_FFFF`.
#[inline]
pub fn to_u32_wrapping(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    // Exact: the truncated value is an integer and rem_euclid stays in [0, 2^32).
    value.trunc().rem_euclid(TWO_POW_32) as u32
}

/// Low 32 bits of `value` truncated toward zero, as two's-complement signed.
#[inline]
pub fn to_i32_wrapping(value: f64) -> i32 {
    to_u32_wrapping(value) as i32
}

/// Encoded feature index. Missing reads as NaN, hence `0`.
#[inline]
pub fn feature_index(value: Option<f64>) -> u32 {
    to_u32_wrapping(value.unwrap_or(f64::NAN))
}

/// Encoded child reference. Missing reads as NaN, hence `0`.
#[inline]
pub fn child_ref(value: Option<f64>) -> i32 {
    to_i32_wrapping(value.unwrap_or(f64::NAN))
}

/// Encoded float field. Missing reads as NaN.
#[inline]
pub fn float64(value: Option<f64>) -> f64 {
    value.unwrap_or(f64::NAN)
}

// =============================================================================
// Tests
// =============================================================================
