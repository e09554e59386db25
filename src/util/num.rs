/// Largest integer magnitude exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_I64_INT: i64 = 9_007_199_254_740_991;

/// The outcome of parsing a numeric literal: the language distinguishes
/// integers from floats from the spelling of the lexeme alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedNumber {
    /// A literal without fractional part or exponent.
    Int(i64),
    /// A literal with a `.`, an exponent, or one too large for `i64`.
    Float(f64),
}

/// Parses a numeric literal lexeme into an integer or a float.
///
/// The grammar accepted here matches what the scanner produces: a decimal
/// literal with an optional fractional part and signed exponent, or a
/// hexadecimal literal prefixed by `0x`/`0X`. A decimal literal without a
/// fractional part or exponent yields an integer; one that overflows `i64`
/// falls back to the nearest float.
///
/// # Parameters
/// - `lexeme`: The raw literal text, exactly as it appeared in the source.
///
/// # Returns
/// - `Some(ParsedNumber)`: The classified value.
/// - `None`: The lexeme is not a valid numeric literal.
///
/// # Example
/// ```
/// use moonlet::util::num::{ParsedNumber, parse_number};
///
/// assert_eq!(parse_number("42"), Some(ParsedNumber::Int(42)));
/// assert_eq!(parse_number("0x1F"), Some(ParsedNumber::Int(31)));
/// assert_eq!(parse_number("2.5"), Some(ParsedNumber::Float(2.5)));
/// assert_eq!(parse_number("1e2"), Some(ParsedNumber::Float(100.0)));
/// assert_eq!(parse_number("banana"), None);
/// ```
#[must_use]
pub fn parse_number(lexeme: &str) -> Option<ParsedNumber> {
    if let Some(hex) = lexeme.strip_prefix("0x").or_else(|| lexeme.strip_prefix("0X")) {
        if hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        // Large hex literals wrap, matching the reference semantics of
        // keeping the low 64 bits.
        let mut value: i64 = 0;
        for c in hex.chars() {
            let digit = i64::from(c.to_digit(16)?);
            value = value.wrapping_mul(16).wrapping_add(digit);
        }
        return Some(ParsedNumber::Int(value));
    }

    // Only the literal grammar is accepted; `f64::from_str` extras such
    // as "inf" and "NaN" are not numeric literals.
    if lexeme.is_empty()
       || !lexeme.chars()
                 .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return None;
    }

    let is_float = lexeme.contains('.') || lexeme.contains('e') || lexeme.contains('E');
    if is_float {
        return lexeme.parse::<f64>().ok().map(ParsedNumber::Float);
    }

    match lexeme.parse::<i64>() {
        Ok(n) => Some(ParsedNumber::Int(n)),
        // Out-of-range decimal integers degrade to floats.
        Err(_) => lexeme.parse::<f64>().ok().map(ParsedNumber::Float),
    }
}

/// Renders a float the way the language spells it in output and in
/// concatenation: integral values keep a trailing `.0` so they stay
/// distinguishable from integers, non-finite values use the conventional
/// short names.
///
/// # Example
/// ```
/// use moonlet::util::num::float_to_text;
///
/// assert_eq!(float_to_text(1.0), "1.0");
/// assert_eq!(float_to_text(2.5), "2.5");
/// assert_eq!(float_to_text(f64::INFINITY), "inf");
/// ```
#[must_use]
pub fn float_to_text(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e17 {
        return format!("{value:.1}");
    }
    format!("{value}")
}

/// Converts an `f64` to `i64` when the value is finite, integral and in
/// range, which is the rule used to normalize float table keys.
///
/// # Example
/// ```
/// use moonlet::util::num::float_to_exact_int;
///
/// assert_eq!(float_to_exact_int(2.0), Some(2));
/// assert_eq!(float_to_exact_int(2.5), None);
/// assert_eq!(float_to_exact_int(f64::NAN), None);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn float_to_exact_int(value: f64) -> Option<i64> {
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }
    if value < i64::MIN as f64 || value > i64::MAX as f64 {
        return None;
    }
    Some(value as i64)
}

/// Converts an `i64` to `f64`.
///
/// Values beyond `MAX_SAFE_I64_INT` lose precision; mixed integer/float
/// arithmetic accepts that, matching the reference behavior.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub const fn int_to_float(value: i64) -> f64 {
    value as f64
}
