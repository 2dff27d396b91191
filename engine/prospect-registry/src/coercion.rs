//! Cell coercion rules.
//!
//! Hand-maintained consensus sheets contain blanks, stray text and mixed
//! formats, so none of these functions fail: every cell becomes a value, an
//! absent marker or an invalid marker.
//!
//! Two integer policies exist and are not interchangeable:
//! - [`coerce_leading_int`] reads a leading digit run ("12th" -> 12, "#4" -> invalid)
//! - [`coerce_digits_only`] drops every non-digit first ("#4" -> 4, "1.5" -> 15)

use crate::types::CellValue;

/// Outcome of coercing one cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coerced {
    /// A numeric value
    Value(f64),
    /// Null or empty cell
    Absent,
    /// Non-empty cell with no usable number
    Invalid,
}

impl Coerced {
    pub fn value(self) -> Option<f64> {
        match self {
            Coerced::Value(v) => Some(v),
            Coerced::Absent | Coerced::Invalid => None,
        }
    }

    /// The value as a pick, if it is valid inside `window`
    pub fn as_pick(self, window: PickWindow) -> Option<u32> {
        self.value().filter(|v| window.contains(*v)).map(|v| v as u32)
    }
}

/// Closed range `[1, max]` a draft pick must fall in to count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickWindow {
    pub max: u32,
}

impl PickWindow {
    /// Window used when validating picks for consensus statistics
    pub const STATS: PickWindow = PickWindow { max: 60 };

    /// Wider window used for histogram x-axis inclusion
    pub const HISTOGRAM: PickWindow = PickWindow { max: 108 };

    pub const fn new(max: u32) -> Self {
        Self { max }
    }

    /// True when `value` is an integer in `[1, max]`
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value.fract() == 0.0 && value >= 1.0 && value <= self.max as f64
    }
}

/// Coerce with leading-digit-sequence semantics.
///
/// Leading whitespace and one sign are accepted, trailing content after the
/// digits is ignored. Numbers pass through unchanged.
pub fn coerce_leading_int(cell: &CellValue) -> Coerced {
    match cell {
        CellValue::Number(n) => Coerced::Value(*n),
        CellValue::Missing => Coerced::Absent,
        CellValue::Text(text) => leading_int(text),
    }
}

/// Coerce after stripping every non-digit character. Numbers pass through unchanged.
pub fn coerce_digits_only(cell: &CellValue) -> Coerced {
    match cell {
        CellValue::Number(n) => Coerced::Value(*n),
        CellValue::Missing => Coerced::Absent,
        CellValue::Text(text) => {
            if text.trim().is_empty() {
                return Coerced::Absent;
            }
            let digits: String = text.chars().filter(char::is_ascii_digit).collect();
            digits.parse::<f64>().map(Coerced::Value).unwrap_or(Coerced::Invalid)
        }
    }
}

fn leading_int(text: &str) -> Coerced {
    let trimmed = text.trim_start();
    if trimmed.trim_end().is_empty() {
        return Coerced::Absent;
    }

    let (negative, rest) = match trimmed.as_bytes()[0] {
        b'-' => (true, &trimmed[1..]),
        b'+' => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return Coerced::Invalid;
    }

    match rest[..digits_len].parse::<f64>() {
        Ok(v) if negative => Coerced::Value(-v),
        Ok(v) => Coerced::Value(v),
        Err(_) => Coerced::Invalid,
    }
}

/// Parse the longest leading decimal number, like a lenient float reader.
///
/// `"12.5kg"` -> 12.5, `" -3e2x"` -> -300, `"abc"` -> `None`.
pub fn parse_float_prefix(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_digits = bytes[end..].iter().take_while(|b| b.is_ascii_digit()).count();
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = bytes[end + 1..].iter().take_while(|b| b.is_ascii_digit()).count();
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits = bytes[exp_end.min(bytes.len())..].iter().take_while(|b| b.is_ascii_digit()).count();
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// [`parse_float_prefix`] defaulting to 0
pub fn parse_float_or_zero(text: &str) -> f64 {
    parse_float_prefix(text).unwrap_or(0.0)
}

/// Convert a measurement string to inches.
///
/// Accepts `6'5"`, `6' 5.25"`, `6'`, `6-5` and bare inch counts such as `77`.
pub fn parse_measurement_inches(text: &str) -> Option<f64> {
    let s = text.trim().trim_end_matches('"').trim();
    if s.is_empty() {
        return None;
    }

    let split = s.split_once('\'').or_else(|| {
        if s.starts_with('-') {
            None
        } else {
            s.split_once('-')
        }
    });

    match split {
        Some((feet, inches)) => {
            let feet = parse_float_prefix(feet)?;
            let inches = inches.trim().trim_end_matches('"').trim();
            let inches = if inches.is_empty() { 0.0 } else { parse_float_prefix(inches)? };
            Some(feet * 12.0 + inches)
        }
        None => parse_float_prefix(s),
    }
}
