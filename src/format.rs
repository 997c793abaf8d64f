//! Conversions between typed values and SCPI argument / reply text.
//!
//! Everything here is locale independent: `.` is always the decimal separator and
//! integers are never grouped.

use crate::error::{Error, Result};

/// Characters which separate the fields of a multi-value reply.
const FIELD_SEPARATORS: [char; 3] = [' ', '\t', ','];

/// Render a value as a SCPI numeric argument.
///
/// At most three fractional digits are emitted, with trailing zeros dropped. Halfway
/// cases are rounded away from zero at the third decimal, so `1.2345` becomes
/// `"1.235"` and `7.0` becomes `"7"`.
pub fn format_number(value: f64) -> Result<String> {
    if !value.is_finite() {
        return Err(Error::InvalidValue(value));
    }

    let scaled = value * 1000.0;
    let mut rounded = if scaled.is_finite() {
        scaled.round() / 1000.0
    } else {
        // Far beyond millesimal precision already.
        value
    };
    if rounded == 0.0 {
        // Never send "-0".
        rounded = 0.0;
    }

    let mut text = format!("{rounded:.3}");
    let kept = text.trim_end_matches('0').trim_end_matches('.').len();
    text.truncate(kept);
    Ok(text)
}

/// Parse a numeric reply such as `"12.500"`, `"-0.5"` or `"1.2E+1"`.
///
/// Anything that is not a finite decimal number is a [`Error::MalformedResponse`].
pub fn parse_number(text: &str) -> Result<f64> {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(Error::malformed(text)),
    }
}

/// Parse a plain base-10 integer reply, e.g. an operating mode code.
pub fn parse_integer(text: &str) -> Result<i32> {
    text.trim()
        .parse::<i32>()
        .map_err(|_| Error::malformed(text))
}

/// Interpret a boolean reply.
///
/// Firmware differs in how it reports state, so `1`, `ON` and `TRUE` are accepted in
/// any case and with surrounding whitespace. Everything else is `false`.
pub fn normalize_bool(text: &str) -> bool {
    matches!(
        text.trim().to_ascii_uppercase().as_str(),
        "1" | "ON" | "TRUE"
    )
}

/// Split a multi-value reply on any run of spaces, tabs and commas.
pub fn split_fields(text: &str) -> impl Iterator<Item = &str> {
    text.split(FIELD_SEPARATORS).filter(|field| !field.is_empty())
}
