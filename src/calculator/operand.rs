//! Operand parsing
//!
//! Query values are parsed leniently: leading whitespace is skipped and the
//! longest decimal-literal prefix is used, so `"3abc"` reads as `3`.
//! Anything without a numeric prefix, or that is not finite, is rejected.

use super::error::CalcError;

/// Parse one raw query value into a finite operand.
pub fn parse_operand(raw: Option<&str>) -> Result<f64, CalcError> {
    let text = raw.ok_or(CalcError::InvalidInput)?.trim_start();
    let literal = numeric_prefix(text).ok_or(CalcError::InvalidInput)?;

    let value: f64 = literal.parse().map_err(|_| CalcError::InvalidInput)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::InvalidInput)
    }
}

/// Longest prefix matching `[+-]?(digits[.digits]|.digits)([eE][+-]?digits)?`
fn numeric_prefix(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        // "5." is fine, a lone "." is not
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    Some(&text[..end])
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
