//! Utility functions for turning Newick literals into values.

/// Parses the longest leading decimal number of `input` into an `f64`.
///
/// Leading whitespace is skipped and anything after the numeric prefix is
/// ignored, so `"0.25abc"` gives `0.25`. Accepts an optional sign, an integer
/// and/or fractional part, an optional exponent, and `Infinity`.
/// Returns [f64::NAN] if there is no numeric prefix at all.
///
/// # Examples
/// ```
/// # use taxatree::parser::utils::parse_float_prefix;
/// assert_eq!(parse_float_prefix("0.25"), 0.25);
/// assert_eq!(parse_float_prefix("1.5e-3[&rate=1]"), 1.5e-3);
/// assert_eq!(parse_float_prefix("7.e"), 7.0);
/// assert!(parse_float_prefix("abc").is_nan());
/// ```
pub fn parse_float_prefix(input: &str) -> f64 {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let len = bytes.len();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let negative = bytes.first() == Some(&b'-');

    if s[end..].starts_with("Infinity") {
        return if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    // Mantissa: digits [ '.' digits ] or '.' digits
    let int_start = end;
    while end < len && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut num_digits = end - int_start;

    if end < len && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < len && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        num_digits += frac_end - frac_start;
        if num_digits > 0 {
            end = frac_end;
        }
    }

    if num_digits == 0 {
        return f64::NAN;
    }

    // Exponent only counts if at least one digit follows
    if end < len && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < len && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < len && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().unwrap_or(f64::NAN)
}
