// Utility helpers for parsing and number formatting.
//
// Dataset cells and metric values both arrive as loosely formatted text;
// everything that turns such text into numbers (or numbers back into
// display text) lives here.
use num_format::{Locale, ToFormattedString};

/// Parse a CSV cell into `f64`, forgiving thousands separators and
/// surrounding whitespace. Anything with letters in it is rejected.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a non-negative integer cell. Accepts `3` and `3.0` (pandas writes
/// integer columns with missing values as floats).
pub fn parse_u32_safe(s: Option<&str>) -> Option<u32> {
    let v = parse_f64_safe(s)?;
    if v < 0.0 || v.fract() != 0.0 || v > u32::MAX as f64 {
        return None;
    }
    Some(v as u32)
}

/// Parse a boolean cell as written by pandas or by hand.
pub fn parse_bool_safe(s: Option<&str>) -> Option<bool> {
    match s?.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

/// Read a pre-formatted metric value (`$1,234.50`, `42.0%`, `17`) back
/// into a number. Malformed or empty values count as zero.
pub fn parse_metric_number(value: &str) -> f64 {
    let cleaned: String = value
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '%'))
        .collect();
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus `en` thousands separators, e.g. `1,234,567.89`.
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let mut res = group_digits(int_part);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    if neg && res.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{}", res)
    } else {
        res
    }
}

// Insert `en` separators into a digit string of any length. `f64` values
// run far past every integer type num-format can take.
fn group_digits(digits: &str) -> String {
    let sep = Locale::en.separator();
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * sep.len());
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(sep);
        }
        out.push(c);
    }
    out
}

/// `$1,234.56` style currency.
pub fn format_currency(n: f64, decimals: usize) -> String {
    let body = format_number(n, decimals);
    match body.strip_prefix('-') {
        Some(rest) => format!("-${}", rest),
        None => format!("${}", body),
    }
}

/// Area with the ASCII unit the report font can always render.
pub fn format_area(n: f64) -> String {
    format!("{} m2", format_number(n, 0))
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}
