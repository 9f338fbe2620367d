//! Numeric notations used by the legacy file formats.
//!
//! Rust's `{:e}` omits the exponent sign and padding, while the Fortran and
//! Python readers downstream expect `1.5D+01` / `1.5e+01` shapes.

/// Scientific notation with `precision` fractional digits, an explicit
/// exponent sign and at least two exponent digits.
pub fn scientific(value: f64, precision: usize, marker: char) -> String {
    if let Some(special) = non_finite(value) {
        return special.to_string();
    }
    let raw = format!("{value:.precision$e}");
    let Some((mantissa, exponent)) = raw.split_once('e') else {
        return raw;
    };
    let exponent: i32 = exponent.parse().unwrap_or_default();
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}{marker}{sign}{:02}", exponent.unsigned_abs())
}

/// Fortran double with sixteen fractional digits, e.g. `1.2345678901234567D+01`.
pub fn fortran_d(value: f64) -> String {
    scientific(value, 16, 'D')
}

/// Fortran `E15.6` field, right-aligned.
pub fn fortran_e15_6(value: f64) -> String {
    format!("{:>15}", scientific(value, 6, 'E'))
}

/// Shortest round-trip representation in Python's `repr` style.
///
/// Decimal between `1e-4` and `1e16`, scientific with a two-digit signed
/// exponent outside, and always carrying a fractional part.
pub fn python_repr(value: f64) -> String {
    if let Some(special) = non_finite(value) {
        return special.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let raw = format!("{:e}", value.abs());
    let Some((mantissa, exponent)) = raw.split_once('e') else {
        return raw;
    };
    let exponent: i32 = exponent.parse().unwrap_or_default();
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();

    if !(-4..16).contains(&exponent) {
        let mantissa = if digits.len() > 1 {
            format!("{}.{}", &digits[..1], &digits[1..])
        } else {
            digits
        };
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        return format!("{sign}{mantissa}e{exp_sign}{:02}", exponent.unsigned_abs());
    }

    let point = exponent + 1;
    let n = digits.len() as i32;
    let body = if point <= 0 {
        format!("0.{}{}", "0".repeat((-point) as usize), digits)
    } else if point < n {
        let split = point as usize;
        format!("{}.{}", &digits[..split], &digits[split..])
    } else {
        format!("{}{}.0", digits, "0".repeat((point - n) as usize))
    };
    format!("{sign}{body}")
}

/// Parses a float written with either an `e` or a Fortran `d` exponent.
pub fn parse_float(token: &str) -> Option<f64> {
    let token = token.trim();
    let first = token.chars().next()?;
    if !(first.is_ascii_digit() || matches!(first, '+' | '-' | '.')) {
        return None;
    }
    token.replace(['D', 'd'], "e").parse().ok()
}

fn non_finite(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some("nan")
    } else if value == f64::INFINITY {
        Some("inf")
    } else if value == f64::NEG_INFINITY {
        Some("-inf")
    } else {
        None
    }
}
