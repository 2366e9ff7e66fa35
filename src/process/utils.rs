/// Trim whitespace + strip outer quotes if present.
pub fn clean_str(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].trim()
    } else {
        trimmed
    }
}

/// Parse a nullable 64-bit integer.
///
/// Accepts plain integers and integral float text ("4.0", "1e3"), which is
/// how an integer column with gaps looks after it has been through a float.
pub fn parse_i64(raw: &str) -> Option<i64> {
    let s = clean_str(raw);
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    let f = s.parse::<f64>().ok()?;
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Parse a flag into a tri-state boolean; `None` means unreadable.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match clean_str(raw).to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" | "t" | "yes" | "y" => Some(true),
        "0" | "0.0" | "false" | "f" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// Text form of a float: shortest round-trip digits, integral values keep
/// their trailing `.0`, exponents are signed and at least two digits wide
/// (`1e-05`, `1.5e+16`).
pub fn float_text(v: f64) -> String {
    let s = format!("{:?}", v);
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => s,
    }
}

/// Text form of a raw numeric reading. NaN and blank count as absent;
/// anything else that is present is kept, as float text when it parses.
pub fn numeric_reading(raw: &str) -> Option<String> {
    let s = clean_str(raw);
    match s.parse::<f64>() {
        Ok(v) if v.is_nan() => None,
        Ok(v) => Some(float_text(v)),
        Err(_) if s.is_empty() => None,
        Err(_) => Some(s.to_string()),
    }
}
