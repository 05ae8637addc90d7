//! Text formatting for values written to dataset CSV files.

/// Format a float in shortest round-trip form, keeping a `.0` on integral
/// values so that columns read back unambiguously as floats.
pub fn format_float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

/// Format a parameter value for use inside a file name: integral values
/// drop the fractional part (`10`, `1`), others keep it (`0.75`).
pub fn format_param(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v}")
    }
}

pub const fn format_flag(flag: bool) -> &'static str {
    if flag { "True" } else { "False" }
}

/// Parse a contact flag written by [`format_flag`] or by other tools.
pub fn parse_flag(s: &str) -> Option<bool> {
    match s.trim() {
        "True" | "true" | "1" | "1.0" => Some(true),
        "False" | "false" | "0" | "0.0" => Some(false),
        _ => None,
    }
}

/// Parse a field that holds an integer written as a float (`"3.0"`).
#[allow(clippy::cast_possible_truncation)]
pub fn parse_index(s: &str) -> Option<i64> {
    let v: f64 = s.trim().parse().ok()?;
    v.is_finite().then(|| v.trunc() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floats_keep_trailing_zero() {
        assert_eq!(format_float(3.0), "3.0");
        assert_eq!(format_float(-0.0), "-0.0");
        assert_eq!(format_float(0.045), "0.045");
        assert_eq!(format_float(1.5e-7), "0.00000015");
    }

    #[test]
    fn params_drop_trailing_zero() {
        assert_eq!(format_param(10.0), "10");
        assert_eq!(format_param(0.0), "0");
        assert_eq!(format_param(0.75), "0.75");
        assert_eq!(format_param(2.5), "2.5");
    }

    #[test]
    fn flags_roundtrip() {
        assert_eq!(parse_flag(format_flag(true)), Some(true));
        assert_eq!(parse_flag(format_flag(false)), Some(false));
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn index_parses_float_text() {
        assert_eq!(parse_index("3.0"), Some(3));
        assert_eq!(parse_index(" 12 "), Some(12));
        assert_eq!(parse_index("trajectory"), None);
        assert_eq!(parse_index("NaN"), None);
    }
}
