//! Engineering units and SI prefix handling.

/// Parse a SPICE-style value with optional SI suffix.
///
/// Supported suffixes:
/// - T (tera, 1e12)
/// - G (giga, 1e9)
/// - MEG (mega, 1e6)
/// - K (kilo, 1e3)
/// - M (milli, 1e-3)
/// - U (micro, 1e-6)
/// - N (nano, 1e-9)
/// - P (pico, 1e-12)
/// - F (femto, 1e-15)
pub fn parse_value(s: &str) -> Option<f64> {
    let s = s.trim().to_uppercase();

    // Plain number first
    if let Ok(v) = s.parse::<f64>() {
        return Some(v);
    }

    // Split at the end of the numeric part
    let num_end = s
        .find(|c: char| !c.is_ascii_digit() && c != '.' && c != '-' && c != '+' && c != 'E')
        .unwrap_or(s.len());

    if num_end == 0 {
        return None;
    }

    let (num_str, suffix) = s.split_at(num_end);
    let value: f64 = num_str.parse().ok()?;

    // SPICE ignores trailing unit letters after a recognized suffix
    // (e.g. "4.7uF", "10kOhm"), so match on the leading suffix only.
    let multiplier = if suffix.starts_with("MEG") {
        1e6
    } else if suffix.starts_with("MIL") {
        25.4e-6
    } else {
        match suffix.chars().next() {
            None => 1.0,
            Some('T') => 1e12,
            Some('G') => 1e9,
            Some('K') => 1e3,
            Some('M') => 1e-3,
            Some('U') => 1e-6,
            Some('N') => 1e-9,
            Some('P') => 1e-12,
            Some('F') => 1e-15,
            _ => return None,
        }
    };

    Some(value * multiplier)
}

/// Format a value for a SPICE netlist line.
///
/// Uses SI suffixes that every solver dialect accepts; mega must be
/// spelled `MEG` because a bare `M` means milli in SPICE.
pub fn format_spice(value: f64) -> String {
    let abs = value.abs();

    let (scaled, suffix) = if abs == 0.0 {
        (0.0, "")
    } else if abs >= 1e12 {
        (value / 1e12, "T")
    } else if abs >= 1e9 {
        (value / 1e9, "G")
    } else if abs >= 1e6 {
        (value / 1e6, "MEG")
    } else if abs >= 1e3 {
        (value / 1e3, "k")
    } else if abs >= 1.0 {
        (value, "")
    } else if abs >= 1e-3 {
        (value * 1e3, "m")
    } else if abs >= 1e-6 {
        (value * 1e6, "u")
    } else if abs >= 1e-9 {
        (value * 1e9, "n")
    } else if abs >= 1e-12 {
        (value * 1e12, "p")
    } else {
        // Below pico: fall back to exponent notation
        return format!("{value:e}");
    };

    format!("{}{}", trim_trailing_zeros(scaled), suffix)
}

fn trim_trailing_zeros(v: f64) -> String {
    let s = format!("{v:.6}");
    let s = s.trim_end_matches('0');
    s.trim_end_matches('.').to_string()
}
