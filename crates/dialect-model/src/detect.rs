//! Feature detection: scan raw model text for non-standard constructs.
//!
//! Pure, line-oriented, case-insensitive scanning with no side effects.
//! The rules are deliberately conservative: false positives are fine and
//! get resolved downstream by the classifier; false negatives on the
//! canonical form of each construct family are not allowed.

use crate::flags::{ModelFeatureFlags, Vendor};

/// PSpice limiting / conditional functions.
const LIMIT_FUNCTIONS: &[&str] = &[
    "LIMIT", "ULIM", "LLIM", "UPLIM", "DNLIM", "IF", "THEN", "ELSE",
];

/// LTspice-only behavioral functions.
const LTSPICE_FUNCTIONS: &[&str] = &[
    "DDT", "IDT", "WHITE", "PINK", "ROUND", "CEIL", "FLOOR",
];

/// Vendor comment markers, in tie-break priority order.
const VENDOR_MARKERS: &[(Vendor, &[&str])] = &[
    (Vendor::Ti, &["texas instruments", "ti opamp"]),
    (Vendor::Adi, &["analog devices", "adi opamp"]),
    (Vendor::Ltspice, &["linear technology", "ltspice"]),
];

/// How many leading lines are searched for vendor markers.
const VENDOR_SCAN_LINES: usize = 200;

/// Scan model text and return its feature flags.
///
/// Never fails: a payload that cannot be tokenized at all (binary,
/// compiled, encrypted) yields flags with `encrypted` set.
pub fn detect(text: &str) -> ModelFeatureFlags {
    let mut flags = ModelFeatureFlags::default();

    if !is_tokenizable(text) {
        flags.encrypted = true;
        return flags;
    }

    for line in text.lines() {
        let stripped = line.trim();
        if stripped.is_empty() || stripped.starts_with('*') || stripped.starts_with(';') {
            continue;
        }
        let upper = stripped.to_uppercase();

        // PSpice A-devices: line starts with A<identifier> followed by
        // nodes/params.
        if let Some(device) = a_device_name(&upper) {
            flags.behavioral_devices = true;
            flags.primitives.insert(device.to_string());
        }

        if has_function_call(&upper, "TABLE") {
            flags.table_functions = true;
            flags.primitives.insert("TABLE".to_string());
        }

        for func in LIMIT_FUNCTIONS {
            if has_function_call(&upper, func) {
                flags.limit_functions = true;
                flags.primitives.insert((*func).to_string());
            }
        }

        for func in LTSPICE_FUNCTIONS {
            if has_function_call(&upper, func) {
                flags.ltspice_functions = true;
                flags.primitives.insert((*func).to_string());
            }
        }

        if upper.starts_with(".ENCRYPT") || upper.starts_with(".PROTECT") || upper.contains("ENCRYPTED")
        {
            flags.encrypted = true;
        }
    }

    flags.vendor_comment = guess_vendor(text) != Vendor::Unknown;
    flags
}

/// Guess the vendor from leading comment lines. Purely heuristic; ties
/// resolve by the fixed marker priority (TI > ADI > LTspice).
pub fn guess_vendor(text: &str) -> Vendor {
    let window: String = text
        .lines()
        .take(VENDOR_SCAN_LINES)
        .collect::<Vec<_>>()
        .join("\n")
        .to_lowercase();

    for (vendor, markers) in VENDOR_MARKERS {
        if markers.iter().any(|m| window.contains(m)) {
            return *vendor;
        }
    }
    Vendor::Unknown
}

/// Extract declared block names: `.SUBCKT` names first (file order), then
/// `.MODEL` names that are not duplicates.
pub fn subcircuit_names(text: &str) -> Vec<String> {
    let mut subckt_names: Vec<String> = Vec::new();
    let mut model_names: Vec<String> = Vec::new();

    for line in text.lines() {
        let stripped = line.trim();
        let upper = stripped.to_uppercase();
        let target = if upper.starts_with(".SUBCKT") {
            &mut subckt_names
        } else if upper.starts_with(".MODEL") {
            &mut model_names
        } else {
            continue;
        };
        if let Some(name) = stripped.split_whitespace().nth(1) {
            let name: String = name
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
                .collect();
            if !name.is_empty() && !target.contains(&name) {
                target.push(name);
            }
        }
    }

    model_names.retain(|n| !subckt_names.contains(n));
    subckt_names.extend(model_names);
    subckt_names
}

/// A text is tokenizable when it is not a binary payload: no NUL bytes
/// and mostly printable ASCII.
fn is_tokenizable(text: &str) -> bool {
    if text.is_empty() {
        return true;
    }
    let mut opaque = 0usize;
    for b in text.bytes() {
        match b {
            0 => return false,
            b'\t' | b'\n' | b'\r' | 0x20..=0x7e => {}
            _ => opaque += 1,
        }
    }
    // Vendor files are ASCII apart from the odd stray symbol; a payload
    // that is >10% opaque bytes is compiled/encrypted data.
    opaque * 10 <= text.len()
}

/// First token of an A-device line (`A1`, `ABUF2`, ...), if this is one.
fn a_device_name(upper_line: &str) -> Option<&str> {
    let mut tokens = upper_line.split_whitespace();
    let first = tokens.next()?;
    // Need at least nodes after the device name.
    tokens.next()?;
    let mut chars = first.chars();
    if chars.next() != Some('A') {
        return None;
    }
    let rest = chars.as_str();
    if rest.is_empty() || !rest.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    Some(first)
}

/// True if `keyword` appears in the (uppercased) line as a function call:
/// preceded by a non-identifier character and followed by `(` after
/// optional whitespace.
fn has_function_call(upper_line: &str, keyword: &str) -> bool {
    let bytes = upper_line.as_bytes();
    let mut from = 0;
    while let Some(pos) = upper_line[from..].find(keyword) {
        let start = from + pos;
        let end = start + keyword.len();

        let bounded_before = start == 0 || {
            let prev = bytes[start - 1] as char;
            !prev.is_ascii_alphanumeric() && prev != '_'
        };
        // PSpice behavioral expressions brace the argument
        // (`TABLE {V(1,2)} = ...`), so `{` counts as a call too.
        let rest = upper_line[end..].trim_start();
        let called = rest.starts_with('(') || rest.starts_with('{');

        if bounded_before && called {
            return true;
        }
        from = end;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_model_has_no_flags() {
        let text = "* ordinary divider\n.SUBCKT DIV 1 2\nR1 1 2 1k\nC1 2 0 1n\n.ENDS\n";
        let flags = detect(text);
        assert!(!flags.any_nonstandard());
        assert!(flags.primitives.is_empty());
    }

    #[test]
    fn test_a_device_detected() {
        let flags = detect(".SUBCKT OPX 1 2 3\nA1 1 2 LIMITER_BLOCK\n.ENDS\n");
        assert!(flags.behavioral_devices);
        assert!(flags.primitives.contains("A1"));
    }

    #[test]
    fn test_a_device_needs_following_tokens() {
        // A lone "A1" token is not a device line.
        let flags = detect("A1\n");
        assert!(!flags.behavioral_devices);
    }

    #[test]
    fn test_table_function_detected() {
        let flags = detect("E1 3 0 TABLE (V(1,2)) = (-1, -10) (1, 10)\n");
        assert!(flags.table_functions);
        assert!(flags.primitives.contains("TABLE"));
    }

    #[test]
    fn test_table_with_space_before_paren() {
        assert!(detect("G1 1 0 TABLE ( V(3) ) = (0,0) (1,1)\n").table_functions);
    }

    #[test]
    fn test_table_with_braced_expression() {
        assert!(detect("E1 3 0 TABLE { V(1,2) } = (-1, -10) (1, 10)\n").table_functions);
    }

    #[test]
    fn test_limit_function_detected() {
        let flags = detect("B1 out 0 V=LIMIT(V(in), -5, 5)\n");
        assert!(flags.limit_functions);
        assert!(flags.primitives.contains("LIMIT"));
    }

    #[test]
    fn test_ltspice_function_detected() {
        let flags = detect("B1 out 0 V=ddt(V(in))\n");
        assert!(flags.ltspice_functions);
        assert!(flags.primitives.contains("DDT"));
    }

    #[test]
    fn test_keyword_inside_identifier_ignored() {
        // "SUBTABLE" and "rounding" must not trip the detectors.
        let flags = detect("R1 1 2 1k ; SUBTABLE(ref)\nR2 2 0 1k\n");
        assert!(!flags.table_functions);
        let flags = detect("Rrounding 1 0 1k\n");
        assert!(!flags.ltspice_functions);
    }

    #[test]
    fn test_encrypt_statement_detected() {
        assert!(detect(".PROTECT\nsecret stuff\n.UNPROTECT\n").encrypted);
        assert!(detect(".encrypt\n").encrypted);
    }

    #[test]
    fn test_binary_payload_sets_encrypted() {
        let mut text = String::from("$&!HSPICE_ENC\n");
        text.push_str(&"\u{00c4}\u{00ff}\u{00fe}".repeat(64));
        let flags = detect(&text);
        assert!(flags.encrypted);
    }

    #[test]
    fn test_comment_lines_skipped_for_constructs() {
        // Construct tokens inside comments do not count.
        let flags = detect("* this model once used TABLE(x) internally\nR1 1 0 1k\n");
        assert!(!flags.table_functions);
    }

    #[test]
    fn test_vendor_ti() {
        let v = guess_vendor("* (C) Texas Instruments 2019\n.SUBCKT OPA333 1 2 3\n");
        assert_eq!(v, Vendor::Ti);
    }

    #[test]
    fn test_vendor_priority_order() {
        // Both markers present: TI wins by fixed priority.
        let text = "* Texas Instruments\n* converted from an LTspice deck\n";
        assert_eq!(guess_vendor(text), Vendor::Ti);
    }

    #[test]
    fn test_vendor_only_in_leading_window() {
        let mut text = String::new();
        for _ in 0..250 {
            text.push_str("R1 1 0 1k\n");
        }
        text.push_str("* Analog Devices\n");
        assert_eq!(guess_vendor(&text), Vendor::Unknown);
    }

    #[test]
    fn test_subckt_names_before_model_names() {
        let text = "\
.MODEL NMOS_MODEL NMOS (VTO=0.5)
.SUBCKT OP284 1 2 3 4
.ENDS
.subckt TL072 IN+ IN- V+ V-
.ends
.model PMOS_MODEL PMOS
";
        assert_eq!(
            subcircuit_names(text),
            vec!["OP284", "TL072", "NMOS_MODEL", "PMOS_MODEL"]
        );
    }

    #[test]
    fn test_subckt_names_deduplicated() {
        let text = ".SUBCKT OPX 1 2\n.ENDS\n.SUBCKT OPX 1 2\n.ENDS\n.MODEL OPX D\n";
        assert_eq!(subcircuit_names(text), vec!["OPX"]);
    }
}
