//! End-to-end classification of realistic vendor model texts.
//!
//! Each fixture mimics the shape of a real vendor library file: header
//! comment block, `.SUBCKT` with node list, body devices, `.ENDS`.

use dialect_core::BackendId;
use dialect_model::{analyze, Category, Vendor};

const TI_PSPICE_MODEL: &str = "\
* OPA2134 OPERATIONAL AMPLIFIER MACRO-MODEL
* (C) Texas Instruments Incorporated
* REV. A
.SUBCKT OPA2134 IN+ IN- OUT VCC VEE
* input stage
GIN 0 10 IN+ IN- 1m
R10 10 0 100k
EOUT 20 0 VALUE { LIMIT(V(10), -14, 14) }
ROUT 20 OUT 10
.ENDS OPA2134
";

const ADI_TABLE_MODEL: &str = "\
* AD8676 SPICE Macro-model
* Copyright Analog Devices Inc.
.SUBCKT AD8676 plus minus out vp vn
ECLAMP 7 0 TABLE { V(plus, minus) } = (-1, -12) (0, 0) (1, 12)
R1 7 out 50
.ENDS AD8676
";

const LTSPICE_MODEL: &str = "\
* LTspice-native op-amp wrapper
* ltspice demo library
.SUBCKT LT1001A 1 2 3 4 5
B1 3 0 V = ddt(V(1,2)) + white(1e-6)
A1 1 2 0 0 0 0 3 0 OTA G=1m
.ENDS LT1001A
";

const STANDARD_MODEL: &str = "\
* generic single-pole op-amp
.SUBCKT GENERIC_OP 1 2 3 4 5
EGAIN 6 0 1 2 2e5
RP 6 7 1k
CP 7 0 1.59u
EBUF 3 0 7 0 1
.ENDS GENERIC_OP
";

#[test]
fn test_ti_model_is_pspice_like() {
    let meta = analyze(TI_PSPICE_MODEL);
    assert_eq!(meta.vendor, Vendor::Ti);
    assert_eq!(meta.category, Category::PspiceLike);
    assert_eq!(meta.recommended_backend, Some(BackendId::Xyce));
    assert_eq!(meta.compatibility_score, 0.5);
    assert_eq!(meta.subcircuit_names, vec!["OPA2134"]);
    assert!(meta.flags.limit_functions);
}

#[test]
fn test_adi_table_model_is_pspice_like() {
    let meta = analyze(ADI_TABLE_MODEL);
    assert_eq!(meta.vendor, Vendor::Adi);
    assert_eq!(meta.category, Category::PspiceLike);
    assert_eq!(meta.recommended_backend, Some(BackendId::Xyce));
    assert!(meta.flags.table_functions);
    assert_eq!(meta.subcircuit_names, vec!["AD8676"]);
}

#[test]
fn test_ltspice_model_needs_conversion_or_xyce() {
    let meta = analyze(LTSPICE_MODEL);
    assert_eq!(meta.vendor, Vendor::Ltspice);
    assert_eq!(meta.category, Category::LtspiceOnly);
    assert_eq!(meta.recommended_backend, Some(BackendId::Xyce));
    assert_eq!(meta.compatibility_score, 0.3);
    assert!(meta.flags.behavioral_devices);
    assert!(meta.flags.ltspice_functions);
}

#[test]
fn test_standard_model_runs_anywhere() {
    let meta = analyze(STANDARD_MODEL);
    assert_eq!(meta.category, Category::StandardSpice);
    assert_eq!(meta.recommended_backend, Some(BackendId::Ngspice));
    assert_eq!(meta.compatibility_score, 1.0);
    assert!(meta.warnings.is_empty());
    assert!(!meta.flags.any_nonstandard());
}

#[test]
fn test_encryption_outranks_every_other_feature() {
    // Encrypted wins even when PSpice and LTspice features are present.
    let text = format!(".encrypt\n{TI_PSPICE_MODEL}{LTSPICE_MODEL}");
    let meta = analyze(&text);
    assert_eq!(meta.category, Category::Encrypted);
    assert_eq!(meta.recommended_backend, None);
    assert_eq!(meta.compatibility_score, 0.0);
    assert!(!meta.warnings.is_empty());
}

#[test]
fn test_binary_payload_treated_as_encrypted() {
    let mut bytes = String::from("* header\n");
    bytes.push('\u{0}');
    bytes.push_str("garbage");
    let meta = analyze(&bytes);
    assert_eq!(meta.category, Category::Encrypted);
}
