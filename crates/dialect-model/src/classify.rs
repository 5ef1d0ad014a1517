//! Compatibility classification via an ordered decision table.
//!
//! The table is evaluated top to bottom and the first matching row wins;
//! row order encodes conservatism (encryption trumps everything, LTspice
//! markers trump PSpice markers). New vendor/construct rules are new
//! rows, not edits to branching logic.

use std::path::Path;

use dialect_core::BackendId;

use crate::detect::{detect, guess_vendor, subcircuit_names};
use crate::error::Result;
use crate::flags::{Category, ModelFeatureFlags, Vendor};
use crate::metadata::ModelMetadata;

/// One row of the decision table.
struct Rule {
    matches: fn(&ModelFeatureFlags) -> bool,
    category: Category,
    backend: Option<BackendId>,
    score: f64,
    warning: Option<&'static str>,
}

/// The classification policy. Total: the final row always matches, so
/// every flag combination yields exactly one category.
const RULES: &[Rule] = &[
    Rule {
        matches: |f| f.encrypted,
        category: Category::Encrypted,
        backend: None,
        score: 0.0,
        warning: Some(
            "model appears to be encrypted/protected; exact simulation is \
             not possible and conversion will use defaults",
        ),
    },
    Rule {
        matches: |f| f.ltspice_functions,
        category: Category::LtspiceOnly,
        backend: Some(BackendId::SECONDARY),
        score: 0.3,
        warning: Some(
            "model uses LTspice-only behavioral functions; the secondary \
             solver runs it best-effort",
        ),
    },
    Rule {
        matches: |f| f.behavioral_devices || f.table_functions || f.limit_functions,
        category: Category::PspiceLike,
        backend: Some(BackendId::SECONDARY),
        score: 0.5,
        warning: None,
    },
    Rule {
        matches: |_| true,
        category: Category::StandardSpice,
        backend: Some(BackendId::PRIMARY),
        score: 1.0,
        warning: None,
    },
];

/// Map feature flags and a vendor hint to metadata.
///
/// Deterministic and total: identical flags always yield identical
/// metadata, and there is no ambiguous state.
pub fn classify(flags: ModelFeatureFlags, vendor: Vendor) -> ModelMetadata {
    let rule = RULES
        .iter()
        .find(|r| (r.matches)(&flags))
        .expect("decision table ends with a catch-all row");

    ModelMetadata {
        vendor,
        category: rule.category,
        recommended_backend: rule.backend,
        compatibility_score: rule.score,
        subcircuit_names: Vec::new(),
        flags,
        warnings: rule.warning.iter().map(|w| w.to_string()).collect(),
    }
}

/// Analyze raw model text: detect features, guess the vendor, extract
/// declared names, classify. Pure; no I/O.
pub fn analyze(text: &str) -> ModelMetadata {
    let flags = detect(text);
    let vendor = guess_vendor(text);
    let mut meta = classify(flags, vendor);
    meta.subcircuit_names = subcircuit_names(text);
    meta
}

/// Analyze a model file on disk.
pub fn analyze_file(path: impl AsRef<Path>) -> Result<ModelMetadata> {
    let text = std::fs::read(path.as_ref())?;
    // Vendor files are occasionally latin-1; lossy decoding keeps the
    // scan byte-tolerant, matching the binary-payload handling in detect.
    Ok(analyze(&String::from_utf8_lossy(&text)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(f: impl FnOnce(&mut ModelFeatureFlags)) -> ModelFeatureFlags {
        let mut flags = ModelFeatureFlags::default();
        f(&mut flags);
        flags
    }

    #[test]
    fn test_clean_flags_standard_spice() {
        let meta = classify(ModelFeatureFlags::default(), Vendor::Unknown);
        assert_eq!(meta.category, Category::StandardSpice);
        assert_eq!(meta.recommended_backend, Some(BackendId::Ngspice));
        assert_eq!(meta.compatibility_score, 1.0);
    }

    #[test]
    fn test_table_function_is_pspice_like() {
        let meta = classify(flags(|f| f.table_functions = true), Vendor::Unknown);
        assert_eq!(meta.category, Category::PspiceLike);
        assert_eq!(meta.recommended_backend, Some(BackendId::Xyce));
        assert_eq!(meta.compatibility_score, 0.5);
    }

    #[test]
    fn test_ltspice_function_wins_over_pspice() {
        let meta = classify(
            flags(|f| {
                f.table_functions = true;
                f.ltspice_functions = true;
            }),
            Vendor::Unknown,
        );
        assert_eq!(meta.category, Category::LtspiceOnly);
        assert_eq!(meta.compatibility_score, 0.3);
    }

    #[test]
    fn test_encrypted_wins_over_everything() {
        let meta = classify(
            flags(|f| {
                f.encrypted = true;
                f.behavioral_devices = true;
                f.table_functions = true;
                f.ltspice_functions = true;
            }),
            Vendor::Ti,
        );
        assert_eq!(meta.category, Category::Encrypted);
        assert_eq!(meta.recommended_backend, None);
        assert_eq!(meta.compatibility_score, 0.0);
        assert!(!meta.warnings.is_empty());
    }

    #[test]
    fn test_vendor_independent_of_category() {
        let meta = classify(ModelFeatureFlags::default(), Vendor::Adi);
        assert_eq!(meta.category, Category::StandardSpice);
        assert_eq!(meta.vendor, Vendor::Adi);
    }

    #[test]
    fn test_classify_is_pure() {
        let f = flags(|f| f.behavioral_devices = true);
        let a = classify(f.clone(), Vendor::Ti);
        let b = classify(f, Vendor::Ti);
        assert_eq!(a, b);
    }

    #[test]
    fn test_table_is_total_over_all_flag_combinations() {
        // Every combination of the five construct booleans lands in
        // exactly one category.
        for bits in 0u8..32 {
            let f = ModelFeatureFlags {
                behavioral_devices: bits & 1 != 0,
                table_functions: bits & 2 != 0,
                limit_functions: bits & 4 != 0,
                ltspice_functions: bits & 8 != 0,
                encrypted: bits & 16 != 0,
                ..Default::default()
            };
            let meta = classify(f, Vendor::Unknown);
            assert!(meta.compatibility_score >= 0.0 && meta.compatibility_score <= 1.0);
        }
    }

    #[test]
    fn test_analyze_pspice_subckt() {
        // Behavioral device and TABLE, no LTspice markers.
        let text = "\
* Analog Devices opamp macromodel
.SUBCKT OPX 1 2 3 4 5
A1 1 2 LIMITER
E1 3 0 TABLE (V(1,2)) = (-1,-10) (1,10)
.ENDS OPX
";
        let meta = analyze(text);
        assert_eq!(meta.category, Category::PspiceLike);
        assert_eq!(meta.recommended_backend, Some(BackendId::Xyce));
        assert_eq!(meta.vendor, Vendor::Adi);
        assert_eq!(meta.subcircuit_names, vec!["OPX"]);
    }
}
