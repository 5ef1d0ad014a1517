//! Simulation-context banner.
//!
//! A multi-line summary of how a job was dispatched: which solver ran
//! it, whether the model was swapped for a synthesized macromodel, and
//! which backend the metadata originally asked for when routing fell
//! back. Logged once per dispatch so a simulation log always states
//! which solver produced the numbers that follow.

use dialect_core::BackendId;

const RULE: &str = "============================================================";

/// Render the context banner for one dispatch.
///
/// `fallback_from` names the backend the model metadata recommended
/// when that recommendation could not be honored directly.
pub fn context_banner(
    backend: BackendId,
    conversion_used: bool,
    fallback_from: Option<BackendId>,
) -> String {
    let mut lines = vec![
        RULE.to_string(),
        "Simulation Context".to_string(),
        RULE.to_string(),
        format!("Simulator: {backend}"),
    ];
    if let Some(origin) = fallback_from {
        lines.push(format!(
            "Backend fallback: {origin} -> {backend} (model converted)"
        ));
    }
    lines.push(format!(
        "Model conversion: {}",
        if conversion_used { "USED" } else { "NOT USED" }
    ));
    lines.push(format!(
        "Run mode: {}",
        if conversion_used {
            "converted_model"
        } else {
            "original_model"
        }
    ));
    lines.push(RULE.to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_direct_run() {
        let banner = context_banner(BackendId::Xyce, false, None);
        assert!(banner.contains("Simulator: xyce"));
        assert!(banner.contains("Model conversion: NOT USED"));
        assert!(banner.contains("Run mode: original_model"));
        assert!(!banner.contains("fallback"));
    }

    #[test]
    fn test_banner_conversion_fallback() {
        let banner = context_banner(BackendId::Ngspice, true, Some(BackendId::Xyce));
        assert!(banner.contains("Backend fallback: xyce -> ngspice (model converted)"));
        assert!(banner.contains("Run mode: converted_model"));
    }
}
