//! Macromodel synthesis.
//!
//! Converts an incompatible vendor device model into a simplified,
//! solver-safe single-pole op-amp macromodel built from primitive devices
//! only:
//!
//! ```text
//! .SUBCKT <name> VPLUS VMINUS VOUT VCC VEE
//! EGAIN NINT 0 VPLUS VMINUS <A0>
//! RBUF  NINT VOUT 1
//! RPOLE VOUT 0 1k
//! CPOLE VOUT 0 <1/(2*pi*R*fp)>
//! .ENDS <name>
//! ```
//!
//! The two preserved characteristic parameters are the open-loop gain A0
//! and the gain-bandwidth product GBW; the dominant pole sits at
//! `fp = GBW / A0`. Dynamic effects (slew-rate limiting, output clipping)
//! are dropped. Suitable for small-signal AC gain, bandwidth estimation
//! and rough noise analysis only.

mod presets;

use std::f64::consts::PI;

use dialect_core::units::{format_spice, parse_value};
use dialect_core::Circuit;
use dialect_model::{Category, ModelMetadata};
use serde::{Deserialize, Serialize};

pub use presets::part_preset;

/// Fallback macromodel parameters used when nothing can be extracted
/// from the vendor text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacromodelDefaults {
    pub a0: f64,
    pub gbw_hz: f64,
}

impl Default for MacromodelDefaults {
    fn default() -> Self {
        Self {
            a0: 2e5,
            gbw_hz: 1e6,
        }
    }
}

/// A synthesized solver-safe subcircuit and its characteristic
/// parameters. Invariant: `gbw_hz == a0 * pole_hz` within numeric
/// tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertedModelBlock {
    pub subckt_name: String,
    pub spice_text: String,
    pub a0: f64,
    pub gbw_hz: f64,
    pub pole_hz: f64,
}

/// Result of a conversion: the synthesized block (absent when the model
/// was already solver-safe), the circuit to simulate, and non-fatal
/// warnings. The caller's circuit is never modified.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub block: Option<ConvertedModelBlock>,
    pub circuit: Circuit,
    pub warnings: Vec<String>,
}

impl Conversion {
    pub fn converted(&self) -> bool {
        self.block.is_some()
    }
}

/// Convert an incompatible model into a solver-safe macromodel and
/// rewrite the circuit to reference it.
///
/// For `StandardSpice` metadata this is the identity: the circuit comes
/// back unchanged with no block, which makes conversion idempotent —
/// a synthesized block re-analyzes as standard SPICE.
///
/// Synthesis never fails. When A0/GBW cannot be determined the
/// configured defaults are used and a warning is attached.
pub fn convert(
    meta: &ModelMetadata,
    model_text: &str,
    circuit: &Circuit,
    defaults: &MacromodelDefaults,
) -> Conversion {
    if meta.category == Category::StandardSpice {
        return Conversion {
            block: None,
            circuit: circuit.clone(),
            warnings: Vec::new(),
        };
    }

    let mut warnings = meta.warnings.clone();

    let base_name = meta
        .subcircuit_names
        .first()
        .cloned()
        .unwrap_or_else(|| "GENERIC_OPAMP".to_string());

    let (a0, gbw_hz) = extract_parameters(model_text, &base_name, defaults, &mut warnings);
    let block = synthesize(&base_name, meta, a0, gbw_hz);

    let mut rewritten = circuit.with_model_replaced(&meta.subcircuit_names, &block.subckt_name);
    // Models without declared names have nothing to rewrite but still get
    // the block attached for the caller to wire up.
    if meta.subcircuit_names.is_empty() {
        warnings.push(
            "model declares no subcircuit names; circuit references were left untouched"
                .to_string(),
        );
    }
    rewritten.add_model_block(block.spice_text.clone());

    Conversion {
        block: Some(block),
        circuit: rewritten,
        warnings,
    }
}

/// Determine (A0, GBW): declared parameters in the text, then the part
/// preset table, then configured defaults (with a warning).
fn extract_parameters(
    model_text: &str,
    part_name: &str,
    defaults: &MacromodelDefaults,
    warnings: &mut Vec<String>,
) -> (f64, f64) {
    let declared_a0 = find_named_parameter(model_text, &["AOL", "A0"]);
    let declared_gbw = find_named_parameter(model_text, &["GBW", "GBWP"]);

    if let (Some(a0), Some(gbw)) = (declared_a0, declared_gbw) {
        if a0 > 0.0 && gbw > 0.0 {
            return (a0, gbw);
        }
    }

    if let Some((a0, gbw)) = part_preset(part_name) {
        let a0 = declared_a0.filter(|v| *v > 0.0).unwrap_or(a0);
        let gbw = declared_gbw.filter(|v| *v > 0.0).unwrap_or(gbw);
        return (a0, gbw);
    }

    let a0 = declared_a0.filter(|v| *v > 0.0).unwrap_or(defaults.a0);
    let gbw = declared_gbw.filter(|v| *v > 0.0).unwrap_or(defaults.gbw_hz);
    if declared_a0.is_none() || declared_gbw.is_none() {
        warnings.push(format!(
            "could not determine A0/GBW for {part_name}; using defaults \
             A0={:.0}, GBW={:.0} Hz",
            defaults.a0, defaults.gbw_hz
        ));
    }
    (a0, gbw)
}

/// Find `NAME=<value>` (or `NAME = <value>`) in the text, including in
/// leading comment annotations. Case-insensitive; first hit wins.
fn find_named_parameter(text: &str, names: &[&str]) -> Option<f64> {
    for line in text.lines() {
        let upper = line.to_uppercase();
        for name in names {
            let mut from = 0;
            while let Some(pos) = upper[from..].find(name) {
                let start = from + pos;
                let end = start + name.len();
                from = end;

                let bounded = start == 0 || {
                    let prev = upper.as_bytes()[start - 1] as char;
                    !prev.is_ascii_alphanumeric() && prev != '_'
                };
                if !bounded {
                    continue;
                }
                let rest = upper[end..].trim_start();
                let Some(rest) = rest.strip_prefix('=') else {
                    continue;
                };
                let token: String = rest
                    .trim_start()
                    .chars()
                    .take_while(|c| !c.is_whitespace() && *c != ')' && *c != ',')
                    .collect();
                if let Some(v) = parse_value(&token) {
                    return Some(v);
                }
            }
        }
    }
    None
}

/// Emit the single-pole subcircuit text.
fn synthesize(base_name: &str, meta: &ModelMetadata, a0: f64, gbw_hz: f64) -> ConvertedModelBlock {
    let subckt_name = format!("{}_SIMPLE", base_name.to_uppercase());
    let pole_hz = gbw_hz / a0;

    // R = 1k fixes the pole capacitor at C = 1/(2*pi*R*fp).
    let r_pole = 1e3;
    let c_pole = 1.0 / (2.0 * PI * r_pole * pole_hz);

    let spice_text = format!(
        "\
* Auto-generated simplified macromodel for {base_name}
* Original vendor: {vendor}
* Single-pole approximation: A0={a0_fmt}, GBW={gbw_fmt}Hz, fp={fp_fmt}Hz
* Valid for small-signal AC gain, bandwidth and rough noise estimates;
* slew rate and output clipping are not modeled.
.SUBCKT {subckt_name} VPLUS VMINUS VOUT VCC VEE
EGAIN NINT 0 VPLUS VMINUS {a0_fmt}
RBUF NINT VOUT 1
RPOLE VOUT 0 {r_fmt}
CPOLE VOUT 0 {c_fmt}
.ENDS {subckt_name}
",
        vendor = meta.vendor,
        a0_fmt = format_spice(a0),
        gbw_fmt = format_spice(gbw_hz),
        fp_fmt = format_spice(pole_hz),
        r_fmt = format_spice(r_pole),
        c_fmt = format_spice(c_pole),
    );

    ConvertedModelBlock {
        subckt_name,
        spice_text,
        a0,
        gbw_hz,
        pole_hz,
    }
}
