//! Line-oriented SPICE netlist rendering.
//!
//! Renders a [`Circuit`] into the device-list format the external solvers
//! accept: title line, attached model blocks, one line per component.
//! Analysis directives and `.end` are appended by the backend adapters,
//! which own their solver's command syntax.

use crate::circuit::{Circuit, ComponentKind, ComponentValue};
use crate::error::{Error, Result};
use crate::units::format_spice;

/// Render a circuit to SPICE device lines (no directives, no `.end`).
///
/// Output is deterministic: components in insertion order, model blocks
/// in attachment order.
pub fn render(circuit: &Circuit) -> Result<String> {
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("* {}", circuit.name()));

    for block in circuit.model_blocks() {
        lines.push(block.trim_end().to_string());
    }

    for component in circuit.components() {
        for net in component.terminals() {
            if !circuit.has_net(net) {
                return Err(Error::UnboundTerminal {
                    component: component.ref_id().to_string(),
                    net: net.clone(),
                });
            }
        }
        let terminals = component.terminals().join(" ");
        let value = match component.value() {
            ComponentValue::Numeric(v) => format_spice(*v),
            ComponentValue::AcMagnitude(mag) => format!("AC {}", format_spice(*mag)),
            ComponentValue::Model(name) => name.clone(),
        };
        // Subcircuit instances put the model name last; everything else is
        // "<ref> <nodes> <value>". Both happen to be the same line shape.
        debug_assert!(
            component.kind() != ComponentKind::Subcircuit
                || matches!(component.value(), ComponentValue::Model(_)),
            "subcircuit instance without model reference"
        );
        lines.push(format!("{} {} {}", component.ref_id(), terminals, value));
    }

    Ok(lines.join("\n") + "\n")
}

/// A simple non-inverting op-amp stage used by tests and the CLI demo:
///
/// ```text
/// Vin --[Rin]--> Vplus of X1
/// R1 from Vout to Vminus, R2 from Vminus to ground
/// ideal gain = 1 + R1/R2
/// ```
///
/// `model_name` is the op-amp subcircuit the X instance references.
pub fn non_inverting_stage(r1_ohms: f64, r2_ohms: f64, model_name: &str) -> Circuit {
    use crate::circuit::Component;

    let mut circuit = Circuit::new("Non-inverting opamp stage");
    // add() cannot fail here: refs are unique and terminal counts fixed.
    let _ = circuit.add(Component::ac_voltage("V1", "Vin", "0", 1.0));
    let _ = circuit.add(Component::resistor("RIN", "Vin", "Vplus", 10e3));
    let _ = circuit.add(Component::resistor("R1", "Vout", "Vminus", r1_ohms));
    let _ = circuit.add(Component::resistor("R2", "Vminus", "0", r2_ohms));
    let _ = circuit.add(Component::subcircuit(
        "X1",
        &["Vplus", "Vminus", "Vout", "VCC", "VEE"],
        model_name,
    ));
    circuit
}
