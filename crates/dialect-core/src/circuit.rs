//! Circuit graph representation.
//!
//! A [`Circuit`] is a set of named nets plus an ordered component list.
//! Components bind every terminal to a declared net; nets are declared
//! implicitly on first use when a component is added. The routing engine
//! only ever reads circuits — conversion returns a new, rewritten circuit
//! and leaves the caller's instance untouched.

use indexmap::IndexMap;

use crate::error::{Error, Result};

/// A named electrical net. `"0"` is ground by SPICE convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Net {
    name: String,
}

impl Net {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_ground(&self) -> bool {
        self.name == "0"
    }
}

/// Component type tags from the supported primitive set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    /// R: resistor
    Resistor,
    /// C: capacitor
    Capacitor,
    /// L: inductor
    Inductor,
    /// V: independent voltage source
    VoltageSource,
    /// I: independent current source
    CurrentSource,
    /// E: voltage-controlled voltage source
    Vcvs,
    /// G: voltage-controlled current source
    Vccs,
    /// X: subcircuit instance
    Subcircuit,
}

impl ComponentKind {
    /// SPICE device prefix letter for this kind.
    pub fn prefix(&self) -> char {
        match self {
            ComponentKind::Resistor => 'R',
            ComponentKind::Capacitor => 'C',
            ComponentKind::Inductor => 'L',
            ComponentKind::VoltageSource => 'V',
            ComponentKind::CurrentSource => 'I',
            ComponentKind::Vcvs => 'E',
            ComponentKind::Vccs => 'G',
            ComponentKind::Subcircuit => 'X',
        }
    }

    /// Required terminal count, or `None` when variable (subcircuits).
    fn terminal_count(&self) -> Option<usize> {
        match self {
            ComponentKind::Resistor
            | ComponentKind::Capacitor
            | ComponentKind::Inductor
            | ComponentKind::VoltageSource
            | ComponentKind::CurrentSource => Some(2),
            ComponentKind::Vcvs | ComponentKind::Vccs => Some(4),
            ComponentKind::Subcircuit => None,
        }
    }
}

/// Value carried by a component.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentValue {
    /// Plain numeric value (ohms, farads, volts, siemens, ...).
    Numeric(f64),
    /// AC stimulus magnitude for a source, rendered as `AC <mag>`.
    AcMagnitude(f64),
    /// Reference to a model or subcircuit block by name.
    Model(String),
}

/// A circuit component: unique reference id, kind, ordered terminal-to-net
/// bindings, and a value or model reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    ref_id: String,
    kind: ComponentKind,
    terminals: Vec<String>,
    value: ComponentValue,
}

impl Component {
    /// Build a component from raw parts. Prefer the named constructors.
    pub fn new(
        ref_id: impl Into<String>,
        kind: ComponentKind,
        terminals: Vec<String>,
        value: ComponentValue,
    ) -> Self {
        Self {
            ref_id: ref_id.into(),
            kind,
            terminals,
            value,
        }
    }

    pub fn resistor(ref_id: impl Into<String>, n1: &str, n2: &str, ohms: f64) -> Self {
        Self::new(
            ref_id,
            ComponentKind::Resistor,
            vec![n1.into(), n2.into()],
            ComponentValue::Numeric(ohms),
        )
    }

    pub fn capacitor(ref_id: impl Into<String>, n1: &str, n2: &str, farads: f64) -> Self {
        Self::new(
            ref_id,
            ComponentKind::Capacitor,
            vec![n1.into(), n2.into()],
            ComponentValue::Numeric(farads),
        )
    }

    pub fn inductor(ref_id: impl Into<String>, n1: &str, n2: &str, henries: f64) -> Self {
        Self::new(
            ref_id,
            ComponentKind::Inductor,
            vec![n1.into(), n2.into()],
            ComponentValue::Numeric(henries),
        )
    }

    pub fn dc_voltage(ref_id: impl Into<String>, pos: &str, neg: &str, volts: f64) -> Self {
        Self::new(
            ref_id,
            ComponentKind::VoltageSource,
            vec![pos.into(), neg.into()],
            ComponentValue::Numeric(volts),
        )
    }

    /// AC stimulus source, e.g. `V1 Vin 0 AC 1`.
    pub fn ac_voltage(ref_id: impl Into<String>, pos: &str, neg: &str, mag: f64) -> Self {
        Self::new(
            ref_id,
            ComponentKind::VoltageSource,
            vec![pos.into(), neg.into()],
            ComponentValue::AcMagnitude(mag),
        )
    }

    pub fn current_source(ref_id: impl Into<String>, pos: &str, neg: &str, amps: f64) -> Self {
        Self::new(
            ref_id,
            ComponentKind::CurrentSource,
            vec![pos.into(), neg.into()],
            ComponentValue::Numeric(amps),
        )
    }

    /// Voltage-controlled voltage source: output pair, control pair, gain.
    pub fn vcvs(
        ref_id: impl Into<String>,
        out_p: &str,
        out_n: &str,
        ctrl_p: &str,
        ctrl_n: &str,
        gain: f64,
    ) -> Self {
        Self::new(
            ref_id,
            ComponentKind::Vcvs,
            vec![out_p.into(), out_n.into(), ctrl_p.into(), ctrl_n.into()],
            ComponentValue::Numeric(gain),
        )
    }

    /// Voltage-controlled current source: output pair, control pair,
    /// transconductance.
    pub fn vccs(
        ref_id: impl Into<String>,
        out_p: &str,
        out_n: &str,
        ctrl_p: &str,
        ctrl_n: &str,
        gm: f64,
    ) -> Self {
        Self::new(
            ref_id,
            ComponentKind::Vccs,
            vec![out_p.into(), out_n.into(), ctrl_p.into(), ctrl_n.into()],
            ComponentValue::Numeric(gm),
        )
    }

    /// Subcircuit instance referencing a model/subckt block by name.
    pub fn subcircuit(
        ref_id: impl Into<String>,
        terminals: &[&str],
        model_name: impl Into<String>,
    ) -> Self {
        Self::new(
            ref_id,
            ComponentKind::Subcircuit,
            terminals.iter().map(|s| s.to_string()).collect(),
            ComponentValue::Model(model_name.into()),
        )
    }

    pub fn ref_id(&self) -> &str {
        &self.ref_id
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn terminals(&self) -> &[String] {
        &self.terminals
    }

    pub fn value(&self) -> &ComponentValue {
        &self.value
    }

    /// Model name referenced by this component, if any.
    pub fn model_name(&self) -> Option<&str> {
        match &self.value {
            ComponentValue::Model(name) => Some(name),
            _ => None,
        }
    }
}

/// A circuit: named nets plus an ordered component sequence.
#[derive(Debug, Clone, Default)]
pub struct Circuit {
    name: String,
    nets: IndexMap<String, Net>,
    components: Vec<Component>,
    /// Raw SPICE blocks (subcircuit definitions) included with the circuit,
    /// e.g. a synthesized macromodel.
    model_blocks: Vec<String>,
}

impl Circuit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declare a net explicitly. Nets referenced by components are
    /// declared automatically.
    pub fn declare_net(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.nets
            .entry(name.clone())
            .or_insert_with(|| Net { name });
    }

    /// Add a component, declaring its nets on first use.
    ///
    /// Fails on duplicate reference ids and wrong terminal counts; every
    /// terminal of the added component ends up bound to a declared net.
    pub fn add(&mut self, component: Component) -> Result<()> {
        if self.components.iter().any(|c| c.ref_id == component.ref_id) {
            return Err(Error::DuplicateRef(component.ref_id.clone()));
        }
        if let Some(expected) = component.kind.terminal_count() {
            if component.terminals.len() != expected {
                return Err(Error::TerminalCount {
                    component: component.ref_id.clone(),
                    expected,
                    actual: component.terminals.len(),
                });
            }
        }
        for net in &component.terminals {
            self.declare_net(net.clone());
        }
        self.components.push(component);
        Ok(())
    }

    /// Attach a raw SPICE block (e.g. a macromodel subcircuit definition).
    pub fn add_model_block(&mut self, text: impl Into<String>) {
        self.model_blocks.push(text.into());
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn component(&self, ref_id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.ref_id == ref_id)
    }

    /// Iterate declared nets in insertion order.
    pub fn nets(&self) -> impl Iterator<Item = &Net> {
        self.nets.values()
    }

    pub fn has_net(&self, name: &str) -> bool {
        self.nets.contains_key(name)
    }

    pub fn model_blocks(&self) -> &[String] {
        &self.model_blocks
    }

    /// True if any component references `model_name`.
    pub fn references_model(&self, model_name: &str) -> bool {
        self.components
            .iter()
            .any(|c| c.model_name() == Some(model_name))
    }

    /// Return a copy of this circuit with every reference to any name in
    /// `old_names` replaced by `new_name`. Attached model blocks that
    /// declare a replaced name are dropped, so a substitute block does
    /// not coexist with the text it substitutes. Used by macromodel
    /// conversion; `self` is not modified.
    pub fn with_model_replaced(&self, old_names: &[String], new_name: &str) -> Circuit {
        let mut out = self.clone();
        for component in &mut out.components {
            if let ComponentValue::Model(name) = &mut component.value {
                if old_names.iter().any(|old| old.eq_ignore_ascii_case(name)) {
                    *name = new_name.to_string();
                }
            }
        }
        out.model_blocks
            .retain(|block| !block_declares_any(block, old_names));
        out
    }
}

/// True if the block text contains a `.SUBCKT <name>` header for any of
/// `names`.
fn block_declares_any(block: &str, names: &[String]) -> bool {
    block.lines().any(|line| {
        let mut tokens = line.split_whitespace();
        let Some(first) = tokens.next() else {
            return false;
        };
        if !first.eq_ignore_ascii_case(".subckt") {
            return false;
        }
        match tokens.next() {
            Some(declared) => names.iter().any(|n| n.eq_ignore_ascii_case(declared)),
            None => false,
        }
    })
}
