//! Backend selection and dispatch.
//!
//! [`SimulatorManager`] owns the registered solver adapters, the model
//! metadata cache and the conversion defaults. It is an explicit
//! context object: callers construct one at startup, register adapters
//! once, and share it (`&self` everywhere, registry read-only after
//! setup). Routing never sends a model to a solver its classification
//! marked incompatible; when the recommended solver is missing, the
//! model is first converted to a solver-safe macromodel and dispatched
//! to the primary backend.

use std::collections::HashMap;

use dialect_backend::SpiceBackend;
use dialect_convert::{convert, MacromodelDefaults};
use dialect_core::{
    netlist, AcGainParams, AcSweepParams, BackendId, Circuit, GainResult, NoiseParams,
    NoiseResult, SweepResult,
};
use dialect_model::{ModelCache, ModelMetadata};
use tracing::{info, warn};

use crate::context::context_banner;
use crate::error::Result;

/// How a job reaches a solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingDecision {
    /// The recommended backend is registered; run the model as-is.
    Direct(BackendId),
    /// No registered backend accepts the model directly; synthesize a
    /// macromodel and run it on `backend`. `requested` is the backend
    /// the metadata asked for, kept for the context banner.
    ConvertThenRoute {
        backend: BackendId,
        requested: Option<BackendId>,
    },
}

pub struct SimulatorManager {
    backends: HashMap<BackendId, Box<dyn SpiceBackend>>,
    cache: ModelCache,
    defaults: MacromodelDefaults,
}

impl SimulatorManager {
    pub fn new() -> Self {
        Self::with_defaults(MacromodelDefaults::default())
    }

    pub fn with_defaults(defaults: MacromodelDefaults) -> Self {
        Self {
            backends: HashMap::new(),
            cache: ModelCache::new(),
            defaults,
        }
    }

    pub fn register(&mut self, backend: Box<dyn SpiceBackend>) {
        self.backends.insert(backend.id(), backend);
    }

    pub fn backend(&self, id: BackendId) -> Option<&dyn SpiceBackend> {
        self.backends.get(&id).map(Box::as_ref)
    }

    pub fn cache(&self) -> &ModelCache {
        &self.cache
    }

    /// Decide how `meta`'s model reaches a solver.
    ///
    /// The recommended backend wins when registered. Otherwise, models
    /// whose category permits conversion fall back to a synthesized
    /// macromodel on the primary backend. A model is never dispatched
    /// as-is to a backend other than its recommendation.
    pub fn route(&self, meta: &ModelMetadata) -> Result<RoutingDecision> {
        if let Some(id) = meta.recommended_backend {
            if self.backends.contains_key(&id) {
                return Ok(RoutingDecision::Direct(id));
            }
        }
        if meta.category.permits_conversion() && self.backends.contains_key(&BackendId::PRIMARY) {
            return Ok(RoutingDecision::ConvertThenRoute {
                backend: BackendId::PRIMARY,
                requested: meta.recommended_backend,
            });
        }
        let wanted = meta.recommended_backend.unwrap_or(BackendId::PRIMARY);
        Err(unregistered(wanted))
    }

    pub fn run_ac_gain(
        &self,
        circuit: &Circuit,
        params: &AcGainParams,
        model_text: Option<&str>,
    ) -> Result<GainResult> {
        let (backend, deck) = self.prepare(circuit, model_text)?;
        Ok(backend.run_ac_gain(&deck, params)?)
    }

    pub fn run_ac_sweep(
        &self,
        circuit: &Circuit,
        params: &AcSweepParams,
        model_text: Option<&str>,
    ) -> Result<SweepResult> {
        let (backend, deck) = self.prepare(circuit, model_text)?;
        Ok(backend.run_ac_sweep(&deck, params)?)
    }

    pub fn run_noise_sweep(
        &self,
        circuit: &Circuit,
        params: &NoiseParams,
        model_text: Option<&str>,
    ) -> Result<NoiseResult> {
        let (backend, deck) = self.prepare(circuit, model_text)?;
        Ok(backend.run_noise_sweep(&deck, params)?)
    }

    /// Analyze, route, convert if required, and render the deck.
    /// Everything that can fail without a solver fails here, before any
    /// child process is spawned.
    fn prepare(
        &self,
        circuit: &Circuit,
        model_text: Option<&str>,
    ) -> Result<(&dyn SpiceBackend, String)> {
        let (id, prepared, converted, requested) = match model_text {
            // No model involved: plain primitive circuits run on the
            // primary backend.
            None => (BackendId::PRIMARY, circuit.clone(), false, None),
            Some(text) => {
                let meta = self.cache.get_or_analyze(text);
                match self.route(&meta)? {
                    RoutingDecision::Direct(id) => (id, circuit.clone(), false, None),
                    RoutingDecision::ConvertThenRoute { backend, requested } => {
                        let conversion = convert(&meta, text, circuit, &self.defaults);
                        for warning in &conversion.warnings {
                            warn!(%warning, "model conversion");
                        }
                        warn!(
                            category = %meta.category,
                            backend = %backend,
                            "incompatible model replaced with synthesized macromodel"
                        );
                        (backend, conversion.circuit, true, requested)
                    }
                }
            }
        };

        let backend = self.backend(id).ok_or_else(|| unregistered(id))?;
        info!("\n{}", context_banner(id, converted, requested));
        let deck = netlist::render(&prepared)?;
        Ok((backend, deck))
    }
}

impl Default for SimulatorManager {
    fn default() -> Self {
        Self::new()
    }
}

fn unregistered(id: BackendId) -> crate::error::Error {
    dialect_backend::Error::BackendUnavailable {
        backend: id.as_str().to_string(),
        reason: "no adapter registered".to_string(),
    }
    .into()
}
