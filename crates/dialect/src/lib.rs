//! # Dialect
//!
//! SPICE model compatibility analysis, macromodel conversion and solver
//! backend routing.
//!
//! Vendor op-amp models ship in several SPICE dialects. Dialect
//! classifies a model's dialect from its text, routes simulations to a
//! solver that accepts it (ngspice or Xyce), and, when no compatible
//! solver is registered, swaps the model for a synthesized single-pole
//! macromodel that any solver accepts.
//!
//! ## Quick start
//!
//! ```rust
//! use dialect::prelude::*;
//!
//! let meta = dialect::analyze(
//!     ".SUBCKT OPX 1 2 3\nEGAIN 3 0 1 2 2e5\n.ENDS OPX\n",
//! );
//! assert_eq!(meta.category, Category::StandardSpice);
//! assert_eq!(meta.recommended_backend, Some(BackendId::Ngspice));
//! ```
//!
//! ## Running simulations
//!
//! ```rust,ignore
//! use dialect::prelude::*;
//!
//! let mut manager = SimulatorManager::new();
//! manager.register(Box::new(NgspiceBackend::default()));
//!
//! let circuit = dialect::netlist::non_inverting_stage(90e3, 10e3, "OP284");
//! let params = AcGainParams { freq_hz: 1e3, output_net: "Vout".into() };
//! let gain = manager.run_ac_gain(&circuit, &params, Some(&model_text))?;
//! println!("{:.2} dB", gain.magnitude_db);
//! ```

pub use dialect_backend as backend;
pub use dialect_convert as convert;
pub use dialect_core as core;
pub use dialect_model as model;
pub use dialect_router as router;

pub use dialect_core::netlist;

pub use dialect_core::{
    AcGainParams, AcSweepParams, AnalysisResult, BackendId, Circuit, Component, ComponentKind,
    ComponentValue, FrequencyRange, GainResult, NoiseParams, NoisePoint, NoiseResult, SweepPoint,
    SweepResult,
};

pub use dialect_model::{
    analyze, analyze_file, Category, ModelCache, ModelFeatureFlags, ModelMetadata, Vendor,
};

pub use dialect_convert::{ConvertedModelBlock, MacromodelDefaults};

pub use dialect_backend::{BackendConfig, NgspiceBackend, SpiceBackend, XyceBackend};

pub use dialect_router::{RoutingDecision, SimulatorManager};

/// Everything most callers need.
pub mod prelude {
    pub use dialect_backend::{BackendConfig, NgspiceBackend, SpiceBackend, XyceBackend};
    pub use dialect_convert::MacromodelDefaults;
    pub use dialect_core::{
        AcGainParams, AcSweepParams, BackendId, Circuit, Component, FrequencyRange,
    };
    pub use dialect_model::{analyze, analyze_file, Category, ModelMetadata, Vendor};
    pub use dialect_router::{RoutingDecision, SimulatorManager};
}
