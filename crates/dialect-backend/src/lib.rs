//! Backend adapters wrapping external SPICE solver processes.
//!
//! Each adapter implements [`SpiceBackend`]: it translates the uniform
//! analysis requests into its solver's own input syntax, runs one
//! blocking solver invocation per call inside an isolated temporary
//! working directory, and parses the solver's output back into the
//! uniform result types from `dialect-core`.

pub mod config;
pub mod error;
pub mod ngspice;
mod runner;
pub mod xyce;

use dialect_core::{
    AcGainParams, AcSweepParams, BackendId, GainResult, NoiseParams, NoiseResult, SweepResult,
};

pub use config::BackendConfig;
pub use error::{Error, Result};
pub use ngspice::NgspiceBackend;
pub use xyce::XyceBackend;

/// Uniform contract every numeric solver integration implements.
///
/// Each call is a single blocking round trip to one external solver
/// process. Implementations must be `Send + Sync`: concurrent callers
/// share adapters, and isolation is guaranteed by the per-invocation
/// working directory, not by locking.
pub trait SpiceBackend: Send + Sync {
    fn id(&self) -> BackendId;

    /// Probe whether the solver executable can be launched.
    fn is_available(&self) -> bool;

    /// Single-frequency AC gain of the netlist's output net. The netlist
    /// is device lines only; the adapter appends its own analysis
    /// directives.
    fn run_ac_gain(&self, netlist: &str, params: &AcGainParams) -> Result<GainResult>;

    /// Multi-point AC sweep over a validated frequency range.
    fn run_ac_sweep(&self, netlist: &str, params: &AcSweepParams) -> Result<SweepResult>;

    /// Output-referred noise sweep.
    fn run_noise_sweep(&self, netlist: &str, params: &NoiseParams) -> Result<NoiseResult>;
}
