//! Error types for backend adapters.
//!
//! Every adapter surfaces the same error set, with the captured solver
//! diagnostic text attached verbatim. Adapters never retry; retry policy
//! belongs to the caller.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Solver executable missing or not launchable.
    #[error("{backend} unavailable: {reason}")]
    BackendUnavailable { backend: String, reason: String },

    /// Solver rejected the netlist, or its output did not contain the
    /// columns the adapter expects.
    #[error("{backend} rejected netlist: {diagnostics}")]
    NetlistSyntax { backend: String, diagnostics: String },

    /// Solver ran but did not converge.
    #[error("{backend} simulation did not converge: {diagnostics}")]
    SimulationDivergence { backend: String, diagnostics: String },

    /// Solver exceeded the configured wall-clock budget. The child
    /// process has been killed; no partial results exist.
    #[error("{backend} timed out after {timeout_secs} s")]
    SimulationTimeout { backend: String, timeout_secs: u64 },

    /// Solver failed for a reason that is neither a syntax rejection nor
    /// a convergence failure.
    #[error("{backend} execution failed: {diagnostics}")]
    SolverFailed { backend: String, diagnostics: String },

    /// Failed to set up the isolated working area for an invocation.
    #[error("solver workspace error: {0}")]
    Workspace(String),

    #[error(transparent)]
    Core(#[from] dialect_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
