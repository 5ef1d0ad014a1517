//! Error types for dialect-core.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("component {component} references undeclared net: {net}")]
    UnboundTerminal { component: String, net: String },

    #[error("duplicate component reference: {0}")]
    DuplicateRef(String),

    #[error("component {component}: expected {expected} terminals, got {actual}")]
    TerminalCount {
        component: String,
        expected: usize,
        actual: usize,
    },

    #[error("invalid frequency range: start {start_hz} Hz, stop {stop_hz} Hz")]
    InvalidFrequencyRange { start_hz: f64, stop_hz: f64 },

    #[error("sweep points out of order at {freq_hz} Hz")]
    NonMonotonicSweep { freq_hz: f64 },

    #[error("invalid value: {0}")]
    InvalidValue(String),
}

pub type Result<T> = std::result::Result<T, Error>;
