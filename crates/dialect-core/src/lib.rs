//! Core data structures for the dialect routing engine.
//!
//! This crate provides the circuit representation shared by the model
//! analyzer, the macromodel synthesizer, and the backend adapters, plus the
//! line-oriented SPICE netlist renderer and the uniform analysis result
//! types every backend returns.

pub mod analysis;
pub mod backend;
pub mod circuit;
pub mod error;
pub mod netlist;
pub mod units;

pub use analysis::{
    AcGainParams, AcSweepParams, AnalysisResult, FrequencyRange, GainResult, NoiseParams,
    NoisePoint, NoiseResult, SweepPoint, SweepResult,
};
pub use backend::BackendId;
pub use circuit::{Circuit, Component, ComponentKind, ComponentValue};
pub use error::{Error, Result};
pub use netlist::render;
