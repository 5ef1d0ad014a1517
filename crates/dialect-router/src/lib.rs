//! Backend routing.
//!
//! Decides which external SPICE solver runs a given job, based on the
//! model's compatibility classification, and falls back to macromodel
//! conversion when the recommended solver is not registered. The three
//! analysis entry points on [`SimulatorManager`] are the crate's whole
//! public surface: analyze, route, convert if needed, render, dispatch.

pub mod context;
pub mod error;
pub mod manager;
#[cfg(test)]
pub(crate) mod testing;

pub use context::context_banner;
pub use error::{Error, Result};
pub use manager::{RoutingDecision, SimulatorManager};
