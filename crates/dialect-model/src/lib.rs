//! Vendor SPICE model analysis for the dialect routing engine.
//!
//! Scans raw model text for constructs the primary solver cannot digest
//! (PSpice behavioral devices, TABLE functions, LTspice-only functions,
//! encryption markers), classifies the model through an ordered decision
//! table, and produces immutable [`ModelMetadata`] used for backend
//! routing and macromodel conversion.
//!
//! ```
//! use dialect_model::{analyze, Category};
//!
//! let meta = analyze("* plain divider model\n.SUBCKT DIV 1 2\nR1 1 2 1k\n.ENDS\n");
//! assert_eq!(meta.category, Category::StandardSpice);
//! assert_eq!(meta.subcircuit_names, vec!["DIV"]);
//! ```

pub mod cache;
pub mod classify;
pub mod detect;
pub mod error;
pub mod flags;
pub mod metadata;

pub use cache::ModelCache;
pub use classify::{analyze, analyze_file, classify};
pub use detect::{detect, guess_vendor, subcircuit_names};
pub use error::{Error, Result};
pub use flags::{Category, ModelFeatureFlags, Vendor};
pub use metadata::ModelMetadata;
