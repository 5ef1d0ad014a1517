//! Feature flags, vendor and category enums.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Flags describing which non-standard construct families are present in
/// a model text. Produced once per text by [`crate::detect`]; immutable
/// afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelFeatureFlags {
    /// PSpice Axxx behavioral/macromodel devices.
    pub behavioral_devices: bool,
    /// PSpice `TABLE(...)` arbitrary-function tables.
    pub table_functions: bool,
    /// PSpice limiting functions: LIMIT(), ULIM(), IF()/THEN()/ELSE(), ...
    pub limit_functions: bool,
    /// LTspice-only functions: ddt(), idt(), white(), ...
    pub ltspice_functions: bool,
    /// `.encrypt`/`.protect` markers, or an untokenizable binary payload.
    pub encrypted: bool,
    /// A vendor marker was found in the leading comment lines.
    pub vendor_comment: bool,
    /// The offending tokens, for diagnostics. Sorted for deterministic
    /// reporting.
    pub primitives: BTreeSet<String>,
}

impl ModelFeatureFlags {
    /// True if anything beyond plain SPICE3 is present.
    pub fn any_nonstandard(&self) -> bool {
        self.behavioral_devices
            || self.table_functions
            || self.limit_functions
            || self.ltspice_functions
            || self.encrypted
    }
}

/// Model vendor guessed from comment markers. Independent of category;
/// ties resolve in declaration order (TI > ADI > LTspice > Unknown).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Vendor {
    Ti,
    Adi,
    Ltspice,
    Unknown,
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Vendor::Ti => "TI",
            Vendor::Adi => "ADI",
            Vendor::Ltspice => "LTspice",
            Vendor::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Compatibility category from the ordered decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    /// Plain SPICE3: the primary solver runs it directly.
    StandardSpice,
    /// PSpice-flavored constructs: prefers the secondary solver.
    PspiceLike,
    /// LTspice-only functions: prefers the secondary solver, best effort.
    LtspiceOnly,
    /// Encrypted/protected payload: no solver can run it as-is.
    Encrypted,
}

impl Category {
    /// Whether macromodel conversion may replace this model.
    /// Standard SPICE never needs conversion; everything else permits it,
    /// and `Encrypted` forces it.
    pub fn permits_conversion(&self) -> bool {
        !matches!(self, Category::StandardSpice)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::StandardSpice => "standard SPICE",
            Category::PspiceLike => "PSpice-like",
            Category::LtspiceOnly => "LTspice-only",
            Category::Encrypted => "encrypted",
        };
        f.write_str(s)
    }
}
