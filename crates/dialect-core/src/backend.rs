//! Backend identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies a registered numeric solver backend.
///
/// `Ngspice` is the primary backend: every converted macromodel is
/// guaranteed to run on it. `Xyce` is the secondary backend used for
/// PSpice/LTspice-flavored models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendId {
    Ngspice,
    Xyce,
}

impl BackendId {
    /// The backend that any solver-safe (converted or plain SPICE3)
    /// netlist can always be routed to.
    pub const PRIMARY: BackendId = BackendId::Ngspice;

    /// Backend preferred for PSpice/LTspice-flavored model text.
    pub const SECONDARY: BackendId = BackendId::Xyce;

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendId::Ngspice => "ngspice",
            BackendId::Xyce => "xyce",
        }
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names() {
        assert_eq!(BackendId::Ngspice.to_string(), "ngspice");
        assert_eq!(BackendId::Xyce.to_string(), "xyce");
        assert_eq!(BackendId::PRIMARY, BackendId::Ngspice);
    }
}
