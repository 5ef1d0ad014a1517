//! Classification result metadata.

use dialect_core::BackendId;
use serde::{Deserialize, Serialize};

use crate::flags::{Category, ModelFeatureFlags, Vendor};

/// High-level classification of one vendor model text.
///
/// Derived deterministically from the feature flags and vendor guess;
/// never mutated after creation. Re-analysis of changed text produces a
/// new instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub vendor: Vendor,
    pub category: Category,
    /// Backend the classifier recommends; `None` forces conversion
    /// (encrypted models).
    pub recommended_backend: Option<BackendId>,
    /// Heuristic [0,1] confidence that the model simulates correctly on
    /// the recommended backend without conversion.
    pub compatibility_score: f64,
    /// Declared `.SUBCKT` names (file order) followed by `.MODEL` names.
    pub subcircuit_names: Vec<String>,
    pub flags: ModelFeatureFlags,
    /// Non-fatal classification/conversion notes.
    pub warnings: Vec<String>,
}

impl ModelMetadata {
    /// One-line summary suitable for logs.
    pub fn summary(&self) -> String {
        let name = self
            .subcircuit_names
            .first()
            .map(String::as_str)
            .unwrap_or("(unnamed)");
        match self.recommended_backend {
            Some(backend) => format!(
                "{name}: {} (prefers {backend}, score {:.1})",
                self.category, self.compatibility_score
            ),
            None => format!("{name}: {} (no compatible backend)", self.category),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_mentions_backend() {
        let meta = ModelMetadata {
            vendor: Vendor::Adi,
            category: Category::PspiceLike,
            recommended_backend: Some(BackendId::Xyce),
            compatibility_score: 0.5,
            subcircuit_names: vec!["OP284".into()],
            flags: ModelFeatureFlags::default(),
            warnings: vec![],
        };
        assert_eq!(meta.summary(), "OP284: PSpice-like (prefers xyce, score 0.5)");
    }

    #[test]
    fn test_json_roundtrip() {
        let meta = ModelMetadata {
            vendor: Vendor::Unknown,
            category: Category::Encrypted,
            recommended_backend: None,
            compatibility_score: 0.0,
            subcircuit_names: vec![],
            flags: ModelFeatureFlags::default(),
            warnings: vec!["encrypted".into()],
        };
        let json = serde_json::to_string(&meta).unwrap();
        let back: ModelMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(meta, back);
    }
}
