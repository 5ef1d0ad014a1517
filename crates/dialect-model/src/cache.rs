//! Content-keyed metadata cache.
//!
//! Metadata is immutable after creation, so entries are shared as `Arc`
//! and safe to hand to concurrent callers. Re-analysis of changed text
//! lands under a different content key; stale entries are superseded,
//! never mutated.

use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::{Arc, RwLock};

use crate::classify::analyze;
use crate::metadata::ModelMetadata;

/// 64-bit content key for a model text.
pub fn content_key(text: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}

/// Cache of classification results keyed by model text content.
#[derive(Debug, Default)]
pub struct ModelCache {
    entries: RwLock<HashMap<u64, Arc<ModelMetadata>>>,
}

impl ModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return cached metadata for `text`, analyzing on first sight.
    pub fn get_or_analyze(&self, text: &str) -> Arc<ModelMetadata> {
        let key = content_key(text);

        if let Some(meta) = self.entries.read().expect("cache lock").get(&key) {
            return Arc::clone(meta);
        }

        let meta = Arc::new(analyze(text));
        let mut entries = self.entries.write().expect("cache lock");
        // A concurrent caller may have analyzed the same text; keep the
        // first entry so everyone shares one Arc.
        Arc::clone(entries.entry(key).or_insert(meta))
    }

    pub fn len(&self) -> usize {
        self.entries.read().expect("cache lock").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::Category;

    #[test]
    fn test_cache_shares_entries() {
        let cache = ModelCache::new();
        let a = cache.get_or_analyze("R1 1 0 1k\n");
        let b = cache.get_or_analyze("R1 1 0 1k\n");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_changed_text_gets_new_entry() {
        let cache = ModelCache::new();
        let a = cache.get_or_analyze("R1 1 0 1k\n");
        let b = cache.get_or_analyze("B1 out 0 V=ddt(V(in))\n");
        assert_eq!(a.category, Category::StandardSpice);
        assert_eq!(b.category, Category::LtspiceOnly);
        assert_eq!(cache.len(), 2);
    }
}
