//! In-memory score cache keyed by content fingerprint.
//!
//! Unbounded and process-lifetime: entries are never evicted and are lost on restart.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::evaluation::pipeline::EvaluationResult;

/// Shared handle to the fingerprint → result table. Clones share the same table.
#[derive(Clone, Default)]
pub struct ScoreCache {
    entries: Arc<RwLock<HashMap<String, EvaluationResult>>>,
}

impl ScoreCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, fingerprint: &str) -> Option<EvaluationResult> {
        self.entries.read().await.get(fingerprint).cloned()
    }

    /// Stores a result. A concurrent miss on the same key may overwrite it; last write wins.
    pub async fn insert(&self, fingerprint: String, result: EvaluationResult) {
        self.entries.write().await.insert(fingerprint, result);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
