//! Semantic cache configuration

use serde::{Deserialize, Serialize};

use super::SIMILARITY_THRESHOLD;

/// Configuration for the semantic cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticCacheConfig {
    /// Minimum cosine similarity for a cache hit
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    /// Maximum number of items in each preview list of the stats report
    #[serde(default = "default_preview_limit")]
    pub preview_limit: usize,

    /// Optional entry cap. `None` keeps the store unbounded.
    #[serde(default)]
    pub max_entries: Option<usize>,
}

fn default_similarity_threshold() -> f64 {
    SIMILARITY_THRESHOLD
}

fn default_preview_limit() -> usize {
    50
}

impl Default for SemanticCacheConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            preview_limit: default_preview_limit(),
            max_entries: None,
        }
    }
}

impl SemanticCacheConfig {
    /// Set the similarity threshold
    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold.clamp(-1.0, 1.0);
        self
    }

    /// Set the preview limit
    pub fn with_preview_limit(mut self, limit: usize) -> Self {
        self.preview_limit = limit;
        self
    }

    /// Cap the number of stored entries
    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = Some(max);
        self
    }
}
