//! In-memory vector store

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::semantic_cache::{
    cosine_similarity, CacheEntry, CacheSource, CapacityPolicy, MatchedEntry, MergeOutcome,
    MergePolicy, Unbounded, VectorStore, SIMILARITY_THRESHOLD,
};
use crate::domain::DomainError;

/// Append-only vector store using linear search.
///
/// Every lookup scores every entry, so cost grows with entries × dimension.
/// Nothing is ever evicted; the capacity policy can only refuse inserts.
#[derive(Debug)]
pub struct InMemoryVectorStore {
    entries: RwLock<Vec<CacheEntry>>,
    threshold: f64,
    capacity: Arc<dyn CapacityPolicy>,
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryVectorStore {
    /// Create an unbounded store with the standard threshold
    pub fn new() -> Self {
        Self::with_threshold(SIMILARITY_THRESHOLD)
    }

    /// Create an unbounded store with a custom threshold
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            threshold,
            capacity: Arc::new(Unbounded),
        }
    }

    /// Replace the capacity policy
    pub fn with_capacity_policy(mut self, capacity: Arc<dyn CapacityPolicy>) -> Self {
        self.capacity = capacity;
        self
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn insert(&self, entry: CacheEntry) -> Result<bool, DomainError> {
        let mut entries = self.entries.write().map_err(|e| {
            DomainError::internal(format!("Failed to acquire write lock: {}", e))
        })?;

        if !self.capacity.admit(entries.len()) {
            warn!(entries = entries.len(), "Capacity policy refused cache insert");
            return Ok(false);
        }

        entries.push(entry);
        Ok(true)
    }

    async fn find_best_match(&self, query: &[f32]) -> Result<Option<MatchedEntry>, DomainError> {
        let entries = self.entries.read().map_err(|e| {
            DomainError::internal(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut best_score = 0.0;
        let mut best: Option<&CacheEntry> = None;

        // Strict comparison keeps the earliest entry on ties
        for entry in entries.iter() {
            let score = cosine_similarity(query, entry.vector());
            if score > best_score {
                best_score = score;
                best = Some(entry);
            }
        }

        match best {
            Some(entry) if best_score >= self.threshold => {
                Ok(Some(MatchedEntry::new(entry.clone(), best_score)))
            }
            _ => {
                debug!(best_score, "No entry above similarity threshold");
                Ok(None)
            }
        }
    }

    async fn merge_remote(
        &self,
        remote: Vec<CacheEntry>,
        policy: &dyn MergePolicy,
    ) -> Result<MergeOutcome, DomainError> {
        let mut entries = self.entries.write().map_err(|e| {
            DomainError::internal(format!("Failed to acquire write lock: {}", e))
        })?;

        let mut known: HashSet<String> = entries
            .iter()
            .map(|entry| entry.question_key())
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .collect();

        let mut outcome = MergeOutcome::default();

        for candidate in remote {
            let key = candidate.question_key();

            if key.is_empty()
                || known.contains(key)
                || !policy.accept(&candidate)
                || !self.capacity.admit(entries.len())
            {
                outcome.skipped += 1;
                continue;
            }

            known.insert(key.to_string());
            entries.push(candidate.with_source(CacheSource::Remote));
            outcome.merged += 1;
        }

        Ok(outcome)
    }

    async fn snapshot(&self) -> Result<Vec<CacheEntry>, DomainError> {
        let entries = self.entries.read().map_err(|e| {
            DomainError::internal(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(entries.clone())
    }

    async fn len(&self) -> Result<usize, DomainError> {
        let entries = self.entries.read().map_err(|e| {
            DomainError::internal(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(entries.len())
    }
}
