//! Vector store trait

use std::fmt::Debug;

use async_trait::async_trait;

use super::{CacheEntry, MatchedEntry, MergePolicy};
use crate::domain::DomainError;

/// Outcome of merging a remote snapshot into the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Entries added to the store
    pub merged: usize,
    /// Entries dropped for an empty question, a known question, policy or capacity
    pub skipped: usize,
}

/// Concurrent store of cache entries with nearest-neighbour lookup.
///
/// Entries are append-only. Implementations must not perform I/O while
/// holding their lock.
#[async_trait]
pub trait VectorStore: Send + Sync + Debug {
    /// Store an owned copy of the entry. Returns `false` when the capacity
    /// policy refused it.
    async fn insert(&self, entry: CacheEntry) -> Result<bool, DomainError>;

    /// Most similar entry at or above the threshold, if any
    async fn find_best_match(&self, query: &[f32]) -> Result<Option<MatchedEntry>, DomainError>;

    /// Merge remote entries, tagging accepted ones as remote
    async fn merge_remote(
        &self,
        entries: Vec<CacheEntry>,
        policy: &dyn MergePolicy,
    ) -> Result<MergeOutcome, DomainError>;

    /// Copy of every entry in insertion order
    async fn snapshot(&self) -> Result<Vec<CacheEntry>, DomainError>;

    /// Number of stored entries
    async fn len(&self) -> Result<usize, DomainError>;

    /// Whether the store holds no entries
    async fn is_empty(&self) -> Result<bool, DomainError> {
        Ok(self.len().await? == 0)
    }
}
