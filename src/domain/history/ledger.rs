//! History ledger trait

use std::fmt::Debug;

use async_trait::async_trait;

use super::{HistoryItem, HistorySource};
use crate::domain::DomainError;

/// Append-only log of served requests
#[async_trait]
pub trait HistoryLedger: Send + Sync + Debug {
    /// Record a served request, computing savings when `saved` is true
    async fn append(
        &self,
        question: &str,
        answer: &str,
        saved: bool,
        source: HistorySource,
        model: &str,
    ) -> Result<HistoryItem, DomainError>;

    /// Every item, newest first
    async fn most_recent_first(&self) -> Result<Vec<HistoryItem>, DomainError>;

    /// Every item in append order
    async fn snapshot(&self) -> Result<Vec<HistoryItem>, DomainError>;

    /// Number of recorded items
    async fn len(&self) -> Result<usize, DomainError>;
}
