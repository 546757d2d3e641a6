//! In-memory history ledger

use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::history::{HistoryItem, HistoryLedger, HistorySource};
use crate::domain::savings::EnergyConstants;
use crate::domain::DomainError;

/// Append-only ledger held for the lifetime of the process
#[derive(Debug)]
pub struct InMemoryHistoryLedger {
    items: RwLock<Vec<HistoryItem>>,
    constants: EnergyConstants,
}

impl Default for InMemoryHistoryLedger {
    fn default() -> Self {
        Self::new(EnergyConstants::default())
    }
}

impl InMemoryHistoryLedger {
    pub fn new(constants: EnergyConstants) -> Self {
        Self {
            items: RwLock::new(Vec::new()),
            constants,
        }
    }
}

#[async_trait]
impl HistoryLedger for InMemoryHistoryLedger {
    async fn append(
        &self,
        question: &str,
        answer: &str,
        saved: bool,
        source: HistorySource,
        model: &str,
    ) -> Result<HistoryItem, DomainError> {
        // Savings are computed before taking the lock
        let item = HistoryItem::record(question, answer, saved, source, model, &self.constants);

        let mut items = self.items.write().map_err(|e| {
            DomainError::internal(format!("Failed to acquire write lock: {}", e))
        })?;

        items.push(item.clone());
        Ok(item)
    }

    async fn most_recent_first(&self) -> Result<Vec<HistoryItem>, DomainError> {
        let items = self.items.read().map_err(|e| {
            DomainError::internal(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(items.iter().rev().cloned().collect())
    }

    async fn snapshot(&self) -> Result<Vec<HistoryItem>, DomainError> {
        let items = self.items.read().map_err(|e| {
            DomainError::internal(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(items.clone())
    }

    async fn len(&self) -> Result<usize, DomainError> {
        let items = self.items.read().map_err(|e| {
            DomainError::internal(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(items.len())
    }
}
