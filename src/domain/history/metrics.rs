//! Aggregate savings metrics.
//!
//! Recomputed from the full ledger on every call, so cost is linear in the
//! number of served requests. Fine for a single process; larger deployments
//! would want running totals instead.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{HistoryItem, HistorySource};
use crate::domain::semantic_cache::{CacheEntry, CacheSource};

/// Totals over every cache hit in the ledger
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheMetrics {
    pub cache_hits: u64,
    pub local_cache_hits: u64,
    pub remote_cache_hits: u64,
    pub estimated_tokens_saved: u64,
    pub energy_saved_wh: f64,
    #[serde(rename = "co2SavedG")]
    pub co2_saved_g: f64,
}

/// A stored cache entry as shown in previews
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntryView {
    pub question: String,
    pub answer: String,
    pub source: CacheSource,
    pub created_at: DateTime<Utc>,
}

impl From<&CacheEntry> for CacheEntryView {
    fn from(entry: &CacheEntry) -> Self {
        Self {
            question: entry.question().to_string(),
            answer: entry.answer().to_string(),
            source: entry.source(),
            created_at: entry.created_at(),
        }
    }
}

/// A cache hit as shown in previews
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheUseView {
    pub question: String,
    pub answer: String,
    pub source: HistorySource,
    pub timestamp: DateTime<Utc>,
    pub tokens_saved: u64,
    pub energy_saved_wh: f64,
    #[serde(rename = "co2SavedG")]
    pub co2_saved_g: f64,
}

impl From<&HistoryItem> for CacheUseView {
    fn from(item: &HistoryItem) -> Self {
        Self {
            question: item.question.clone(),
            answer: item.answer.clone(),
            source: item.source,
            timestamp: item.timestamp,
            tokens_saved: item.tokens_saved,
            energy_saved_wh: item.energy_saved_wh,
            co2_saved_g: item.co2_saved_g,
        }
    }
}

/// Totals plus bounded, newest-first previews
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsReport {
    pub metrics: CacheMetrics,
    /// Most recent LOCAL entries in the store
    pub local_entries: Vec<CacheEntryView>,
    /// Most recent cache hits served from REMOTE entries
    pub remote_entries: Vec<CacheUseView>,
}

/// Derive metrics from the ledger (append order) and the store contents
/// (insertion order). Each preview holds at most `preview_limit` items.
pub fn aggregate(
    history: &[HistoryItem],
    entries: &[CacheEntry],
    preview_limit: usize,
) -> MetricsReport {
    let local_entries = entries
        .iter()
        .rev()
        .filter(|entry| entry.source() == CacheSource::Local)
        .take(preview_limit)
        .map(CacheEntryView::from)
        .collect();

    let mut metrics = CacheMetrics::default();
    let mut remote_entries = Vec::new();

    for item in history.iter().rev().filter(|item| item.saved) {
        metrics.cache_hits += 1;
        metrics.estimated_tokens_saved += item.tokens_saved;
        metrics.energy_saved_wh += item.energy_saved_wh;
        metrics.co2_saved_g += item.co2_saved_g;

        if item.source == HistorySource::Remote {
            metrics.remote_cache_hits += 1;

            if remote_entries.len() < preview_limit {
                remote_entries.push(CacheUseView::from(item));
            }
        } else {
            metrics.local_cache_hits += 1;
        }
    }

    MetricsReport {
        metrics,
        local_entries,
        remote_entries,
    }
}
