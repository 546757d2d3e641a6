//! Semantic cache service
//!
//! Answers a question from the vector store when a semantically similar one
//! was already answered, otherwise asks the upstream generator and caches
//! the result. Every served request is recorded in the history ledger.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::history::{aggregate, CacheEntryView, CacheMetrics, CacheUseView};
use crate::domain::llm::ModelCatalog;
use crate::domain::semantic_cache::SemanticCacheConfig;
use crate::domain::{
    CacheEntry, DomainError, EnergyConstants, HistoryItem, HistoryLedger, HistorySource,
    TextGenerator, VectorStore,
};
use crate::infrastructure::observability;
use crate::infrastructure::sync::SyncStatusTracker;

/// Where a lookup answer was served from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResponseSource {
    Cache,
    Cloud,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookupResponse {
    pub answer: String,
    pub source: ResponseSource,
}

/// Cache statistics with sync status and savings totals
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatsResponse {
    pub uploading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_upload_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_download_at: Option<DateTime<Utc>>,
    pub metrics: CacheMetrics,
    pub constants: EnergyConstants,
    pub local_entries: Vec<CacheEntryView>,
    pub remote_entries: Vec<CacheUseView>,
}

/// Wires the vector store, history ledger and upstream generator together
#[derive(Debug)]
pub struct SemanticCacheService {
    store: Arc<dyn VectorStore>,
    ledger: Arc<dyn HistoryLedger>,
    generator: Arc<dyn TextGenerator>,
    sync_status: Arc<SyncStatusTracker>,
    catalog: ModelCatalog,
    constants: EnergyConstants,
    preview_limit: usize,
    upstream_timeout: Duration,
}

impl SemanticCacheService {
    pub fn new(
        store: Arc<dyn VectorStore>,
        ledger: Arc<dyn HistoryLedger>,
        generator: Arc<dyn TextGenerator>,
        sync_status: Arc<SyncStatusTracker>,
    ) -> Self {
        Self {
            store,
            ledger,
            generator,
            sync_status,
            catalog: ModelCatalog::default(),
            constants: EnergyConstants::default(),
            preview_limit: SemanticCacheConfig::default().preview_limit,
            upstream_timeout: Duration::from_secs(20),
        }
    }

    pub fn with_catalog(mut self, catalog: ModelCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Constants reported by `stats`; should match the ledger's
    pub fn with_constants(mut self, constants: EnergyConstants) -> Self {
        self.constants = constants;
        self
    }

    pub fn with_preview_limit(mut self, preview_limit: usize) -> Self {
        self.preview_limit = preview_limit;
        self
    }

    pub fn with_upstream_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = timeout;
        self
    }

    /// Serve a question from the cache or the upstream generator.
    ///
    /// Upstream failures are returned as-is and leave both the store and the
    /// ledger untouched. Inputs are not validated here; an empty vector
    /// never matches and takes the miss path.
    pub async fn lookup(
        &self,
        question: &str,
        vector: &[f32],
        model: Option<&str>,
    ) -> Result<LookupResponse, DomainError> {
        let model = self.catalog.resolve(model);

        if let Some(matched) = self.store.find_best_match(vector).await? {
            observability::record_cache_lookup(true);

            let source = HistorySource::from(matched.entry.source());
            debug!(
                similarity = matched.similarity,
                source = %source,
                "Semantic cache hit"
            );

            self.ledger
                .append(question, matched.entry.answer(), true, source, model)
                .await?;

            return Ok(LookupResponse {
                answer: matched.entry.answer().to_string(),
                source: ResponseSource::Cache,
            });
        }

        observability::record_cache_lookup(false);
        debug!(model = %model, provider = self.generator.provider_name(), "Semantic cache miss");

        let answer = tokio::time::timeout(self.upstream_timeout, self.generator.generate(question, model))
            .await
            .map_err(|_| DomainError::timeout("upstream generate", self.upstream_timeout))?
            .inspect_err(|e| warn!(error = %e, model = %model, "Upstream generation failed"))?;

        let inserted = self
            .store
            .insert(CacheEntry::new(vector.to_vec(), question, answer.as_str()))
            .await?;
        if !inserted {
            info!("Cache at capacity; answer served without caching");
        }
        observability::set_cache_entries(self.store.len().await?);

        self.ledger
            .append(question, &answer, false, HistorySource::Cloud, model)
            .await?;

        Ok(LookupResponse {
            answer,
            source: ResponseSource::Cloud,
        })
    }

    /// Every served request, newest first
    pub async fn history(&self) -> Result<Vec<HistoryItem>, DomainError> {
        self.ledger.most_recent_first().await
    }

    pub async fn stats(&self) -> Result<CacheStatsResponse, DomainError> {
        let status = self.sync_status.snapshot();
        let history = self.ledger.snapshot().await?;
        let entries = self.store.snapshot().await?;

        let report = aggregate(&history, &entries, self.preview_limit);

        Ok(CacheStatsResponse {
            uploading: status.uploading,
            last_upload_at: status.last_upload_at,
            last_download_at: status.last_download_at,
            metrics: report.metrics,
            constants: self.constants.clone(),
            local_entries: report.local_entries,
            remote_entries: report.remote_entries,
        })
    }
}
