//! LLM Semantic Cache
//!
//! Serves answers to semantically similar questions from an in-memory vector
//! store instead of calling the upstream generative-text API again:
//! - Cosine-similarity lookup with a fixed acceptance threshold
//! - Periodic merge and republish of the store through a shared S3 snapshot
//! - Token, energy and CO2 savings accounting for every cache hit

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use api::state::AppState;
use config::UpstreamConfig;
use domain::semantic_cache::{MaxEntries, SemanticCacheConfig};
use domain::TextGenerator;
use infrastructure::{
    history::InMemoryHistoryLedger,
    llm::{GeminiGenerator, HttpClient},
    semantic_cache::InMemoryVectorStore,
    services::SemanticCacheService,
    sync::{RemoteSyncService, S3ObjectStore, SyncStatusTracker},
};

/// Everything built at startup
pub struct AppComponents {
    pub state: AppState,
    /// `None` when remote sync is disabled or not configured
    pub sync: Option<Arc<RemoteSyncService>>,
}

impl AppComponents {
    /// Run one download-and-merge, then start the periodic loop
    pub async fn start_background_sync(&self) -> Option<JoinHandle<()>> {
        let sync = self.sync.clone()?;

        if let Err(e) = sync.download_and_merge().await {
            warn!(error = %e, "Initial snapshot download failed; continuing with local cache");
        }

        Some(sync.spawn())
    }
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppComponents> {
    let store = Arc::new(create_vector_store(&config.cache));
    let ledger = Arc::new(InMemoryHistoryLedger::new(config.energy.clone()));
    let status = Arc::new(SyncStatusTracker::new());
    let generator = create_generator(&config.upstream)?;

    let cache_service = SemanticCacheService::new(
        store.clone(),
        ledger,
        generator,
        status.clone(),
    )
    .with_catalog(config.upstream.models.clone())
    .with_constants(config.energy.clone())
    .with_preview_limit(config.cache.preview_limit)
    .with_upstream_timeout(config.upstream.timeout());

    let sync = create_sync_service(config, store, status).await;

    Ok(AppComponents {
        state: AppState::new(Arc::new(cache_service)),
        sync,
    })
}

fn create_vector_store(config: &SemanticCacheConfig) -> InMemoryVectorStore {
    let store = InMemoryVectorStore::with_threshold(config.similarity_threshold);

    match config.max_entries {
        Some(max_entries) => {
            info!(max_entries, "Vector store capacity limited");
            store.with_capacity_policy(Arc::new(MaxEntries::new(max_entries)))
        }
        None => store,
    }
}

fn create_generator(config: &UpstreamConfig) -> anyhow::Result<Arc<dyn TextGenerator>> {
    let client = HttpClient::with_timeout(config.timeout())?;

    let api_key = config.resolve_api_key().unwrap_or_else(|| {
        warn!("No upstream API key configured; cache misses will fail");
        String::new()
    });

    let generator = match &config.base_url {
        Some(base_url) => GeminiGenerator::with_base_url(client, api_key, base_url.as_str()),
        None => GeminiGenerator::new(client, api_key),
    };

    Ok(Arc::new(generator))
}

async fn create_sync_service(
    config: &AppConfig,
    store: Arc<InMemoryVectorStore>,
    status: Arc<SyncStatusTracker>,
) -> Option<Arc<RemoteSyncService>> {
    if !config.sync.enabled {
        info!("Remote sync disabled by configuration");
        return None;
    }

    match S3ObjectStore::connect(&config.sync).await {
        Ok(remote) => {
            info!(bucket = %remote.bucket(), key = %config.sync.key, "Remote sync enabled");
            Some(Arc::new(RemoteSyncService::new(
                store,
                Arc::new(remote),
                status,
                &config.sync,
            )))
        }
        Err(e) => {
            warn!(error = %e, "Remote sync disabled; caching locally only");
            None
        }
    }
}
