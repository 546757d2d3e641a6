//! Background merge-and-publish of the shared snapshot

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::config::SyncConfig;
use super::status::SyncStatusTracker;
use crate::domain::semantic_cache::{FirstSeenWins, MergeOutcome, MergePolicy, VectorStore};
use crate::domain::sync::{decode_snapshot, encode_snapshot, RemoteObjectStore, SyncStrategy};
use crate::domain::DomainError;
use crate::infrastructure::observability;

/// Failure of one sync step. Logged by the loop, never surfaced to requests.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Remote fetch failed: {0}")]
    Fetch(DomainError),

    #[error("Snapshot decode failed: {0}")]
    Decode(DomainError),

    #[error("Snapshot encode failed: {0}")]
    Encode(DomainError),

    #[error("Remote publish failed: {0}")]
    Publish(DomainError),

    #[error("Local store error: {0}")]
    Store(DomainError),
}

/// What a single tick did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub merge: MergeOutcome,
    /// Entries published, `None` when the upload was skipped
    pub uploaded: Option<usize>,
}

/// Merges the remote snapshot into the store and republishes the store.
///
/// Talks to the store only through [`VectorStore`]; every network call runs
/// after the store lock is released and under its own timeout.
#[derive(Debug)]
pub struct RemoteSyncService {
    store: Arc<dyn VectorStore>,
    remote: Arc<dyn RemoteObjectStore>,
    status: Arc<SyncStatusTracker>,
    merge_policy: Arc<dyn MergePolicy>,
    key: String,
    interval: Duration,
    request_timeout: Duration,
    strategy: SyncStrategy,
}

impl RemoteSyncService {
    pub fn new(
        store: Arc<dyn VectorStore>,
        remote: Arc<dyn RemoteObjectStore>,
        status: Arc<SyncStatusTracker>,
        config: &SyncConfig,
    ) -> Self {
        Self {
            store,
            remote,
            status,
            merge_policy: Arc::new(FirstSeenWins),
            key: config.key.clone(),
            interval: config.interval(),
            request_timeout: config.request_timeout(),
            strategy: config.strategy,
        }
    }

    /// Replace the merge policy
    pub fn with_merge_policy(mut self, policy: Arc<dyn MergePolicy>) -> Self {
        self.merge_policy = policy;
        self
    }

    pub fn status(&self) -> &Arc<SyncStatusTracker> {
        &self.status
    }

    /// Pull the remote snapshot and merge unseen questions into the store.
    ///
    /// A missing or blank snapshot is a valid empty state and does not count
    /// as a completed download.
    pub async fn download_and_merge(&self) -> Result<MergeOutcome, SyncError> {
        let body = self
            .with_timeout("remote get", self.remote.get(&self.key))
            .await
            .map_err(SyncError::Fetch)?;

        let Some(body) = body else {
            info!(key = %self.key, location = %self.remote.location(), "Remote snapshot not found; starting with empty cache");
            return Ok(MergeOutcome::default());
        };

        if body.iter().all(u8::is_ascii_whitespace) {
            debug!(key = %self.key, "Remote snapshot is empty");
            return Ok(MergeOutcome::default());
        }

        let remote_entries = decode_snapshot(&body).map_err(SyncError::Decode)?;
        let remote_count = remote_entries.len();

        let outcome = self
            .store
            .merge_remote(remote_entries, self.merge_policy.as_ref())
            .await
            .map_err(SyncError::Store)?;

        self.status.mark_download_completed();
        if let Ok(len) = self.store.len().await {
            observability::set_cache_entries(len);
        }

        info!(
            remote = remote_count,
            merged = outcome.merged,
            skipped = outcome.skipped,
            policy = self.merge_policy.name(),
            "Synced: {} new entries found",
            outcome.merged
        );

        Ok(outcome)
    }

    /// Publish the whole store, replacing the remote snapshot. Returns the
    /// number of entries published.
    pub async fn upload(&self) -> Result<usize, SyncError> {
        let _uploading = self.status.begin_upload();

        let entries = match self.strategy {
            SyncStrategy::FullReplace => self.store.snapshot().await.map_err(SyncError::Store)?,
        };
        let body = encode_snapshot(&entries).map_err(SyncError::Encode)?;

        debug!(entries = entries.len(), bytes = body.len(), "Uploading snapshot");

        self.with_timeout("remote put", self.remote.put(&self.key, body))
            .await
            .map_err(SyncError::Publish)?;

        self.status.mark_upload_completed();
        info!(entries = entries.len(), location = %self.remote.location(), "Snapshot uploaded");

        Ok(entries.len())
    }

    /// Merge, then publish if there is anything to publish. A failed
    /// download abandons the tick so an unreadable remote is never
    /// overwritten blind.
    pub async fn run_tick(&self) -> Result<TickReport, SyncError> {
        let merge = self.download_and_merge().await?;

        let has_data = !self.store.is_empty().await.map_err(SyncError::Store)?;
        let uploaded = if has_data {
            Some(self.upload().await?)
        } else {
            None
        };

        Ok(TickReport { merge, uploaded })
    }

    /// Spawn the periodic sync loop. The first tick fires one interval from
    /// now; ticks never overlap and late ticks are delayed, not bunched.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            info!(interval_secs = self.interval.as_secs(), "Background sync started");

            loop {
                ticker.tick().await;

                match self.run_tick().await {
                    Ok(report) => {
                        observability::record_sync_tick(true);
                        debug!(merged = report.merge.merged, uploaded = ?report.uploaded, "Sync tick finished");
                    }
                    Err(e) => {
                        observability::record_sync_tick(false);
                        warn!(error = %e, "Sync tick abandoned");
                    }
                }
            }
        })
    }

    async fn with_timeout<T>(
        &self,
        operation: &str,
        future: impl Future<Output = Result<T, DomainError>>,
    ) -> Result<T, DomainError> {
        tokio::time::timeout(self.request_timeout, future)
            .await
            .map_err(|_| DomainError::timeout(operation, self.request_timeout))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::semantic_cache::{CacheEntry, CacheSource};
    use crate::domain::sync::{MockObjectStore, SNAPSHOT_KEY};
    use crate::infrastructure::semantic_cache::InMemoryVectorStore;
    use tokio_test::{assert_err, assert_ok};

    fn snapshot_body(entries: &[CacheEntry]) -> bytes::Bytes {
        encode_snapshot(entries).unwrap()
    }

    fn service(
        store: Arc<InMemoryVectorStore>,
        remote: Arc<MockObjectStore>,
    ) -> RemoteSyncService {
        RemoteSyncService::new(
            store,
            remote,
            Arc::new(SyncStatusTracker::new()),
            &SyncConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_download_missing_snapshot_is_empty_success() {
        let store = Arc::new(InMemoryVectorStore::new());
        let remote = Arc::new(MockObjectStore::new());
        let sync = service(store.clone(), remote);

        let outcome = assert_ok!(sync.download_and_merge().await);

        assert_eq!(outcome.merged, 0);
        assert!(store.is_empty().await.unwrap());
        assert!(sync.status().snapshot().last_download_at.is_none());
    }

    #[tokio::test]
    async fn test_download_blank_snapshot_is_not_a_completed_download() {
        let store = Arc::new(InMemoryVectorStore::new());
        let remote = Arc::new(MockObjectStore::new().with_object(SNAPSHOT_KEY, " \n"));
        let sync = service(store.clone(), remote);

        let outcome = assert_ok!(sync.download_and_merge().await);

        assert_eq!(outcome, MergeOutcome::default());
        assert!(store.is_empty().await.unwrap());
        assert!(sync.status().snapshot().last_download_at.is_none());
    }

    #[tokio::test]
    async fn test_download_merges_new_entry_as_remote() {
        let store = Arc::new(InMemoryVectorStore::new());
        store
            .insert(CacheEntry::new(vec![1.0, 0.0], "Local", "A"))
            .await
            .unwrap();

        let body = snapshot_body(&[CacheEntry::new(vec![0.0, 1.0], "X", "B")]);
        let remote = Arc::new(MockObjectStore::new().with_object(SNAPSHOT_KEY, body));
        let sync = service(store.clone(), remote);

        let outcome = sync.download_and_merge().await.unwrap();

        assert_eq!(outcome.merged, 1);
        assert_eq!(store.len().await.unwrap(), 2);

        let merged = &store.snapshot().await.unwrap()[1];
        assert_eq!(merged.question(), "X");
        assert_eq!(merged.source(), CacheSource::Remote);
        assert!(sync.status().snapshot().last_download_at.is_some());
    }

    #[tokio::test]
    async fn test_download_twice_is_idempotent() {
        let store = Arc::new(InMemoryVectorStore::new());
        let body = snapshot_body(&[
            CacheEntry::new(vec![1.0], "Q1", "A1"),
            CacheEntry::new(vec![1.0], "  ", "blank"),
            CacheEntry::new(vec![1.0], "Q2", "A2"),
        ]);
        let remote = Arc::new(MockObjectStore::new().with_object(SNAPSHOT_KEY, body));
        let sync = service(store.clone(), remote);

        sync.download_and_merge().await.unwrap();
        let second = sync.download_and_merge().await.unwrap();

        assert_eq!(second.merged, 0);
        assert_eq!(store.len().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_download_fetch_failure_leaves_store_untouched() {
        let store = Arc::new(InMemoryVectorStore::new());
        let remote = Arc::new(MockObjectStore::new().with_get_error("connection reset"));
        let sync = service(store.clone(), remote);

        let result = sync.download_and_merge().await;

        assert!(matches!(result, Err(SyncError::Fetch(_))));
        assert!(store.is_empty().await.unwrap());
        assert!(sync.status().snapshot().last_download_at.is_none());
    }

    #[tokio::test]
    async fn test_download_decode_failure_leaves_store_untouched() {
        let store = Arc::new(InMemoryVectorStore::new());
        let remote = Arc::new(MockObjectStore::new().with_object(SNAPSHOT_KEY, "{broken"));
        let sync = service(store.clone(), remote);

        let result = sync.download_and_merge().await;

        assert!(matches!(result, Err(SyncError::Decode(_))));
        assert!(store.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn test_upload_publishes_full_store() {
        let store = Arc::new(InMemoryVectorStore::new());
        store
            .insert(CacheEntry::new(vec![1.0, 0.0], "Q1", "A1"))
            .await
            .unwrap();
        store
            .insert(CacheEntry::new(vec![0.0, 1.0], "Q2", "A2"))
            .await
            .unwrap();
        let remote = Arc::new(MockObjectStore::new());
        let sync = service(store, remote.clone());

        let published = sync.upload().await.unwrap();

        assert_eq!(published, 2);
        let uploaded = decode_snapshot(&remote.object(SNAPSHOT_KEY).unwrap()).unwrap();
        assert_eq!(uploaded.len(), 2);

        let status = sync.status().snapshot();
        assert!(!status.uploading);
        assert!(status.last_upload_at.is_some());
    }

    #[tokio::test]
    async fn test_upload_failure_clears_flag_and_keeps_timestamp() {
        let store = Arc::new(InMemoryVectorStore::new());
        store
            .insert(CacheEntry::new(vec![1.0], "Q", "A"))
            .await
            .unwrap();
        let remote = Arc::new(MockObjectStore::new().with_put_error("access denied"));
        let sync = service(store, remote);

        let result = sync.upload().await;

        assert!(matches!(result, Err(SyncError::Publish(_))));
        let status = sync.status().snapshot();
        assert!(!status.uploading);
        assert!(status.last_upload_at.is_none());
    }

    #[tokio::test]
    async fn test_tick_skips_upload_for_empty_store() {
        let store = Arc::new(InMemoryVectorStore::new());
        let remote = Arc::new(MockObjectStore::new());
        let sync = service(store, remote.clone());

        let report = sync.run_tick().await.unwrap();

        assert_eq!(report.uploaded, None);
        assert_eq!(remote.put_count(), 0);
    }

    #[tokio::test]
    async fn test_tick_merges_then_uploads() {
        let store = Arc::new(InMemoryVectorStore::new());
        store
            .insert(CacheEntry::new(vec![1.0, 0.0], "Local", "A"))
            .await
            .unwrap();
        let body = snapshot_body(&[CacheEntry::new(vec![0.0, 1.0], "Remote", "B")]);
        let remote = Arc::new(MockObjectStore::new().with_object(SNAPSHOT_KEY, body));
        let sync = service(store, remote.clone());

        let report = sync.run_tick().await.unwrap();

        assert_eq!(report.merge.merged, 1);
        assert_eq!(report.uploaded, Some(2));
        let uploaded = decode_snapshot(&remote.object(SNAPSHOT_KEY).unwrap()).unwrap();
        assert_eq!(uploaded.len(), 2);
    }

    #[tokio::test]
    async fn test_tick_abandoned_on_download_failure() {
        let store = Arc::new(InMemoryVectorStore::new());
        store
            .insert(CacheEntry::new(vec![1.0], "Q", "A"))
            .await
            .unwrap();
        let remote = Arc::new(MockObjectStore::new().with_get_error("timeout"));
        let sync = service(store, remote.clone());

        assert_err!(sync.run_tick().await);
        assert_eq!(remote.put_count(), 0);
    }

    #[derive(Debug)]
    struct StalledObjectStore;

    #[async_trait::async_trait]
    impl RemoteObjectStore for StalledObjectStore {
        async fn get(&self, _key: &str) -> Result<Option<bytes::Bytes>, DomainError> {
            std::future::pending().await
        }

        async fn put(&self, _key: &str, _body: bytes::Bytes) -> Result<(), DomainError> {
            std::future::pending().await
        }

        fn location(&self) -> String {
            "stalled://".to_string()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_remote_calls_time_out() {
        let store = Arc::new(InMemoryVectorStore::new());
        store
            .insert(CacheEntry::new(vec![1.0], "Q", "A"))
            .await
            .unwrap();
        let sync = RemoteSyncService::new(
            store,
            Arc::new(StalledObjectStore),
            Arc::new(SyncStatusTracker::new()),
            &SyncConfig::default(),
        );

        let download = sync.download_and_merge().await;
        assert!(matches!(
            download,
            Err(SyncError::Fetch(DomainError::Timeout { .. }))
        ));

        let upload = sync.upload().await;
        assert!(matches!(upload, Err(SyncError::Publish(DomainError::Timeout { .. }))));
        assert!(!sync.status().snapshot().uploading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_loop_runs_ticks() {
        let store = Arc::new(InMemoryVectorStore::new());
        store
            .insert(CacheEntry::new(vec![1.0], "Q", "A"))
            .await
            .unwrap();
        let remote = Arc::new(MockObjectStore::new());
        let sync = Arc::new(service(store, remote.clone()));

        let handle = sync.clone().spawn();

        tokio::time::sleep(Duration::from_secs(301)).await;
        assert_eq!(remote.put_count(), 1);

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(remote.put_count(), 2);

        handle.abort();
    }
}
