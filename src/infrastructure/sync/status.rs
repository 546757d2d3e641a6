//! Shared sync status with RAII upload flag

use std::sync::RwLock;

use chrono::Utc;

use crate::domain::sync::SyncStatus;

/// Process-wide sync status. Written by the sync service, read by stats.
#[derive(Debug, Default)]
pub struct SyncStatusTracker {
    status: RwLock<SyncStatus>,
}

impl SyncStatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> SyncStatus {
        // A poisoned lock still holds a valid status record
        self.status
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Mark an upload in flight until the returned guard is dropped
    pub fn begin_upload(&self) -> UploadGuard<'_> {
        self.set_uploading(true);
        UploadGuard { tracker: self }
    }

    pub fn mark_upload_completed(&self) {
        self.update(|status| status.last_upload_at = Some(Utc::now()));
    }

    pub fn mark_download_completed(&self) {
        self.update(|status| status.last_download_at = Some(Utc::now()));
    }

    fn set_uploading(&self, uploading: bool) {
        self.update(|status| status.uploading = uploading);
    }

    fn update(&self, apply: impl FnOnce(&mut SyncStatus)) {
        let mut status = self.status.write().unwrap_or_else(|e| e.into_inner());
        apply(&mut status);
    }
}

/// Clears the uploading flag on every exit path
#[derive(Debug)]
pub struct UploadGuard<'a> {
    tracker: &'a SyncStatusTracker,
}

impl Drop for UploadGuard<'_> {
    fn drop(&mut self) {
        self.tracker.set_uploading(false);
    }
}
