//! Sync status snapshot

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Point-in-time view of the sync state
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    /// True only while an upload is in flight
    pub uploading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_upload_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_download_at: Option<DateTime<Utc>>,
}
