//! Snapshot wire format: a JSON array of cache entries

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::domain::semantic_cache::CacheEntry;
use crate::domain::DomainError;

/// How local state is published to the remote snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStrategy {
    /// Upload the whole store, replacing the remote object. Concurrent
    /// publishers race and the last successful upload wins.
    #[default]
    FullReplace,
}

/// Serialize the store contents for upload
pub fn encode_snapshot(entries: &[CacheEntry]) -> Result<Bytes, DomainError> {
    serde_json::to_vec_pretty(entries)
        .map(Bytes::from)
        .map_err(|e| DomainError::internal(format!("Failed to encode snapshot: {}", e)))
}

/// Parse a downloaded snapshot. An empty body is an empty snapshot.
pub fn decode_snapshot(body: &[u8]) -> Result<Vec<CacheEntry>, DomainError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let entries: Option<Vec<CacheEntry>> = serde_json::from_slice(body)
        .map_err(|e| DomainError::storage(format!("Failed to decode snapshot: {}", e)))?;

    Ok(entries.unwrap_or_default())
}
