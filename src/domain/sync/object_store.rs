//! Remote object store trait

use std::fmt::Debug;

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::DomainError;

/// Minimal key/value blob store holding the shared snapshot
#[async_trait]
pub trait RemoteObjectStore: Send + Sync + Debug {
    /// Fetch an object. A missing object is `Ok(None)`, not an error.
    async fn get(&self, key: &str) -> Result<Option<Bytes>, DomainError>;

    /// Create or overwrite an object
    async fn put(&self, key: &str, body: Bytes) -> Result<(), DomainError>;

    /// Human-readable location for logs
    fn location(&self) -> String;
}
