//! Remote snapshot synchronization: object store contract, wire codec, status

mod object_store;
mod snapshot;
mod status;

pub use object_store::RemoteObjectStore;
pub use snapshot::{decode_snapshot, encode_snapshot, SyncStrategy};
pub use status::SyncStatus;

#[cfg(test)]
pub use object_store::mock::MockObjectStore;

/// Well-known key of the shared snapshot object
pub const SNAPSHOT_KEY: &str = "cache.json";
