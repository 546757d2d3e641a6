//! Remote snapshot synchronization

mod config;
mod s3;
mod service;
mod status;

pub use config::{RemoteLocation, SyncConfig, BUCKET_ENV, REGION_ENV};
pub use s3::S3ObjectStore;
pub use service::{RemoteSyncService, SyncError, TickReport};
pub use status::{SyncStatusTracker, UploadGuard};
