//! Remote sync configuration

use std::time::Duration;

use serde::Deserialize;

use crate::domain::sync::{SyncStrategy, SNAPSHOT_KEY};
use crate::domain::DomainError;

/// Environment variables consulted when bucket/region are not configured
pub const BUCKET_ENV: &str = "S3_BUCKET_NAME";
pub const REGION_ENV: &str = "AWS_REGION";

#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Turn remote sync off entirely
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub bucket: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    /// Object key of the shared snapshot
    #[serde(default = "default_key")]
    pub key: String,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Timeout for each remote get/put
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Timeout for building the remote client
    #[serde(default = "default_setup_timeout_secs")]
    pub setup_timeout_secs: u64,
    #[serde(default)]
    pub strategy: SyncStrategy,
}

fn default_true() -> bool {
    true
}

fn default_key() -> String {
    SNAPSHOT_KEY.to_string()
}

fn default_interval_secs() -> u64 {
    300
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_setup_timeout_secs() -> u64 {
    10
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bucket: None,
            region: None,
            key: default_key(),
            interval_secs: default_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            setup_timeout_secs: default_setup_timeout_secs(),
            strategy: SyncStrategy::default(),
        }
    }
}

/// Where the snapshot lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteLocation {
    pub bucket: String,
    pub region: String,
}

impl SyncConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn setup_timeout(&self) -> Duration {
        Duration::from_secs(self.setup_timeout_secs)
    }

    /// Resolve bucket and region from config, then the process environment
    pub fn location(&self) -> Result<RemoteLocation, DomainError> {
        self.location_with(|name| std::env::var(name).ok())
    }

    /// Resolve bucket and region using `env` for fallbacks
    pub fn location_with(
        &self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<RemoteLocation, DomainError> {
        let pick = |configured: &Option<String>, var: &str| {
            configured
                .clone()
                .or_else(|| env(var))
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bucket = pick(&self.bucket, BUCKET_ENV)
            .ok_or_else(|| DomainError::configuration(format!("{} is required", BUCKET_ENV)))?;
        let region = pick(&self.region, REGION_ENV)
            .ok_or_else(|| DomainError::configuration(format!("{} is required", REGION_ENV)))?;

        Ok(RemoteLocation { bucket, region })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SyncConfig::default();

        assert!(config.enabled);
        assert_eq!(config.key, "cache.json");
        assert_eq!(config.interval(), Duration::from_secs(300));
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
        assert_eq!(config.setup_timeout(), Duration::from_secs(10));
        assert_eq!(config.strategy, SyncStrategy::FullReplace);
    }

    #[test]
    fn test_location_from_config() {
        let config = SyncConfig {
            bucket: Some("cache-bucket".to_string()),
            region: Some("eu-west-1".to_string()),
            ..Default::default()
        };

        let location = config.location_with(|_| None).unwrap();

        assert_eq!(location.bucket, "cache-bucket");
        assert_eq!(location.region, "eu-west-1");
    }

    #[test]
    fn test_location_env_fallback() {
        let config = SyncConfig::default();

        let location = config
            .location_with(|name| match name {
                BUCKET_ENV => Some(" env-bucket ".to_string()),
                REGION_ENV => Some("us-east-1".to_string()),
                _ => None,
            })
            .unwrap();

        assert_eq!(location.bucket, "env-bucket");
    }

    #[test]
    fn test_missing_location_is_configuration_error() {
        let config = SyncConfig {
            bucket: Some("bucket".to_string()),
            region: Some("   ".to_string()),
            ..Default::default()
        };

        let result = config.location_with(|_| None);

        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }
}
