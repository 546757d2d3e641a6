//! S3-backed snapshot store

use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use tracing::debug;

use super::config::{RemoteLocation, SyncConfig};
use crate::domain::sync::RemoteObjectStore;
use crate::domain::DomainError;

/// Snapshot store backed by a single S3 bucket
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: S3Client,
    bucket: String,
}

impl S3ObjectStore {
    pub fn new(client: S3Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Load AWS configuration for the configured region and build a client.
    ///
    /// Fails with a configuration error when bucket or region are missing.
    pub async fn connect(config: &SyncConfig) -> Result<Self, DomainError> {
        let RemoteLocation { bucket, region } = config.location()?;
        let timeout = config.setup_timeout();

        let sdk_config = tokio::time::timeout(
            timeout,
            aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(aws_config::Region::new(region.clone()))
                .load(),
        )
        .await
        .map_err(|_| DomainError::timeout("AWS config load", timeout))?;

        debug!(bucket = %bucket, region = %region, "S3 snapshot store configured");

        Ok(Self::new(S3Client::new(&sdk_config), bucket))
    }
}

#[async_trait]
impl RemoteObjectStore for S3ObjectStore {
    async fn get(&self, key: &str) -> Result<Option<Bytes>, DomainError> {
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) => {
                let not_found = err
                    .as_service_error()
                    .map(|e| e.is_no_such_key())
                    .unwrap_or(false)
                    || matches!(&err, SdkError::ServiceError(ctx) if ctx.raw().status().as_u16() == 404);

                if not_found {
                    return Ok(None);
                }

                return Err(DomainError::storage(format!(
                    "S3 get {} failed: {}",
                    key,
                    DisplayErrorContext(&err)
                )));
            }
        };

        let data = output.body.collect().await.map_err(|e| {
            DomainError::storage(format!("Failed to read S3 object body: {}", e))
        })?;

        Ok(Some(data.into_bytes()))
    }

    async fn put(&self, key: &str, body: Bytes) -> Result<(), DomainError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type("application/json")
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| {
                DomainError::storage(format!("S3 put {} failed: {}", key, DisplayErrorContext(&e)))
            })?;

        Ok(())
    }

    fn location(&self) -> String {
        format!("s3://{}", self.bucket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::config::retry::RetryConfig;
    use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region, RequestChecksumCalculation};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const NO_SUCH_KEY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Error><Code>NoSuchKey</Code><Message>The specified key does not exist.</Message><Key>cache.json</Key></Error>"#;

    const ACCESS_DENIED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Error><Code>AccessDenied</Code><Message>Access Denied</Message></Error>"#;

    fn store_for(server: &MockServer) -> S3ObjectStore {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("test", "test", None, None, "test"))
            .endpoint_url(server.uri())
            .force_path_style(true)
            .retry_config(RetryConfig::disabled())
            .request_checksum_calculation(RequestChecksumCalculation::WhenRequired)
            .build();

        S3ObjectStore::new(S3Client::from_conf(config), "snapshots")
    }

    #[tokio::test]
    async fn test_get_no_such_key_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/snapshots/cache.json"))
            .respond_with(
                ResponseTemplate::new(404)
                    .insert_header("content-type", "application/xml")
                    .set_body_string(NO_SUCH_KEY),
            )
            .mount(&server)
            .await;

        let result = store_for(&server).get("cache.json").await;

        assert!(matches!(result, Ok(None)));
    }

    #[tokio::test]
    async fn test_get_bare_404_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/snapshots/cache.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = store_for(&server).get("cache.json").await;

        assert!(matches!(result, Ok(None)));
    }

    #[tokio::test]
    async fn test_get_access_denied_is_storage_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/snapshots/cache.json"))
            .respond_with(
                ResponseTemplate::new(403)
                    .insert_header("content-type", "application/xml")
                    .set_body_string(ACCESS_DENIED),
            )
            .mount(&server)
            .await;

        let result = store_for(&server).get("cache.json").await;

        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_get_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/snapshots/cache.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .mount(&server)
            .await;

        let body = store_for(&server).get("cache.json").await.unwrap();

        assert_eq!(body, Some(Bytes::from_static(b"[]")));
    }

    #[tokio::test]
    async fn test_put_sends_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/snapshots/cache.json"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        store_for(&server)
            .put("cache.json", Bytes::from_static(b"[{\"question\":\"Q\"}]"))
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].body, b"[{\"question\":\"Q\"}]".to_vec());
    }

    #[tokio::test]
    async fn test_location_names_bucket() {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build();
        let store = S3ObjectStore::new(S3Client::from_conf(config), "snapshots");

        assert_eq!(store.location(), "s3://snapshots");
        assert_eq!(store.bucket(), "snapshots");
    }
}
