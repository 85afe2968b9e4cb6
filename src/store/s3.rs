//! S3-backed object store gateway

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;

use super::{ObjectBody, ObjectStore};
use crate::config::S3Settings;
use crate::error::RelayError;

/// Gateway over an `aws-sdk-s3` client
///
/// The client is built once per invocation and reused for every record in
/// the batch. Nothing else is cached between calls.
#[derive(Clone, Debug)]
pub struct S3ObjectStore {
    client: S3Client,
}

impl S3ObjectStore {
    /// Wrap an already configured client
    pub fn new(client: S3Client) -> Self {
        Self { client }
    }

    /// Build a client from the AWS default chain plus configured overrides
    pub async fn from_settings(settings: &S3Settings) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = &settings.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        if let Some(endpoint) = &settings.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(settings.force_path_style)
            .build();

        tracing::debug!(
            region = ?settings.region,
            endpoint = ?settings.endpoint,
            force_path_style = settings.force_path_style,
            "S3 client configured"
        );

        Self::new(S3Client::from_conf(s3_config))
    }

    pub fn client(&self) -> &S3Client {
        &self.client
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn fetch(&self, bucket: &str, key: &str) -> Result<ObjectBody, RelayError> {
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let not_found = e
                    .as_service_error()
                    .map(|se| se.is_no_such_key())
                    .unwrap_or(false)
                    || e.raw_response().map(|r| r.status().as_u16()) == Some(404);
                if not_found {
                    RelayError::ObjectNotFound {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                    }
                } else {
                    RelayError::Transport(format!(
                        "S3 get {}/{} failed: {}",
                        bucket,
                        key,
                        DisplayErrorContext(&e)
                    ))
                }
            })?;

        let data = response.body.collect().await.map_err(|e| {
            RelayError::Transport(format!("Failed to read S3 body {}/{}: {}", bucket, key, e))
        })?;

        Ok(ObjectBody::new(data.into_bytes()))
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), RelayError> {
        let content_length = body.len() as i64;
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_length(content_length)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| {
                RelayError::Transport(format!(
                    "S3 put {}/{} failed: {}",
                    bucket,
                    key,
                    DisplayErrorContext(&e)
                ))
            })?;
        Ok(())
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), RelayError> {
        // S3 answers 204 for missing keys too
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                RelayError::Transport(format!(
                    "S3 delete {}/{} failed: {}",
                    bucket,
                    key,
                    DisplayErrorContext(&e)
                ))
            })?;
        Ok(())
    }
}
