use std::path::Path;

use async_trait::async_trait;
use tracing::info;

use crate::error::{Result, StoreError};

/// The object-store surface the differ needs: pull an uploaded archive down
/// and delete it once processed.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn download(&self, bucket: &str, key: &str, dest: &Path) -> Result<()>;
    async fn delete(&self, bucket: &str, key: &str) -> Result<()>;
}

pub struct S3Objects {
    client: aws_sdk_s3::Client,
}

impl S3Objects {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3Objects {
    async fn download(&self, bucket: &str, key: &str, dest: &Path) -> Result<()> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StoreError::service("s3", "get_object", e.into_service_error()))?;

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| StoreError::service("s3", "get_object", e))?
            .into_bytes();
        tokio::fs::write(dest, &bytes).await?;

        info!(bucket, key, bytes = bytes.len(), "Archive downloaded");
        Ok(())
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StoreError::service("s3", "delete_object", e.into_service_error()))?;
        Ok(())
    }
}
