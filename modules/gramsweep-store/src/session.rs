use async_trait::async_trait;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::primitives::ByteStream;
use tracing::info;
use webdriver_client::Cookie;

use crate::error::{Result, StoreError};

/// Result of a session load. Corruption and transport failures surface as
/// errors instead, so callers can tell "never logged in" from "broken".
pub enum SessionLoad {
    Loaded(Vec<Cookie>),
    Absent,
}

/// Durable persistence of an authenticated browser session's cookies.
/// At most one session per account; a newer save overwrites the older.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn save(&self, cookies: &[Cookie]) -> Result<()>;
    async fn load(&self) -> Result<SessionLoad>;
}

/// Cookies stored as a JSON array at a fixed object key per account.
pub struct S3SessionStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    key: String,
}

impl S3SessionStore {
    pub fn new(
        client: aws_sdk_s3::Client,
        bucket: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

#[async_trait]
impl SessionStore for S3SessionStore {
    async fn save(&self, cookies: &[Cookie]) -> Result<()> {
        let body = serde_json::to_vec_pretty(cookies)?;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&self.key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| StoreError::service("s3", "put_object", e.into_service_error()))?;
        info!(key = %self.key, count = cookies.len(), "Session cookies saved");
        Ok(())
    }

    async fn load(&self) -> Result<SessionLoad> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&self.key)
            .send()
            .await;

        let output = match response {
            Ok(output) => output,
            Err(SdkError::ServiceError(err)) if err.err().is_no_such_key() => {
                return Ok(SessionLoad::Absent);
            }
            Err(e) => {
                return Err(StoreError::service("s3", "get_object", e.into_service_error()))
            }
        };

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| StoreError::service("s3", "get_object", e))?
            .into_bytes();

        let cookies: Vec<Cookie> = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::CorruptSession(e.to_string()))?;

        info!(key = %self.key, count = cookies.len(), "Session cookies loaded");
        Ok(SessionLoad::Loaded(cookies))
    }
}
