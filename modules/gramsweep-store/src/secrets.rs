use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{Result, StoreError};

/// Login credentials as stored in the secret payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[async_trait]
pub trait CredentialSource: Send + Sync {
    async fn fetch(&self) -> Result<Credentials>;
}

/// Secrets Manager source. The secret is a JSON document with `username`
/// and `password` fields, in either the string or binary slot.
pub struct SecretsManagerCredentials {
    client: aws_sdk_secretsmanager::Client,
    secret_name: String,
}

impl SecretsManagerCredentials {
    pub fn new(client: aws_sdk_secretsmanager::Client, secret_name: impl Into<String>) -> Self {
        Self {
            client,
            secret_name: secret_name.into(),
        }
    }
}

#[async_trait]
impl CredentialSource for SecretsManagerCredentials {
    async fn fetch(&self) -> Result<Credentials> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(&self.secret_name)
            .send()
            .await
            .map_err(|e| {
                StoreError::service("secretsmanager", "get_secret_value", e.into_service_error())
            })?;

        let payload: Vec<u8> = match (output.secret_string(), output.secret_binary()) {
            (Some(s), _) => s.as_bytes().to_vec(),
            (None, Some(b)) => b.as_ref().to_vec(),
            (None, None) => {
                return Err(StoreError::BadSecret {
                    name: self.secret_name.clone(),
                    message: "secret has no payload".to_string(),
                })
            }
        };

        serde_json::from_slice(&payload).map_err(|e| StoreError::BadSecret {
            name: self.secret_name.clone(),
            message: e.to_string(),
        })
    }
}
