use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{SecondsFormat, Utc};
use gramsweep_common::RunResult;
use tracing::warn;

use crate::error::{Result, StoreError};

/// Terminal-status record for each run. One row per job key; the latest
/// write wins.
#[async_trait]
pub trait OutcomeLog: Send + Sync {
    async fn record(&self, job: &str, result: RunResult) -> Result<()>;
}

/// Record an outcome, downgrading failure to a warning. The outcome row is
/// observability; it never decides a run's fate.
pub async fn record_or_warn(log: &dyn OutcomeLog, job: &str, result: RunResult) {
    if let Err(e) = log.record(job, result).await {
        warn!(job, result = result.as_str(), error = %e, "Failed to record run outcome");
    }
}

pub struct DynamoOutcomeLog {
    client: aws_sdk_dynamodb::Client,
    table: String,
}

impl DynamoOutcomeLog {
    pub fn new(client: aws_sdk_dynamodb::Client, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }
}

#[async_trait]
impl OutcomeLog for DynamoOutcomeLog {
    async fn record(&self, job: &str, result: RunResult) -> Result<()> {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        self.client
            .put_item()
            .table_name(&self.table)
            .item("key", AttributeValue::S(job.to_string()))
            .item("Result", AttributeValue::S(result.as_str().to_string()))
            .item("Timestamp", AttributeValue::S(timestamp))
            .send()
            .await
            .map_err(|e| StoreError::service("dynamodb", "put_item", e.into_service_error()))?;
        Ok(())
    }
}
