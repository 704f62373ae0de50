use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use gramsweep_common::UnfollowCandidate;

use crate::error::{Result, StoreError};

/// Row attribute holding the candidate key.
const KEY_ATTR: &str = "profile_link";

/// One page of a candidate scan.
#[derive(Debug, Default)]
pub struct ScanPage {
    pub items: Vec<UnfollowCandidate>,
    /// Key to resume from when more rows remain.
    pub next: Option<String>,
}

/// Durable queue of pending unfollow targets, keyed by profile link.
#[async_trait]
pub trait CandidateQueue: Send + Sync {
    /// Insert a candidate. Writing an existing key is a no-op overwrite.
    async fn put(&self, candidate: &UnfollowCandidate) -> Result<()>;

    /// Fetch up to `limit` candidates, resuming after `start`. The store may
    /// return fewer than `limit` with a continuation key.
    async fn scan(&self, limit: usize, start: Option<String>) -> Result<ScanPage>;

    /// Remove a candidate. Deleting an absent key succeeds.
    async fn delete(&self, profile_link: &str) -> Result<()>;
}

/// Collect up to `n` candidates from the front of the queue, following
/// continuation keys across pages.
pub async fn first_n(queue: &dyn CandidateQueue, n: usize) -> Result<Vec<UnfollowCandidate>> {
    let mut items = Vec::new();
    let mut start = None;
    while items.len() < n {
        let page = queue.scan(n - items.len(), start).await?;
        items.extend(page.items);
        match page.next {
            Some(next) => start = Some(next),
            None => break,
        }
    }
    items.truncate(n);
    Ok(items)
}

/// DynamoDB-backed queue. The table's partition key is `profile_link`.
pub struct DynamoCandidateQueue {
    client: aws_sdk_dynamodb::Client,
    table: String,
}

impl DynamoCandidateQueue {
    pub fn new(client: aws_sdk_dynamodb::Client, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }
}

#[async_trait]
impl CandidateQueue for DynamoCandidateQueue {
    async fn put(&self, candidate: &UnfollowCandidate) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table)
            .item(KEY_ATTR, AttributeValue::S(candidate.profile_link.clone()))
            .send()
            .await
            .map_err(|e| StoreError::service("dynamodb", "put_item", e.into_service_error()))?;
        Ok(())
    }

    async fn scan(&self, limit: usize, start: Option<String>) -> Result<ScanPage> {
        let mut request = self
            .client
            .scan()
            .table_name(&self.table)
            .limit(limit.min(i32::MAX as usize) as i32);
        if let Some(start) = start {
            request = request.exclusive_start_key(KEY_ATTR, AttributeValue::S(start));
        }

        let output = request
            .send()
            .await
            .map_err(|e| StoreError::service("dynamodb", "scan", e.into_service_error()))?;

        let items = output
            .items()
            .iter()
            .filter_map(|row| row.get(KEY_ATTR).and_then(|v| v.as_s().ok()))
            .map(|link| UnfollowCandidate::new(link.clone()))
            .collect();
        let next = output
            .last_evaluated_key()
            .and_then(|key| key.get(KEY_ATTR))
            .and_then(|v| v.as_s().ok())
            .cloned();

        Ok(ScanPage { items, next })
    }

    async fn delete(&self, profile_link: &str) -> Result<()> {
        self.client
            .delete_item()
            .table_name(&self.table)
            .key(KEY_ATTR, AttributeValue::S(profile_link.to_string()))
            .send()
            .await
            .map_err(|e| StoreError::service("dynamodb", "delete_item", e.into_service_error()))?;
        Ok(())
    }
}
