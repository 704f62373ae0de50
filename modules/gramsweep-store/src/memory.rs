//! In-memory store doubles for tests. Semantics mirror the AWS impls:
//! idempotent puts and deletes, page-capped scans with continuation keys.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use gramsweep_common::{RunResult, UnfollowCandidate};
use webdriver_client::Cookie;

use crate::error::{Result, StoreError};
use crate::object::ObjectStore;
use crate::outcome::OutcomeLog;
use crate::queue::{CandidateQueue, ScanPage};
use crate::secrets::{CredentialSource, Credentials};
use crate::session::{SessionLoad, SessionStore};

// ---------------------------------------------------------------------------
// Queue
// ---------------------------------------------------------------------------

/// BTreeMap-backed queue; ordered iteration makes scans deterministic.
#[derive(Default)]
pub struct MemoryQueue {
    rows: Mutex<BTreeMap<String, UnfollowCandidate>>,
    /// When set, scans return at most this many rows per page regardless of
    /// the requested limit, the way DynamoDB truncates pages.
    max_page: Option<usize>,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_page(max_page: usize) -> Self {
        Self {
            rows: Mutex::new(BTreeMap::new()),
            max_page: Some(max_page),
        }
    }

    pub fn seed(&self, profile_link: &str) {
        self.rows.lock().unwrap().insert(
            profile_link.to_string(),
            UnfollowCandidate::new(profile_link),
        );
    }

    pub fn links(&self) -> Vec<String> {
        self.rows.lock().unwrap().keys().cloned().collect()
    }

    pub fn contains(&self, profile_link: &str) -> bool {
        self.rows.lock().unwrap().contains_key(profile_link)
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CandidateQueue for MemoryQueue {
    async fn put(&self, candidate: &UnfollowCandidate) -> Result<()> {
        self.rows
            .lock()
            .unwrap()
            .insert(candidate.profile_link.clone(), candidate.clone());
        Ok(())
    }

    async fn scan(&self, limit: usize, start: Option<String>) -> Result<ScanPage> {
        let rows = self.rows.lock().unwrap();
        let cap = self.max_page.map_or(limit, |max| limit.min(max));

        let mut items = Vec::new();
        for (key, row) in rows.iter() {
            if let Some(start) = &start {
                if key <= start {
                    continue;
                }
            }
            items.push(row.clone());
            if items.len() == cap {
                break;
            }
        }

        let next = items.last().and_then(|last| {
            rows.keys()
                .any(|key| key > &last.profile_link)
                .then(|| last.profile_link.clone())
        });

        Ok(ScanPage { items, next })
    }

    async fn delete(&self, profile_link: &str) -> Result<()> {
        self.rows.lock().unwrap().remove(profile_link);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Session store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemorySessionStore {
    saved: Mutex<Option<Vec<Cookie>>>,
    corrupt: AtomicBool,
    save_count: AtomicUsize,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a persisted session already in place.
    pub fn with_cookies(cookies: Vec<Cookie>) -> Self {
        Self {
            saved: Mutex::new(Some(cookies)),
            ..Self::default()
        }
    }

    /// Make subsequent loads fail as corrupt state.
    pub fn poison(&self) {
        self.corrupt.store(true, Ordering::SeqCst);
    }

    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn save(&self, cookies: &[Cookie]) -> Result<()> {
        *self.saved.lock().unwrap() = Some(cookies.to_vec());
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn load(&self) -> Result<SessionLoad> {
        if self.corrupt.load(Ordering::SeqCst) {
            return Err(StoreError::CorruptSession(
                "expected value at line 1 column 1".to_string(),
            ));
        }
        match self.saved.lock().unwrap().clone() {
            Some(cookies) => Ok(SessionLoad::Loaded(cookies)),
            None => Ok(SessionLoad::Absent),
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome log
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryOutcomeLog {
    rows: Mutex<BTreeMap<String, RunResult>>,
}

impl MemoryOutcomeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest recorded result for a job key, if any.
    pub fn latest(&self, job: &str) -> Option<RunResult> {
        self.rows.lock().unwrap().get(job).copied()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl OutcomeLog for MemoryOutcomeLog {
    async fn record(&self, job: &str, result: RunResult) -> Result<()> {
        self.rows.lock().unwrap().insert(job.to_string(), result);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

pub struct StaticCredentials {
    credentials: Credentials,
}

impl StaticCredentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            credentials: Credentials {
                username: username.to_string(),
                password: password.to_string(),
            },
        }
    }
}

#[async_trait]
impl CredentialSource for StaticCredentials {
    async fn fetch(&self) -> Result<Credentials> {
        Ok(self.credentials.clone())
    }
}

// ---------------------------------------------------------------------------
// Object store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryObjects {
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
}

impl MemoryObjects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, bucket: &str, key: &str, bytes: Vec<u8>) {
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), bytes);
    }

    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.objects
            .lock()
            .unwrap()
            .contains_key(&(bucket.to_string(), key.to_string()))
    }
}

#[async_trait]
impl ObjectStore for MemoryObjects {
    async fn download(&self, bucket: &str, key: &str, dest: &Path) -> Result<()> {
        let bytes = self
            .objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::service("s3", "get_object", "NoSuchKey"))?;
        tokio::fs::write(dest, bytes).await?;
        Ok(())
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<()> {
        self.objects
            .lock()
            .unwrap()
            .remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }
}
