//! One differ invocation: archive in, queued candidates out.

use gramsweep_common::{RunResult, UnfollowCandidate};
use gramsweep_store::{record_or_warn, CandidateQueue, ObjectStore, OutcomeLog};
use tracing::{info, warn};

use crate::error::{DifferError, Result};
use crate::export::{self, RelationshipSets};
use crate::unpack;

/// Stats from one differ invocation.
#[derive(Debug, Default)]
pub struct DiffStats {
    pub following: usize,
    pub followers: usize,
    pub unfollowers: usize,
    pub queued: usize,
}

impl std::fmt::Display for DiffStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Differ Run Complete ===")?;
        writeln!(f, "Following:   {}", self.following)?;
        writeln!(f, "Followers:   {}", self.followers)?;
        writeln!(f, "Unfollowers: {}", self.unfollowers)?;
        writeln!(f, "Queued:      {}", self.queued)?;
        Ok(())
    }
}

pub struct ArchiveDiffer<'a> {
    objects: &'a dyn ObjectStore,
    queue: &'a dyn CandidateQueue,
    outcomes: &'a dyn OutcomeLog,
    job: &'a str,
}

impl<'a> ArchiveDiffer<'a> {
    pub fn new(
        objects: &'a dyn ObjectStore,
        queue: &'a dyn CandidateQueue,
        outcomes: &'a dyn OutcomeLog,
        job: &'a str,
    ) -> Self {
        Self {
            objects,
            queue,
            outcomes,
            job,
        }
    }

    /// Process one uploaded archive. Every terminal path records an outcome.
    /// The source object is deleted only after everything else succeeded, so
    /// a failed run is replayed by re-invoking with the same reference, and
    /// replay is harmless because queue writes are idempotent.
    pub async fn process(&self, bucket: &str, key: &str) -> Result<DiffStats> {
        match self.process_inner(bucket, key).await {
            Ok(stats) => {
                record_or_warn(self.outcomes, self.job, RunResult::Success).await;
                if let Err(e) = self.objects.delete(bucket, key).await {
                    warn!(bucket, key, error = %e, "Failed to delete processed archive");
                }
                Ok(stats)
            }
            Err(e) => {
                record_or_warn(self.outcomes, self.job, e.outcome()).await;
                Err(e)
            }
        }
    }

    async fn process_inner(&self, bucket: &str, key: &str) -> Result<DiffStats> {
        let scratch = tempfile::tempdir()?;
        let archive_path = scratch.path().join("export.zip");
        let extract_root = scratch.path().join("export");

        self.objects.download(bucket, key, &archive_path).await?;

        let sets = tokio::task::spawn_blocking(move || -> Result<RelationshipSets> {
            unpack::extract(&archive_path, &extract_root)?;
            export::collect_sets(&extract_root)
        })
        .await
        .map_err(|e| DifferError::Io(std::io::Error::other(e)))??;

        let unfollowers = sets.unfollowers();
        info!(
            following = sets.following.len(),
            followers = sets.followers.len(),
            unfollowers = unfollowers.len(),
            "Export diff computed"
        );

        let mut queued = 0;
        for link in &unfollowers {
            self.queue.put(&UnfollowCandidate::new(link.clone())).await?;
            queued += 1;
        }

        Ok(DiffStats {
            following: sets.following.len(),
            followers: sets.followers.len(),
            unfollowers: unfollowers.len(),
            queued,
        })
    }
}
