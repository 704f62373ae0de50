//! Bounded drain of the unfollow queue.

use anyhow::{Context, Result};
use gramsweep_common::UnfollowCandidate;
use gramsweep_store::{first_n, CandidateQueue};
use tokio::time::Instant;
use tracing::{info, warn};

use crate::driver::{DriverError, DriverResult, PageDriver};
use crate::selectors::{
    ACTION_WAIT, FOLLOWING_BUTTON, LOGIN_BUTTON, UNFOLLOW_CONFIRM, UNFOLLOW_DIALOG,
};

/// Stats from one drain.
#[derive(Debug, Default)]
pub struct DrainStats {
    pub attempted: u32,
    pub unfollowed: u32,
    pub unreachable: u32,
    pub deleted: u32,
    pub retained: u32,
    pub failed: u32,
    pub deadline_hit: bool,
}

impl std::fmt::Display for DrainStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Drain Complete ===")?;
        writeln!(f, "Attempted:   {}", self.attempted)?;
        writeln!(f, "Unfollowed:  {}", self.unfollowed)?;
        writeln!(f, "Unreachable: {}", self.unreachable)?;
        writeln!(f, "Deleted:     {}", self.deleted)?;
        writeln!(f, "Retained:    {}", self.retained)?;
        writeln!(f, "Failed:      {}", self.failed)?;
        if self.deadline_hit {
            writeln!(f, "Stopped at the run deadline")?;
        }
        Ok(())
    }
}

/// What happened on one profile page.
enum Attempt {
    Unfollowed,
    /// Profile unreachable, or no relationship control to act on.
    NotFollowing,
}

pub struct Drainer<'a> {
    driver: &'a dyn PageDriver,
    queue: &'a dyn CandidateQueue,
    cap: usize,
    deadline: Option<Instant>,
}

impl<'a> Drainer<'a> {
    pub fn new(
        driver: &'a dyn PageDriver,
        queue: &'a dyn CandidateQueue,
        cap: usize,
        deadline: Option<Instant>,
    ) -> Self {
        Self {
            driver,
            queue,
            cap,
            deadline,
        }
    }

    /// Process up to `cap` queued candidates. A candidate is deleted once
    /// resolved while the session still looks authenticated; failures and
    /// dropped sessions leave it queued for the next run.
    pub async fn drain(&self) -> Result<DrainStats> {
        let mut stats = DrainStats::default();

        let candidates = first_n(self.queue, self.cap)
            .await
            .context("Failed to scan the unfollow queue")?;
        info!(count = candidates.len(), cap = self.cap, "Draining unfollow queue");

        for candidate in &candidates {
            if let Some(deadline) = self.deadline {
                // Checked only between candidates; an in-flight candidate
                // always runs to its own resolution.
                if Instant::now() >= deadline {
                    warn!(attempted = stats.attempted, "Run deadline reached; stopping drain");
                    stats.deadline_hit = true;
                    break;
                }
            }
            self.process(candidate, &mut stats).await;
        }

        Ok(stats)
    }

    async fn process(&self, candidate: &UnfollowCandidate, stats: &mut DrainStats) {
        let link = candidate.profile_link.as_str();
        stats.attempted += 1;

        match self.unfollow(link).await {
            Ok(Attempt::Unfollowed) => {
                info!(link, "Unfollowed");
                stats.unfollowed += 1;
            }
            Ok(Attempt::NotFollowing) => {
                info!(link, "No relationship control; treating as resolved");
                stats.unreachable += 1;
            }
            Err(e) => {
                warn!(link, error = %e, "Candidate could not be processed");
                stats.failed += 1;
            }
        }

        // Delete only while the session still looks authenticated. With the
        // session dropped, "unreachable" means nothing — the candidate stays
        // queued for the next run instead of being lost.
        match self.driver.is_visible(LOGIN_BUTTON).await {
            Ok(false) => match self.queue.delete(link).await {
                Ok(()) => stats.deleted += 1,
                Err(e) => {
                    warn!(link, error = %e, "Failed to delete candidate");
                    stats.retained += 1;
                }
            },
            Ok(true) => {
                warn!(link, "Login control visible; retaining candidate");
                stats.retained += 1;
            }
            Err(e) => {
                warn!(link, error = %e, "Could not confirm session state; retaining candidate");
                stats.retained += 1;
            }
        }
    }

    async fn unfollow(&self, link: &str) -> DriverResult<Attempt> {
        self.driver.goto(link).await?;

        match self.driver.wait_for(FOLLOWING_BUTTON, ACTION_WAIT).await {
            Ok(()) => {}
            Err(DriverError::Timeout(_)) => return Ok(Attempt::NotFollowing),
            Err(e) => return Err(e),
        }

        self.driver.click(FOLLOWING_BUTTON, ACTION_WAIT).await?;

        // The confirmation dialog is sometimes skipped entirely (already
        // unfollowed, UI variant); its absence is not a failure.
        match self.driver.wait_for(UNFOLLOW_DIALOG, ACTION_WAIT).await {
            Ok(()) => match self.driver.click(UNFOLLOW_CONFIRM, ACTION_WAIT).await {
                Ok(()) | Err(DriverError::Timeout(_)) => {}
                Err(e) => return Err(e),
            },
            Err(DriverError::Timeout(_)) => {}
            Err(e) => return Err(e),
        }

        Ok(Attempt::Unfollowed)
    }
}
