//! Run orchestration: authenticate, drain, record the outcome.

use std::time::Duration;

use anyhow::Result;
use gramsweep_common::{Config, RunResult};
use gramsweep_store::{
    record_or_warn, CandidateQueue, CredentialSource, OutcomeLog, SessionStore,
};
use tokio::time::Instant;

use crate::auth::{AuthOutcome, Authenticator};
use crate::drain::{DrainStats, Drainer};
use crate::driver::PageDriver;

pub struct Runner<'a> {
    driver: &'a dyn PageDriver,
    queue: &'a dyn CandidateQueue,
    sessions: &'a dyn SessionStore,
    credentials: &'a dyn CredentialSource,
    outcomes: &'a dyn OutcomeLog,
    config: &'a Config,
}

impl<'a> Runner<'a> {
    pub fn new(
        driver: &'a dyn PageDriver,
        queue: &'a dyn CandidateQueue,
        sessions: &'a dyn SessionStore,
        credentials: &'a dyn CredentialSource,
        outcomes: &'a dyn OutcomeLog,
        config: &'a Config,
    ) -> Self {
        Self {
            driver,
            queue,
            sessions,
            credentials,
            outcomes,
            config,
        }
    }

    /// One full run. Every terminal path records an outcome before the
    /// error carries the failure out to the process exit status.
    pub async fn run(&self) -> Result<DrainStats> {
        let job = &self.config.runner_job;
        let auth = Authenticator::new(
            self.driver,
            self.sessions,
            self.credentials,
            self.config.profile_url(),
        );

        let outcome = match auth.authenticate().await {
            Ok(outcome) => outcome,
            Err(e) => {
                // Driver died before authentication resolved either way.
                record_or_warn(self.outcomes, job, RunResult::Blocked).await;
                return Err(anyhow::Error::new(e).context("Authentication never resolved"));
            }
        };

        match outcome {
            AuthOutcome::Authenticated { .. } => {}
            AuthOutcome::LoginTimeout => {
                record_or_warn(self.outcomes, job, RunResult::LoginTimeout).await;
                anyhow::bail!("Login timed out waiting for the post-login marker");
            }
            AuthOutcome::Blocked => {
                record_or_warn(self.outcomes, job, RunResult::Blocked).await;
                anyhow::bail!("Login appears blocked");
            }
        }

        let deadline = self
            .config
            .run_deadline_secs
            .map(|secs| Instant::now() + Duration::from_secs(secs));
        let drainer = Drainer::new(self.driver, self.queue, self.config.drain_cap, deadline);

        let stats = match drainer.drain().await {
            Ok(stats) => stats,
            Err(e) => {
                record_or_warn(self.outcomes, job, RunResult::StorageFailure).await;
                return Err(e.context("Drain aborted"));
            }
        };

        let result = if stats.deadline_hit {
            RunResult::DeadlineReached
        } else {
            RunResult::Success
        };
        record_or_warn(self.outcomes, job, result).await;

        Ok(stats)
    }
}
