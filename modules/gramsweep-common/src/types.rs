use serde::{Deserialize, Serialize};

/// One queued unfollow target, keyed by canonical profile URL.
///
/// Presence in the queue means "believed not to follow back, not yet
/// confirmed resolved". The runner deletes a row once the unfollow landed or
/// the profile proved unreachable while still authenticated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnfollowCandidate {
    pub profile_link: String,
}

impl UnfollowCandidate {
    pub fn new(profile_link: impl Into<String>) -> Self {
        Self {
            profile_link: profile_link.into(),
        }
    }
}

/// Terminal status of one job invocation, as written to the outcome log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunResult {
    Success,
    /// Drain stopped cleanly at the run deadline before the cap was reached.
    DeadlineReached,
    /// Post-login marker never appeared and no block signal was visible.
    LoginTimeout,
    /// Challenge/block page detected, or the login path failed outright.
    Blocked,
    /// Archive is unreadable or missing the expected export folder.
    ArchiveLayout,
    /// An export file exists but does not parse.
    ExportParse,
    /// A queue or object-store operation failed.
    StorageFailure,
}

impl RunResult {
    /// Fixed wire string stored in the outcome row's `Result` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            RunResult::Success => "Success",
            RunResult::DeadlineReached => "Partial - Deadline Reached",
            RunResult::LoginTimeout => "Unsuccessful - Login Timeout",
            RunResult::Blocked => "Unsuccessful - Blocked",
            RunResult::ArchiveLayout => "Unsuccessful - Archive Layout",
            RunResult::ExportParse => "Unsuccessful - Export Parse",
            RunResult::StorageFailure => "Unsuccessful - Storage Failure",
        }
    }

    /// Whether this outcome maps to a zero exit status.
    pub fn is_success(&self) -> bool {
        matches!(self, RunResult::Success | RunResult::DeadlineReached)
    }
}

impl std::fmt::Display for RunResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
