//! Runner behavior over the scripted driver and in-memory stores.

mod harness;

use gramsweep_common::RunResult;
use gramsweep_runner::Runner;
use gramsweep_store::memory::{
    MemoryOutcomeLog, MemoryQueue, MemorySessionStore, StaticCredentials,
};

use harness::{session_cookie, test_config, FakeDriver, PageBehavior};

const JOB: &str = "InstagramAutomation";

fn profile(name: &str) -> String {
    format!("https://www.instagram.com/{name}/")
}

fn credentials() -> StaticCredentials {
    StaticCredentials::new("testacct", "hunter2")
}

/// Seed `count` candidates that all unfollow cleanly.
fn seed_following(driver: &FakeDriver, queue: &MemoryQueue, count: usize) {
    for i in 0..count {
        let link = profile(&format!("user{i:03}"));
        queue.seed(&link);
        driver.set_page(&link, PageBehavior::Following);
    }
}

#[tokio::test]
async fn drain_is_bounded_by_the_cap() {
    let driver = FakeDriver::new();
    let queue = MemoryQueue::new();
    let sessions = MemorySessionStore::with_cookies(vec![session_cookie()]);
    let creds = credentials();
    let outcomes = MemoryOutcomeLog::new();
    seed_following(&driver, &queue, 40);

    let config = test_config(30);
    let runner = Runner::new(&driver, &queue, &sessions, &creds, &outcomes, &config);
    let stats = runner.run().await.unwrap();

    assert_eq!(stats.attempted, 30);
    assert_eq!(stats.unfollowed, 30);
    assert_eq!(stats.deleted, 30);
    assert_eq!(queue.len(), 10);
    assert_eq!(outcomes.latest(JOB), Some(RunResult::Success));
    assert_eq!(outcomes.len(), 1);
}

#[tokio::test]
async fn small_queue_drains_completely() {
    let driver = FakeDriver::new();
    let queue = MemoryQueue::new();
    let sessions = MemorySessionStore::with_cookies(vec![session_cookie()]);
    let creds = credentials();
    let outcomes = MemoryOutcomeLog::new();
    seed_following(&driver, &queue, 3);

    let config = test_config(30);
    let runner = Runner::new(&driver, &queue, &sessions, &creds, &outcomes, &config);
    let stats = runner.run().await.unwrap();

    assert_eq!(stats.attempted, 3);
    assert!(queue.is_empty());
    assert_eq!(driver.unfollowed().len(), 3);
}

#[tokio::test]
async fn failing_candidate_does_not_abort_the_batch() {
    let driver = FakeDriver::new();
    let queue = MemoryQueue::new();
    let sessions = MemorySessionStore::with_cookies(vec![session_cookie()]);
    let creds = credentials();
    let outcomes = MemoryOutcomeLog::new();
    seed_following(&driver, &queue, 5);
    // Second candidate's profile page refuses to load at all.
    driver.set_page(&profile("user001"), PageBehavior::NavError);

    let config = test_config(30);
    let runner = Runner::new(&driver, &queue, &sessions, &creds, &outcomes, &config);
    let stats = runner.run().await.unwrap();

    assert_eq!(stats.attempted, 5);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.unfollowed, 4);
    // Still authenticated after the failure, so even the failed candidate
    // resolves as deleted.
    assert_eq!(stats.deleted, 5);
    assert!(queue.is_empty());
    assert_eq!(outcomes.latest(JOB), Some(RunResult::Success));
}

#[tokio::test]
async fn unreachable_profile_is_deleted_while_authenticated() {
    let driver = FakeDriver::new();
    let queue = MemoryQueue::new();
    let sessions = MemorySessionStore::with_cookies(vec![session_cookie()]);
    let creds = credentials();
    let outcomes = MemoryOutcomeLog::new();
    let link = profile("ghost");
    queue.seed(&link);
    driver.set_page(&link, PageBehavior::Unreachable);

    let config = test_config(30);
    let runner = Runner::new(&driver, &queue, &sessions, &creds, &outcomes, &config);
    let stats = runner.run().await.unwrap();

    assert_eq!(stats.unreachable, 1);
    assert_eq!(stats.deleted, 1);
    assert!(queue.is_empty());
}

#[tokio::test]
async fn dropped_session_retains_candidates() {
    let driver = FakeDriver::new();
    let queue = MemoryQueue::new();
    let sessions = MemorySessionStore::with_cookies(vec![session_cookie()]);
    let creds = credentials();
    let outcomes = MemoryOutcomeLog::new();
    seed_following(&driver, &queue, 3);
    // First candidate's page kills the session.
    driver.set_page(&profile("user000"), PageBehavior::DropsSession);

    let config = test_config(30);
    let runner = Runner::new(&driver, &queue, &sessions, &creds, &outcomes, &config);
    let stats = runner.run().await.unwrap();

    // Nothing gets deleted once the login wall is back, and the run still
    // completes as a success.
    assert_eq!(stats.attempted, 3);
    assert_eq!(stats.retained, 3);
    assert_eq!(stats.deleted, 0);
    assert_eq!(queue.len(), 3);
    assert_eq!(outcomes.latest(JOB), Some(RunResult::Success));
}

#[tokio::test]
async fn resumed_session_skips_login_submission() {
    let driver = FakeDriver::new();
    let queue = MemoryQueue::new();
    let sessions = MemorySessionStore::with_cookies(vec![session_cookie()]);
    let creds = credentials();
    let outcomes = MemoryOutcomeLog::new();

    let config = test_config(30);
    let runner = Runner::new(&driver, &queue, &sessions, &creds, &outcomes, &config);
    runner.run().await.unwrap();

    assert!(!driver.submitted_login());
    // Resume does not rewrite the persisted session.
    assert_eq!(sessions.save_count(), 0);
}

#[tokio::test]
async fn fresh_login_persists_the_session() {
    let driver = FakeDriver::new();
    let queue = MemoryQueue::new();
    let sessions = MemorySessionStore::new();
    let creds = credentials();
    let outcomes = MemoryOutcomeLog::new();

    let config = test_config(30);
    let runner = Runner::new(&driver, &queue, &sessions, &creds, &outcomes, &config);
    runner.run().await.unwrap();

    assert!(driver.submitted_login());
    assert_eq!(sessions.save_count(), 1);
    assert_eq!(outcomes.latest(JOB), Some(RunResult::Success));
}

#[tokio::test]
async fn corrupt_session_falls_back_to_fresh_login() {
    let driver = FakeDriver::new();
    let queue = MemoryQueue::new();
    let sessions = MemorySessionStore::new();
    sessions.poison();
    let creds = credentials();
    let outcomes = MemoryOutcomeLog::new();

    let config = test_config(30);
    let runner = Runner::new(&driver, &queue, &sessions, &creds, &outcomes, &config);
    runner.run().await.unwrap();

    assert!(driver.submitted_login());
    assert_eq!(outcomes.latest(JOB), Some(RunResult::Success));
}

#[tokio::test]
async fn stale_cookies_still_reach_the_login_path() {
    let driver = FakeDriver::stale_cookies();
    let queue = MemoryQueue::new();
    let sessions = MemorySessionStore::with_cookies(vec![session_cookie()]);
    let creds = credentials();
    let outcomes = MemoryOutcomeLog::new();

    let config = test_config(30);
    let runner = Runner::new(&driver, &queue, &sessions, &creds, &outcomes, &config);
    runner.run().await.unwrap();

    assert!(driver.submitted_login());
    assert_eq!(outcomes.latest(JOB), Some(RunResult::Success));
}

#[tokio::test]
async fn login_timeout_records_outcome_and_fails() {
    let driver = FakeDriver::refuse_login();
    let queue = MemoryQueue::new();
    let sessions = MemorySessionStore::new();
    let creds = credentials();
    let outcomes = MemoryOutcomeLog::new();
    seed_following(&driver, &queue, 2);

    let config = test_config(30);
    let runner = Runner::new(&driver, &queue, &sessions, &creds, &outcomes, &config);
    let err = runner.run().await.unwrap_err();

    assert!(err.to_string().contains("Login timed out"));
    assert_eq!(outcomes.latest(JOB), Some(RunResult::LoginTimeout));
    assert_eq!(outcomes.len(), 1);
    // Queue untouched for the next run.
    assert_eq!(queue.len(), 2);
}

#[tokio::test]
async fn challenge_page_classifies_as_blocked() {
    let driver = FakeDriver::with_challenge();
    let queue = MemoryQueue::new();
    let sessions = MemorySessionStore::new();
    let creds = credentials();
    let outcomes = MemoryOutcomeLog::new();

    let config = test_config(30);
    let runner = Runner::new(&driver, &queue, &sessions, &creds, &outcomes, &config);
    let err = runner.run().await.unwrap_err();

    assert!(err.to_string().contains("blocked"));
    assert_eq!(outcomes.latest(JOB), Some(RunResult::Blocked));
}

#[tokio::test]
async fn deadline_stops_the_drain_between_candidates() {
    let driver = FakeDriver::new();
    let queue = MemoryQueue::new();
    let sessions = MemorySessionStore::with_cookies(vec![session_cookie()]);
    let creds = credentials();
    let outcomes = MemoryOutcomeLog::new();
    seed_following(&driver, &queue, 5);

    let mut config = test_config(30);
    config.run_deadline_secs = Some(0);
    let runner = Runner::new(&driver, &queue, &sessions, &creds, &outcomes, &config);
    let stats = runner.run().await.unwrap();

    assert!(stats.deadline_hit);
    assert_eq!(stats.attempted, 0);
    assert_eq!(queue.len(), 5);
    assert_eq!(outcomes.latest(JOB), Some(RunResult::DeadlineReached));
}
