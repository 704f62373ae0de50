use std::env;

/// Origin the account lives on. Cookies are scoped to this domain.
pub const INSTAGRAM_ORIGIN: &str = "https://www.instagram.com/";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Stores
    pub queue_table: String,
    pub outcome_table: String,
    pub session_bucket: String,
    pub session_key: String,

    // Account
    pub account_handle: String,
    pub credentials_secret: String,

    // Page driver
    pub webdriver_url: String,
    pub headless: bool,
    pub slowdown_ms: u64,

    // Drain policy
    pub drain_cap: usize,
    pub run_deadline_secs: Option<u64>,

    // Outcome log keys
    pub runner_job: String,
    pub differ_job: String,
}

impl Config {
    /// Full configuration for the unfollow runner.
    /// Panics with a clear message if required vars are missing.
    pub fn runner_from_env() -> Self {
        Self {
            queue_table: env_or("QUEUE_TABLE", "instagram_unfollowers"),
            outcome_table: env_or("OUTCOME_TABLE", "last_updated"),
            session_bucket: required_env("SESSION_BUCKET"),
            session_key: env_or("SESSION_KEY", "InstagramAutomation/cookies.json"),
            account_handle: required_env("ACCOUNT_HANDLE"),
            credentials_secret: env_or("CREDENTIALS_SECRET", "instagram_main"),
            webdriver_url: env_or("WEBDRIVER_URL", "http://localhost:9515"),
            headless: env_or("HEADLESS", "true")
                .parse()
                .expect("HEADLESS must be true or false"),
            slowdown_ms: env_or("SLOWDOWN_MS", "300")
                .parse()
                .expect("SLOWDOWN_MS must be a number"),
            drain_cap: env_or("DRAIN_CAP", "30")
                .parse()
                .expect("DRAIN_CAP must be a number"),
            run_deadline_secs: env::var("RUN_DEADLINE_SECS").ok().map(|v| {
                v.parse().expect("RUN_DEADLINE_SECS must be a number")
            }),
            runner_job: env_or("RUNNER_JOB", "InstagramAutomation"),
            differ_job: env_or("DIFFER_JOB", "InstagramRawProcessor"),
        }
    }

    /// Minimal configuration for the archive differ (stores and job identity
    /// only — no browser or account vars required).
    pub fn differ_from_env() -> Self {
        Self {
            queue_table: env_or("QUEUE_TABLE", "instagram_unfollowers"),
            outcome_table: env_or("OUTCOME_TABLE", "last_updated"),
            session_bucket: String::new(),
            session_key: String::new(),
            account_handle: String::new(),
            credentials_secret: String::new(),
            webdriver_url: String::new(),
            headless: true,
            slowdown_ms: 0,
            drain_cap: 0,
            run_deadline_secs: None,
            runner_job: env_or("RUNNER_JOB", "InstagramAutomation"),
            differ_job: env_or("DIFFER_JOB", "InstagramRawProcessor"),
        }
    }

    /// The account's own profile page.
    pub fn profile_url(&self) -> String {
        format!("{INSTAGRAM_ORIGIN}{}/", self.account_handle)
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
