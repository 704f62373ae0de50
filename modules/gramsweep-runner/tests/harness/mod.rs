//! Scripted in-memory page driver for runner tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use gramsweep_common::Config;
use gramsweep_runner::driver::{DriverError, DriverResult, PageDriver};
use gramsweep_runner::selectors::{
    CHALLENGE_MARKER, FOLLOWING_BUTTON, LOGIN_BUTTON, LOGIN_SUBMIT, POST_LOGIN_MARKER,
    UNFOLLOW_CONFIRM, UNFOLLOW_DIALOG,
};
use webdriver_client::{Cookie, Locator};

/// How the fake behaves on one profile page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageBehavior {
    /// "Following" control present; the unfollow flow works.
    Following,
    /// Page loads but shows no relationship control.
    Unreachable,
    /// Navigation to this page fails outright.
    NavError,
    /// Visiting this page drops the session (login wall reappears).
    DropsSession,
}

#[derive(Default)]
struct State {
    current: String,
    logged_in: bool,
    pages: HashMap<String, PageBehavior>,
    actions: Vec<String>,
    unfollowed: Vec<String>,
}

pub struct FakeDriver {
    state: Mutex<State>,
    login_works: bool,
    challenge_visible: bool,
    stale_cookies: bool,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            login_works: true,
            challenge_visible: false,
            stale_cookies: false,
        }
    }

    /// Credentials are rejected: the post-login marker never appears.
    pub fn refuse_login() -> Self {
        Self {
            login_works: false,
            ..Self::new()
        }
    }

    /// Login fails behind a visible challenge interstitial.
    pub fn with_challenge() -> Self {
        Self {
            login_works: false,
            challenge_visible: true,
            ..Self::new()
        }
    }

    /// Persisted cookies install but no longer authenticate.
    pub fn stale_cookies() -> Self {
        Self {
            stale_cookies: true,
            ..Self::new()
        }
    }

    pub fn set_page(&self, url: &str, behavior: PageBehavior) {
        self.state
            .lock()
            .unwrap()
            .pages
            .insert(url.to_string(), behavior);
    }

    /// Whether the login form was ever submitted.
    pub fn submitted_login(&self) -> bool {
        let expected = format!("click:{LOGIN_SUBMIT}");
        self.state.lock().unwrap().actions.iter().any(|a| a == &expected)
    }

    pub fn unfollowed(&self) -> Vec<String> {
        self.state.lock().unwrap().unfollowed.clone()
    }

    fn behavior_of(&self, url: &str) -> Option<PageBehavior> {
        self.state.lock().unwrap().pages.get(url).copied()
    }

    fn current_behavior(&self) -> Option<PageBehavior> {
        let state = self.state.lock().unwrap();
        state.pages.get(&state.current).copied()
    }
}

pub fn session_cookie() -> Cookie {
    Cookie {
        name: "sessionid".to_string(),
        value: "fake-session".to_string(),
        domain: Some(".instagram.com".to_string()),
        path: Some("/".to_string()),
        secure: Some(true),
        http_only: Some(true),
        expiry: Some(1_900_000_000),
        same_site: Some("Lax".to_string()),
    }
}

pub fn test_config(cap: usize) -> Config {
    Config {
        queue_table: "instagram_unfollowers".to_string(),
        outcome_table: "last_updated".to_string(),
        session_bucket: "state".to_string(),
        session_key: "InstagramAutomation/cookies.json".to_string(),
        account_handle: "testacct".to_string(),
        credentials_secret: "instagram_main".to_string(),
        webdriver_url: "http://localhost:9515".to_string(),
        headless: true,
        slowdown_ms: 0,
        drain_cap: cap,
        run_deadline_secs: None,
        runner_job: "InstagramAutomation".to_string(),
        differ_job: "InstagramRawProcessor".to_string(),
    }
}

#[async_trait]
impl PageDriver for FakeDriver {
    async fn goto(&self, url: &str) -> DriverResult<()> {
        {
            let mut state = self.state.lock().unwrap();
            state.actions.push(format!("goto:{url}"));
        }
        match self.behavior_of(url) {
            Some(PageBehavior::NavError) => {
                return Err(DriverError::Other(anyhow::anyhow!(
                    "net::ERR_NAME_NOT_RESOLVED"
                )))
            }
            Some(PageBehavior::DropsSession) => {
                self.state.lock().unwrap().logged_in = false;
            }
            _ => {}
        }
        self.state.lock().unwrap().current = url.to_string();
        Ok(())
    }

    async fn fill(&self, locator: Locator, _text: &str) -> DriverResult<()> {
        self.state
            .lock()
            .unwrap()
            .actions
            .push(format!("fill:{locator}"));
        Ok(())
    }

    async fn click(&self, locator: Locator, _timeout: Duration) -> DriverResult<()> {
        self.state
            .lock()
            .unwrap()
            .actions
            .push(format!("click:{locator}"));

        if locator == LOGIN_SUBMIT {
            if self.login_works {
                self.state.lock().unwrap().logged_in = true;
            }
            return Ok(());
        }

        if locator == FOLLOWING_BUTTON {
            return match self.current_behavior() {
                Some(PageBehavior::Following) => Ok(()),
                _ => Err(DriverError::Timeout(locator.to_string())),
            };
        }

        if locator == UNFOLLOW_CONFIRM {
            let mut state = self.state.lock().unwrap();
            if state.pages.get(&state.current).copied() == Some(PageBehavior::Following) {
                let current = state.current.clone();
                state.unfollowed.push(current);
                return Ok(());
            }
            return Err(DriverError::Timeout(locator.to_string()));
        }

        Ok(())
    }

    async fn wait_for(&self, locator: Locator, _timeout: Duration) -> DriverResult<()> {
        if locator == POST_LOGIN_MARKER {
            return if self.state.lock().unwrap().logged_in {
                Ok(())
            } else {
                Err(DriverError::Timeout(locator.to_string()))
            };
        }

        if locator == FOLLOWING_BUTTON || locator == UNFOLLOW_DIALOG {
            let logged_in = self.state.lock().unwrap().logged_in;
            return if logged_in && self.current_behavior() == Some(PageBehavior::Following) {
                Ok(())
            } else {
                Err(DriverError::Timeout(locator.to_string()))
            };
        }

        Err(DriverError::Timeout(locator.to_string()))
    }

    async fn is_visible(&self, locator: Locator) -> DriverResult<bool> {
        if locator == LOGIN_BUTTON {
            return Ok(!self.state.lock().unwrap().logged_in);
        }
        if locator == CHALLENGE_MARKER {
            return Ok(self.challenge_visible);
        }
        Ok(false)
    }

    async fn cookies(&self) -> DriverResult<Vec<Cookie>> {
        Ok(vec![session_cookie()])
    }

    async fn add_cookies(&self, _cookies: &[Cookie]) -> DriverResult<()> {
        let mut state = self.state.lock().unwrap();
        state.actions.push("add_cookies".to_string());
        if !self.stale_cookies {
            state.logged_in = true;
        }
        Ok(())
    }
}
