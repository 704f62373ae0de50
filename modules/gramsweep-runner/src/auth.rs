//! Login-or-resume: restore persisted cookies when they still hold, submit
//! credentials when they don't.

use gramsweep_common::INSTAGRAM_ORIGIN;
use gramsweep_store::{CredentialSource, SessionLoad, SessionStore};
use tracing::{info, warn};

use crate::driver::{DriverError, DriverResult, PageDriver};
use crate::selectors::{
    ACTION_WAIT, CHALLENGE_MARKER, LOGIN_BUTTON, LOGIN_SUBMIT, LOGIN_WAIT, PASSWORD_INPUT,
    POST_LOGIN_MARKER, USERNAME_INPUT,
};

/// Where authentication landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Session is live; `resumed` is false when a fresh login was needed.
    Authenticated { resumed: bool },
    /// Post-login marker never appeared and no block signal was visible.
    LoginTimeout,
    /// Challenge/block page detected, or the login path failed outright.
    Blocked,
}

pub struct Authenticator<'a> {
    driver: &'a dyn PageDriver,
    sessions: &'a dyn SessionStore,
    credentials: &'a dyn CredentialSource,
    profile_url: String,
}

impl<'a> Authenticator<'a> {
    pub fn new(
        driver: &'a dyn PageDriver,
        sessions: &'a dyn SessionStore,
        credentials: &'a dyn CredentialSource,
        profile_url: String,
    ) -> Self {
        Self {
            driver,
            sessions,
            credentials,
            profile_url,
        }
    }

    /// Resume a persisted session or log in fresh. Driver failures before
    /// the login interaction starts propagate; failures inside it classify
    /// per the outcome taxonomy.
    pub async fn authenticate(&self) -> DriverResult<AuthOutcome> {
        let resumed = self.restore_session().await?;

        self.driver.goto(&self.profile_url).await?;

        if !self.driver.is_visible(LOGIN_BUTTON).await? {
            info!(resumed, "Session authenticated without login");
            return Ok(AuthOutcome::Authenticated { resumed });
        }

        info!("Login control visible; submitting credentials");
        match self.login().await {
            Ok(()) => Ok(AuthOutcome::Authenticated { resumed: false }),
            Err(DriverError::Timeout(locator)) => {
                warn!(locator = %locator, "Post-login marker did not appear");
                // A visible challenge page pins the timeout as a block;
                // otherwise credentials-vs-block stays undecidable.
                match self.driver.is_visible(CHALLENGE_MARKER).await {
                    Ok(true) => Ok(AuthOutcome::Blocked),
                    _ => Ok(AuthOutcome::LoginTimeout),
                }
            }
            Err(DriverError::Other(e)) => {
                warn!(error = %e, "Login interaction failed");
                Ok(AuthOutcome::Blocked)
            }
        }
    }

    /// Install persisted cookies, if any. Returns whether cookies went in.
    async fn restore_session(&self) -> DriverResult<bool> {
        let cookies = match self.sessions.load().await {
            Ok(SessionLoad::Loaded(cookies)) => cookies,
            Ok(SessionLoad::Absent) => {
                info!("No persisted session; will log in fresh if needed");
                return Ok(false);
            }
            Err(e) => {
                warn!(error = %e, "Persisted session unusable; falling back to fresh login");
                return Ok(false);
            }
        };

        // Cookies can only be installed for the active document's domain.
        self.driver.goto(INSTAGRAM_ORIGIN).await?;
        self.driver.add_cookies(&cookies).await?;
        info!(count = cookies.len(), "Persisted session cookies installed");
        Ok(true)
    }

    async fn login(&self) -> DriverResult<()> {
        let creds = self
            .credentials
            .fetch()
            .await
            .map_err(|e| DriverError::Other(e.into()))?;

        self.driver.fill(USERNAME_INPUT, &creds.username).await?;
        self.driver.fill(PASSWORD_INPUT, &creds.password).await?;
        self.driver.click(LOGIN_SUBMIT, ACTION_WAIT).await?;

        self.driver.wait_for(POST_LOGIN_MARKER, LOGIN_WAIT).await?;
        self.driver.goto(&self.profile_url).await?;
        info!("Fresh login successful");

        // Best-effort: login already succeeded, a failed save only costs
        // the next run a fresh login.
        match self.driver.cookies().await {
            Ok(cookies) => {
                if let Err(e) = self.sessions.save(&cookies).await {
                    warn!(error = %e, "Failed to persist session cookies");
                }
            }
            Err(e) => warn!(error = %e, "Failed to read session cookies"),
        }

        Ok(())
    }
}
