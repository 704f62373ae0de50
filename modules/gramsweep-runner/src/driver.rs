//! Seam between the runner and the browser.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use webdriver_client::{Cookie, Locator, Session, WebDriverError};

/// Errors the drain loop steers on. Timeouts are control flow — a control
/// that never appears selects a branch — while everything else is opaque.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Timed out waiting for {0}")]
    Timeout(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// The page operations the runner needs from a browser.
#[async_trait]
pub trait PageDriver: Send + Sync {
    async fn goto(&self, url: &str) -> DriverResult<()>;
    async fn fill(&self, locator: Locator, text: &str) -> DriverResult<()>;
    async fn click(&self, locator: Locator, timeout: Duration) -> DriverResult<()>;
    async fn wait_for(&self, locator: Locator, timeout: Duration) -> DriverResult<()>;
    async fn is_visible(&self, locator: Locator) -> DriverResult<bool>;
    async fn cookies(&self) -> DriverResult<Vec<Cookie>>;
    async fn add_cookies(&self, cookies: &[Cookie]) -> DriverResult<()>;
}

/// Production driver backed by a live WebDriver session.
pub struct WebDriverPage {
    session: Session,
}

impl WebDriverPage {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// End the underlying browser session.
    pub async fn close(self) -> webdriver_client::Result<()> {
        self.session.close().await
    }
}

fn convert(err: WebDriverError) -> DriverError {
    match err {
        WebDriverError::Timeout { ref locator, .. } => DriverError::Timeout(locator.clone()),
        other => DriverError::Other(anyhow::Error::new(other)),
    }
}

#[async_trait]
impl PageDriver for WebDriverPage {
    async fn goto(&self, url: &str) -> DriverResult<()> {
        self.session.goto(url).await.map_err(convert)
    }

    async fn fill(&self, locator: Locator, text: &str) -> DriverResult<()> {
        self.session.fill(&locator, text).await.map_err(convert)
    }

    async fn click(&self, locator: Locator, timeout: Duration) -> DriverResult<()> {
        self.session.click(&locator, timeout).await.map_err(convert)
    }

    async fn wait_for(&self, locator: Locator, timeout: Duration) -> DriverResult<()> {
        self.session
            .wait_for(&locator, timeout)
            .await
            .map(|_| ())
            .map_err(convert)
    }

    async fn is_visible(&self, locator: Locator) -> DriverResult<bool> {
        self.session.is_visible(&locator).await.map_err(convert)
    }

    async fn cookies(&self) -> DriverResult<Vec<Cookie>> {
        self.session.cookies().await.map_err(convert)
    }

    async fn add_cookies(&self, cookies: &[Cookie]) -> DriverResult<()> {
        self.session.add_cookies(cookies).await.map_err(convert)
    }
}
