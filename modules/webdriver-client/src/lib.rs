pub mod error;
pub mod types;

pub use error::{Result, WebDriverError};
pub use types::{Cookie, Locator, SessionOptions};

use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// W3C element identifier key in find-element responses.
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// How often `wait_for` re-probes the page.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Client for a W3C WebDriver remote end (chromedriver, Selenium, etc).
pub struct WebDriver {
    client: reqwest::Client,
    base_url: String,
}

impl WebDriver {
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Open a new browser session.
    pub async fn start_session(&self, opts: &SessionOptions) -> Result<Session> {
        let mut args = vec![
            "--no-sandbox".to_string(),
            "--disable-gpu".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--window-size=1280,1024".to_string(),
        ];
        if opts.headless {
            args.push("--headless=new".to_string());
        }

        let body = json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": args }
                }
            }
        });

        let value: NewSessionValue = execute(
            &self.client,
            &self.base_url,
            Method::POST,
            "/session",
            Some(&body),
        )
        .await?;

        debug!(session_id = %value.session_id, "Browser session started");

        Ok(Session {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            id: value.session_id,
            slowdown: opts.slowdown,
        })
    }
}

/// One live browser session. All page operations go through here.
pub struct Session {
    client: reqwest::Client,
    base_url: String,
    id: String,
    slowdown: Option<Duration>,
}

impl Session {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub async fn goto(&self, url: &str) -> Result<()> {
        debug!(url, "Navigating");
        let _: serde_json::Value = self
            .command(Method::POST, "/url", Some(&json!({ "url": url })))
            .await?;
        self.pause().await;
        Ok(())
    }

    /// Whether an element matching `locator` exists and is displayed.
    /// A missing element is `false`, not an error.
    pub async fn is_visible(&self, locator: &Locator) -> Result<bool> {
        let element = match self.find(locator).await {
            Ok(id) => id,
            Err(e) if e.is_no_such_element() => return Ok(false),
            Err(e) => return Err(e),
        };
        self.command(Method::GET, &format!("/element/{element}/displayed"), None)
            .await
    }

    /// Poll for an element until it appears or `timeout` expires.
    pub async fn wait_for(&self, locator: &Locator, timeout: Duration) -> Result<String> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            match self.find(locator).await {
                Ok(id) => return Ok(id),
                Err(e) if e.is_no_such_element() => {}
                Err(e) => return Err(e),
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(WebDriverError::Timeout {
                    locator: locator.to_string(),
                    timeout_ms: timeout.as_millis() as u64,
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Wait for an element, then click it.
    pub async fn click(&self, locator: &Locator, timeout: Duration) -> Result<()> {
        let element = self.wait_for(locator, timeout).await?;
        let _: serde_json::Value = self
            .command(
                Method::POST,
                &format!("/element/{element}/click"),
                Some(&json!({})),
            )
            .await?;
        self.pause().await;
        Ok(())
    }

    /// Clear a form field and type into it.
    pub async fn fill(&self, locator: &Locator, text: &str) -> Result<()> {
        let element = self.find(locator).await?;
        let _: serde_json::Value = self
            .command(
                Method::POST,
                &format!("/element/{element}/clear"),
                Some(&json!({})),
            )
            .await?;
        let _: serde_json::Value = self
            .command(
                Method::POST,
                &format!("/element/{element}/value"),
                Some(&json!({ "text": text })),
            )
            .await?;
        self.pause().await;
        Ok(())
    }

    pub async fn cookies(&self) -> Result<Vec<Cookie>> {
        self.command(Method::GET, "/cookie", None).await
    }

    /// Install cookies into the session. The browsing context must already
    /// be on a document whose domain matches the cookies.
    pub async fn add_cookies(&self, cookies: &[Cookie]) -> Result<()> {
        for cookie in cookies {
            let _: serde_json::Value = self
                .command(Method::POST, "/cookie", Some(&json!({ "cookie": cookie })))
                .await?;
        }
        Ok(())
    }

    /// End the browser session.
    pub async fn close(self) -> Result<()> {
        let _: serde_json::Value = self.command(Method::DELETE, "", None).await?;
        Ok(())
    }

    async fn find(&self, locator: &Locator) -> Result<String> {
        let body = json!({
            "using": locator.strategy(),
            "value": locator.value(),
        });
        let value: serde_json::Value = self
            .command(Method::POST, "/element", Some(&body))
            .await?;
        value
            .get(ELEMENT_KEY)
            .and_then(|id| id.as_str())
            .map(String::from)
            .ok_or_else(|| WebDriverError::Protocol(format!("missing element id in {value}")))
    }

    async fn command<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<T> {
        execute(
            &self.client,
            &self.base_url,
            method,
            &format!("/session/{}{path}", self.id),
            body,
        )
        .await
    }

    async fn pause(&self) {
        if let Some(delay) = self.slowdown {
            tokio::time::sleep(delay).await;
        }
    }
}

#[derive(Deserialize)]
struct ValueWrapper<T> {
    value: T,
}

#[derive(Deserialize)]
struct NewSessionValue {
    #[serde(rename = "sessionId")]
    session_id: String,
}

#[derive(Deserialize)]
struct WireError {
    #[serde(default)]
    error: String,
    #[serde(default)]
    message: String,
}

async fn execute<T: DeserializeOwned>(
    client: &reqwest::Client,
    base_url: &str,
    method: Method,
    path: &str,
    body: Option<&serde_json::Value>,
) -> Result<T> {
    let url = format!("{base_url}{path}");
    let mut request = client.request(method, &url);
    if let Some(body) = body {
        request = request.json(body);
    }

    let resp = request.send().await?;
    let status = resp.status();
    let text = resp.text().await?;

    if !status.is_success() {
        // W3C error bodies are {"value": {"error": ..., "message": ...}}
        return Err(match serde_json::from_str::<ValueWrapper<WireError>>(&text) {
            Ok(wire) => WebDriverError::Api {
                status: status.as_u16(),
                error: wire.value.error,
                message: wire.value.message,
            },
            Err(_) => WebDriverError::Api {
                status: status.as_u16(),
                error: "unknown".to_string(),
                message: text,
            },
        });
    }

    let wrapper: ValueWrapper<T> = serde_json::from_str(&text)
        .map_err(|e| WebDriverError::Protocol(format!("{e}: {text}")))?;
    Ok(wrapper.value)
}
