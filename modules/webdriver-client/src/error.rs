use thiserror::Error;

pub type Result<T> = std::result::Result<T, WebDriverError>;

#[derive(Debug, Error)]
pub enum WebDriverError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("WebDriver error ({error}, status {status}): {message}")]
    Api {
        status: u16,
        error: String,
        message: String,
    },

    #[error("Timed out after {timeout_ms}ms waiting for {locator}")]
    Timeout { locator: String, timeout_ms: u64 },

    #[error("Unexpected WebDriver response: {0}")]
    Protocol(String),
}

impl WebDriverError {
    /// True when the remote end reported the W3C "no such element" code.
    pub fn is_no_such_element(&self) -> bool {
        matches!(self, WebDriverError::Api { error, .. } if error == "no such element")
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, WebDriverError::Timeout { .. })
    }
}

impl From<reqwest::Error> for WebDriverError {
    fn from(err: reqwest::Error) -> Self {
        WebDriverError::Network(err.to_string())
    }
}
