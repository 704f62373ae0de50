use std::time::Duration;

use serde::{Deserialize, Serialize};

/// An element location strategy plus its selector.
///
/// Text-matching selectors have no CSS form on the W3C wire protocol, so
/// anything steering by visible text uses XPath.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    Css(&'static str),
    XPath(&'static str),
}

impl Locator {
    /// Wire name of the location strategy.
    pub fn strategy(&self) -> &'static str {
        match self {
            Locator::Css(_) => "css selector",
            Locator::XPath(_) => "xpath",
        }
    }

    pub fn value(&self) -> &'static str {
        match self {
            Locator::Css(v) | Locator::XPath(v) => v,
        }
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locator::Css(v) => write!(f, "css={v}"),
            Locator::XPath(v) => write!(f, "xpath={v}"),
        }
    }
}

/// A browser cookie as the WebDriver wire protocol represents it.
///
/// Field names follow the wire casing (`httpOnly`, `sameSite`) so a
/// serialized cookie array can be handed straight back to `add_cookies`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
    #[serde(rename = "httpOnly", default, skip_serializing_if = "Option::is_none")]
    pub http_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<u64>,
    #[serde(rename = "sameSite", default, skip_serializing_if = "Option::is_none")]
    pub same_site: Option<String>,
}

/// Options for a new browser session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub headless: bool,
    /// Pause inserted after every navigation and interaction, to keep the
    /// action cadence under automation-detection thresholds.
    pub slowdown: Option<Duration>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            headless: true,
            slowdown: None,
        }
    }
}
