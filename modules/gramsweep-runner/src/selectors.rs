//! Page markers the runner steers by. These match visible text and ARIA
//! roles, not CSS class names — class names churn with every redesign.

use std::time::Duration;

use webdriver_client::Locator;

/// Visible only while the session is not authenticated.
pub const LOGIN_BUTTON: Locator = Locator::XPath("//button[contains(., 'Log in')]");
pub const USERNAME_INPUT: Locator = Locator::Css("input[name='username']");
pub const PASSWORD_INPUT: Locator = Locator::Css("input[name='password']");
pub const LOGIN_SUBMIT: Locator = Locator::Css("button[type='submit']");

/// Appears in the nav once a login lands.
pub const POST_LOGIN_MARKER: Locator = Locator::XPath("//*[text()='Profile']");

/// Challenge / rate-limit interstitials shown instead of the profile after
/// a rejected or throttled login.
pub const CHALLENGE_MARKER: Locator = Locator::XPath(
    "//*[contains(., 'Suspicious Login Attempt') or contains(., 'Try Again Later')]",
);

/// Relationship button on a profile the account currently follows.
pub const FOLLOWING_BUTTON: Locator = Locator::XPath("//button[contains(., 'Following')]");
pub const UNFOLLOW_DIALOG: Locator = Locator::Css("div[role='dialog']");
pub const UNFOLLOW_CONFIRM: Locator = Locator::XPath("//button[contains(., 'Unfollow')]");

/// Bound on the post-login marker wait.
pub const LOGIN_WAIT: Duration = Duration::from_secs(10);
/// Bound on every per-candidate control wait.
pub const ACTION_WAIT: Duration = Duration::from_secs(5);
