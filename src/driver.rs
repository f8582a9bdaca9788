//! The browser capability seam.
//!
//! This crate orchestrates automation around an externally supplied browser
//! driver; it never speaks a wire protocol itself. The seam is a pair of
//! object-safe async traits plus a factory:
//!
//! | Trait | Role |
//! |-------|------|
//! | [`WebDriver`] | One live browser session: navigation, element discovery, cookies, scripts |
//! | [`WebElement`] | One located element handle: click, clear, type, attributes, visibility |
//! | [`DriverFactory`] | Acquires a [`WebDriver`] for a [`BrowserKind`] and resolved config |
//!
//! Implementations can wrap any protocol client (WebDriver HTTP, BiDi, CDP)
//! or a test double. Every method returns a boxed [`DriverError`]; the
//! session layer catches and translates these into its own error taxonomy,
//! so capability failures never escape untyped.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//! use smart_webdriver::{BrowserKind, DriverFactory, DriverResult, SessionConfig, WebDriver};
//!
//! struct GridFactory { endpoint: String }
//!
//! #[async_trait]
//! impl DriverFactory for GridFactory {
//!     async fn launch(
//!         &self,
//!         browser: BrowserKind,
//!         config: &SessionConfig,
//!     ) -> DriverResult<Box<dyn WebDriver>> {
//!         let client = connect(&self.endpoint, browser.as_str(), config).await?;
//!         Ok(Box::new(client))
//!     }
//! }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::SessionConfig;
use crate::error::Error;
use crate::selector::By;

// ============================================================================
// Driver Errors
// ============================================================================

/// Error type produced by capability implementations.
///
/// Deliberately untyped: drivers wrap arbitrary protocol clients. The
/// session layer translates these at its boundary.
pub type DriverError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias for capability operations.
pub type DriverResult<T> = std::result::Result<T, DriverError>;

// ============================================================================
// BrowserKind
// ============================================================================

/// Supported browser identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    /// Google Chrome / Chromium.
    Chrome,

    /// Mozilla Firefox.
    Firefox,
}

impl BrowserKind {
    /// Returns the lowercase identifier.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
            Self::Firefox => "firefox",
        }
    }
}

impl std::fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrowserKind {
    type Err = Error;

    /// Parses a browser identifier, case-insensitively.
    ///
    /// An unrecognized identifier is a driver-init failure: it surfaces when
    /// a session tries to reach the active state, not during config
    /// resolution.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chrome" => Ok(Self::Chrome),
            "firefox" => Ok(Self::Firefox),
            _ => Err(Error::driver_init(format!(
                "unsupported browser '{s}': expected 'chrome' or 'firefox'"
            ))),
        }
    }
}

// ============================================================================
// Cookie
// ============================================================================

/// Browser cookie.
///
/// # Example
///
/// ```
/// use smart_webdriver::Cookie;
///
/// let cookie = Cookie::new("session", "abc123")
///     .with_domain("example.com")
///     .with_path("/")
///     .with_secure(true);
/// assert_eq!(cookie.name, "session");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: String,
    /// Domain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Secure flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
    /// HttpOnly flag.
    #[serde(rename = "httpOnly", skip_serializing_if = "Option::is_none")]
    pub http_only: Option<bool>,
}

impl Cookie {
    /// Creates a new cookie with name and value.
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: None,
            path: None,
            secure: None,
            http_only: None,
        }
    }

    /// Sets the domain.
    #[inline]
    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Sets the path.
    #[inline]
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the secure flag.
    #[inline]
    #[must_use]
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = Some(secure);
        self
    }

    /// Sets the HttpOnly flag.
    #[inline]
    #[must_use]
    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = Some(http_only);
        self
    }
}

// ============================================================================
// WebElement Trait
// ============================================================================

/// A handle to one located element.
///
/// Returned by [`WebDriver::find_elements`]; may go stale if the page
/// changes, in which case operations fail with a [`DriverError`].
#[async_trait]
pub trait WebElement: Send + Sync {
    /// Clicks the element.
    async fn click(&self) -> DriverResult<()>;

    /// Clears the element's value (inputs, textareas).
    async fn clear(&self) -> DriverResult<()>;

    /// Types text into the element.
    async fn type_text(&self, text: &str) -> DriverResult<()>;

    /// Reads an attribute; `None` when the attribute is absent.
    async fn attribute(&self, name: &str) -> DriverResult<Option<String>>;

    /// Sets an attribute value.
    async fn set_attribute(&self, name: &str, value: &str) -> DriverResult<()>;

    /// Returns `true` if the element is rendered visible.
    async fn is_displayed(&self) -> DriverResult<bool>;
}

// ============================================================================
// WebDriver Trait
// ============================================================================

/// One live browser session.
///
/// All methods take `&self`: implementations are expected to manage their
/// own interior state, and the orchestration layer shares the handle
/// between the session and its wait engine.
#[async_trait]
pub trait WebDriver: Send + Sync {
    /// Navigates to a URL.
    async fn navigate(&self, url: &str) -> DriverResult<()>;

    /// Finds all elements matching a locator. Zero matches is `Ok(vec![])`,
    /// not an error.
    async fn find_elements(&self, by: &By) -> DriverResult<Vec<Box<dyn WebElement>>>;

    /// Executes JavaScript with arguments, returning its result.
    async fn execute_script(&self, script: &str, args: &[Value]) -> DriverResult<Value>;

    /// Gets a cookie by name.
    async fn cookie(&self, name: &str) -> DriverResult<Option<Cookie>>;

    /// Adds a cookie.
    async fn add_cookie(&self, cookie: Cookie) -> DriverResult<()>;

    /// Deletes all cookies.
    async fn delete_all_cookies(&self) -> DriverResult<()>;

    /// Sets the page-load timeout.
    ///
    /// Optional capability; the default implementation is a no-op.
    async fn set_page_load_timeout(&self, _timeout: Duration) -> DriverResult<()> {
        Ok(())
    }

    /// Captures a screenshot of the current page as base64-encoded PNG.
    ///
    /// Optional capability; the default implementation reports it as
    /// unsupported, which downgrades failure-artifact capture to a logged
    /// warning.
    async fn screenshot(&self) -> DriverResult<String> {
        Err("screenshot is not supported by this driver".into())
    }

    /// Ends the browser session and releases its resources.
    async fn close(&self) -> DriverResult<()>;
}

// ============================================================================
// DriverFactory Trait
// ============================================================================

/// Acquires browser capabilities for sessions.
///
/// The factory receives the resolved config so implementations can honor
/// `headless`, `proxy` and any other settings they understand.
#[async_trait]
pub trait DriverFactory: Send + Sync {
    /// Launches a browser session.
    async fn launch(
        &self,
        browser: BrowserKind,
        config: &SessionConfig,
    ) -> DriverResult<Box<dyn WebDriver>>;
}

// ============================================================================
// Mock Capability (test support)
// ============================================================================


// ============================================================================
// Tests
// ============================================================================
