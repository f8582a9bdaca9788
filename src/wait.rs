//! Polling element-wait engine.
//!
//! Every element interaction funnels through [`Waiter::locate`]: probe the
//! driver at a fixed interval until a matching element is both present in
//! the DOM and visibly rendered, or the deadline passes.
//!
//! | Outcome | Meaning |
//! |---------|---------|
//! | [`Located::Found`] | An element matched and was displayed before the deadline. |
//! | [`Located::NotFound`] | The deadline expired; carries the locator, the time waited, and the failure artifact path if one was captured. |
//!
//! An expired wait is an ordinary outcome, not an error: the driver is
//! still healthy and the caller decides what a missing element means.
//! Driver failures during a probe (lost session, dead transport) do
//! surface as errors.
//!
//! # Example
//!
//! ```ignore
//! use smart_webdriver::{By, Located};
//!
//! match waiter.locate(&By::css("#login")).await? {
//!     Located::Found(element) => element.click().await?,
//!     Located::NotFound(miss) => println!("{miss}"),
//! }
//! ```

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

use crate::artifact::{ArtifactSink, artifact_name};
use crate::driver::{DriverResult, WebDriver, WebElement};
use crate::selector::By;

// ============================================================================
// Constants
// ============================================================================

/// Delay between consecutive element probes.
pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// How long a located element keeps its highlight border.
pub const HIGHLIGHT_DURATION: Duration = Duration::from_millis(500);

/// Inline style applied while an element is highlighted.
pub const HIGHLIGHT_STYLE: &str = "border: 3px solid red;";

// ============================================================================
// Outcome Types
// ============================================================================

/// Details of a wait that expired without locating a visible element.
#[derive(Debug, Clone)]
pub struct NotFound {
    /// The locator that never matched a visible element.
    pub locator: By,
    /// Total time spent polling before giving up.
    pub waited: Duration,
    /// Path of the stored screenshot, when capture succeeded.
    pub artifact: Option<PathBuf>,
}

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "element not found: {} (waited {:.2}s)",
            self.locator,
            self.waited.as_secs_f64()
        )
    }
}

/// Result of a wait: the element, or a description of the miss.
pub enum Located {
    /// A matching element became visible before the deadline.
    Found(Box<dyn WebElement>),
    /// No matching element became visible before the deadline.
    NotFound(NotFound),
}

impl Located {
    /// Returns `true` when an element was located.
    #[inline]
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Located::Found(_))
    }

    /// Consumes the outcome, yielding the element if one was located.
    #[must_use]
    pub fn into_element(self) -> Option<Box<dyn WebElement>> {
        match self {
            Located::Found(element) => Some(element),
            Located::NotFound(_) => None,
        }
    }

    /// Returns the miss details when the wait expired.
    #[must_use]
    pub fn not_found(&self) -> Option<&NotFound> {
        match self {
            Located::Found(_) => None,
            Located::NotFound(not_found) => Some(not_found),
        }
    }
}

impl fmt::Debug for Located {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Located::Found(_) => f.debug_struct("Found").finish_non_exhaustive(),
            Located::NotFound(not_found) => f.debug_tuple("NotFound").field(not_found).finish(),
        }
    }
}

// ============================================================================
// Waiter
// ============================================================================

/// Fixed-interval poller that resolves locators into live elements.
pub struct Waiter {
    driver: Arc<dyn WebDriver>,
    artifacts: Arc<dyn ArtifactSink>,
    timeout: Duration,
    highlight: bool,
}

impl Waiter {
    /// Creates a waiter over a driver, with a sink for failure screenshots.
    pub fn new(
        driver: Arc<dyn WebDriver>,
        artifacts: Arc<dyn ArtifactSink>,
        timeout: Duration,
        highlight: bool,
    ) -> Self {
        Self {
            driver,
            artifacts,
            timeout,
            highlight,
        }
    }

    /// Default deadline applied by [`Waiter::locate`].
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether located elements are briefly highlighted.
    #[inline]
    #[must_use]
    pub fn highlight_enabled(&self) -> bool {
        self.highlight
    }

    /// Waits for a visible element using the configured timeout and
    /// highlight setting.
    pub async fn locate(&self, by: &By) -> DriverResult<Located> {
        self.locate_with(by, self.timeout, self.highlight).await
    }

    /// Waits for an element matching `by` to be present and displayed.
    ///
    /// Probes immediately, then every [`POLL_INTERVAL`] until `timeout`
    /// elapses. A miss returns `Ok(Located::NotFound(_))` after a
    /// best-effort screenshot capture; only driver errors return `Err`.
    pub async fn locate_with(
        &self,
        by: &By,
        timeout: Duration,
        highlight: bool,
    ) -> DriverResult<Located> {
        let started = Instant::now();
        let deadline = started + timeout;
        debug!(
            locator = %by,
            timeout_ms = timeout.as_millis() as u64,
            "waiting for element"
        );

        loop {
            if let Some(element) = self.probe(by).await? {
                debug!(
                    locator = %by,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "element located"
                );
                if highlight {
                    if let Err(error) = self.highlight(element.as_ref()).await {
                        warn!(locator = %by, error = %error, "element highlight failed");
                    }
                }
                return Ok(Located::Found(element));
            }
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            time::sleep(deadline.saturating_duration_since(now).min(POLL_INTERVAL)).await;
        }

        let waited = started.elapsed();
        warn!(
            locator = %by,
            waited_ms = waited.as_millis() as u64,
            "element not found within timeout"
        );
        let artifact = self.capture_failure(by).await;
        Ok(Located::NotFound(NotFound {
            locator: by.clone(),
            waited,
            artifact,
        }))
    }

    /// Single probe: first match that is currently displayed. Presence
    /// without visibility is still a miss.
    async fn probe(&self, by: &By) -> DriverResult<Option<Box<dyn WebElement>>> {
        let Some(element) = self.driver.find_elements(by).await?.into_iter().next() else {
            return Ok(None);
        };
        if element.is_displayed().await? {
            Ok(Some(element))
        } else {
            Ok(None)
        }
    }

    /// Flashes a border around the element, then restores whatever inline
    /// style it had before.
    async fn highlight(&self, element: &dyn WebElement) -> DriverResult<()> {
        let original = element.attribute("style").await?;
        element.set_attribute("style", HIGHLIGHT_STYLE).await?;
        time::sleep(HIGHLIGHT_DURATION).await;
        element
            .set_attribute("style", original.as_deref().unwrap_or(""))
            .await?;
        Ok(())
    }

    /// Screenshots the page and stores it under a name derived from the
    /// locator. Every step is best-effort: a failure is logged and the
    /// artifact is simply absent.
    async fn capture_failure(&self, by: &By) -> Option<PathBuf> {
        let encoded = match self.driver.screenshot().await {
            Ok(encoded) => encoded,
            Err(error) => {
                warn!(locator = %by, error = %error, "screenshot capture failed");
                return None;
            }
        };
        let bytes = match BASE64.decode(&encoded) {
            Ok(bytes) => bytes,
            Err(error) => {
                warn!(locator = %by, error = %error, "screenshot payload is not valid base64");
                return None;
            }
        };
        match self.artifacts.store(&artifact_name(by), &bytes) {
            Ok(path) => {
                info!(locator = %by, path = %path.display(), "failure screenshot stored");
                Some(path)
            }
            Err(error) => {
                warn!(
                    locator = %by,
                    sink = %self.artifacts.describe(),
                    error = %error,
                    "failed to store failure screenshot"
                );
                None
            }
        }
    }
}

impl fmt::Debug for Waiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Waiter")
            .field("timeout", &self.timeout)
            .field("highlight", &self.highlight)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
