//! Session action surface.
//!
//! Every action follows the same contract: refuse when the session is
//! closed, append exactly one PASS or FAIL record to the report, and
//! publish one event named after the action. Failures re-raise after
//! recording; the session itself stays active.
//!
//! [`Session::screenshot`] and [`Session::set_page_load_timeout`] are
//! plain passthroughs to the driver and are not recorded.

use std::time::{Duration, Instant};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Value, json};
use url::Url;

use crate::driver::{Cookie, WebElement};
use crate::error::{Error, Result};
use crate::report::{ActionRecord, Status};
use crate::selector::By;
use crate::wait::Located;

use super::core::Session;

impl Session {
    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    /// Navigates the browser to an absolute URL.
    ///
    /// # Errors
    ///
    /// [`Error::Navigation`] when the URL does not parse or the driver
    /// rejects it; the failure is recorded before it is returned.
    pub async fn navigate(&self, url: &str) -> Result<()> {
        self.ensure_active("navigate")?;
        let started = Instant::now();

        if let Err(e) = Url::parse(url) {
            let detail = format!("invalid URL: {e}");
            self.record(
                "navigate",
                Status::Fail,
                &format!("failed to open {url}: {detail}"),
                started.elapsed(),
                json!({ "url": url }),
            );
            return Err(Error::navigation(url, detail));
        }

        match self.driver.navigate(url).await {
            Ok(()) => {
                self.record(
                    "navigate",
                    Status::Pass,
                    &format!("opened {url}"),
                    started.elapsed(),
                    json!({ "url": url }),
                );
                Ok(())
            }
            Err(e) => {
                self.record(
                    "navigate",
                    Status::Fail,
                    &format!("failed to open {url}: {e}"),
                    started.elapsed(),
                    json!({ "url": url }),
                );
                Err(Error::navigation(url, e.to_string()))
            }
        }
    }

    // ------------------------------------------------------------------------
    // Element interaction
    // ------------------------------------------------------------------------

    /// Waits for the element and clicks it.
    ///
    /// # Errors
    ///
    /// [`Error::Action`] when the element never becomes visible or the
    /// click itself fails.
    pub async fn click(&self, by: &By) -> Result<()> {
        self.ensure_active("click")?;
        let started = Instant::now();
        let element = self.resolve("click", by, started).await?;

        match element.click().await {
            Ok(()) => {
                self.record(
                    "click",
                    Status::Pass,
                    &format!("clicked {by}"),
                    started.elapsed(),
                    json!({ "locator": by.to_string() }),
                );
                Ok(())
            }
            Err(e) => {
                let detail = format!("failed to click {by}: {e}");
                self.record(
                    "click",
                    Status::Fail,
                    &detail,
                    started.elapsed(),
                    json!({ "locator": by.to_string() }),
                );
                Err(Error::action("click", detail))
            }
        }
    }

    /// Waits for the element, clears it, and types `text` into it.
    ///
    /// The typed text never appears in the report or the event payload;
    /// fields regularly hold credentials.
    ///
    /// # Errors
    ///
    /// [`Error::Action`] when the element never becomes visible or the
    /// clear or the keystrokes fail.
    pub async fn type_text(&self, by: &By, text: &str) -> Result<()> {
        self.ensure_active("type")?;
        let started = Instant::now();
        let element = self.resolve("type", by, started).await?;

        match fill(element.as_ref(), text).await {
            Ok(()) => {
                self.record(
                    "type",
                    Status::Pass,
                    &format!("typed into {by}"),
                    started.elapsed(),
                    json!({ "locator": by.to_string() }),
                );
                Ok(())
            }
            Err(e) => {
                let detail = format!("failed to type into {by}: {e}");
                self.record(
                    "type",
                    Status::Fail,
                    &detail,
                    started.elapsed(),
                    json!({ "locator": by.to_string() }),
                );
                Err(Error::action("type", detail))
            }
        }
    }

    /// Waits for an element without interacting with it.
    ///
    /// A miss is an ordinary outcome carried in [`Located::NotFound`];
    /// only driver failures return an error. Both outcomes are recorded.
    pub async fn locate(&self, by: &By) -> Result<Located> {
        self.locate_with(by, self.waiter.timeout(), self.waiter.highlight_enabled())
            .await
    }

    /// [`Session::locate`] with an explicit deadline and highlight flag.
    pub async fn locate_with(
        &self,
        by: &By,
        timeout: Duration,
        highlight: bool,
    ) -> Result<Located> {
        self.ensure_active("locate")?;
        let started = Instant::now();

        match self.waiter.locate_with(by, timeout, highlight).await {
            Ok(located) => {
                match located.not_found() {
                    None => self.record(
                        "locate",
                        Status::Pass,
                        &format!("located {by}"),
                        started.elapsed(),
                        json!({ "locator": by.to_string() }),
                    ),
                    Some(miss) => self.record(
                        "locate",
                        Status::Fail,
                        &miss.to_string(),
                        started.elapsed(),
                        json!({
                            "locator": by.to_string(),
                            "artifact": miss.artifact.as_ref().map(|p| p.display().to_string()),
                        }),
                    ),
                }
                Ok(located)
            }
            Err(e) => {
                let detail = e.to_string();
                self.record(
                    "locate",
                    Status::Fail,
                    &detail,
                    started.elapsed(),
                    json!({ "locator": by.to_string() }),
                );
                Err(Error::action("locate", detail))
            }
        }
    }

    // ------------------------------------------------------------------------
    // Scripts and cookies
    // ------------------------------------------------------------------------

    /// Executes JavaScript in the page and returns its result.
    ///
    /// # Errors
    ///
    /// [`Error::Action`] when the driver rejects the script.
    pub async fn execute_script(&self, script: &str, args: &[Value]) -> Result<Value> {
        self.ensure_active("script")?;
        let started = Instant::now();

        match self.driver.execute_script(script, args).await {
            Ok(value) => {
                self.record(
                    "script",
                    Status::Pass,
                    "script executed",
                    started.elapsed(),
                    json!({}),
                );
                Ok(value)
            }
            Err(e) => {
                let detail = e.to_string();
                self.record("script", Status::Fail, &detail, started.elapsed(), json!({}));
                Err(Error::action("script", detail))
            }
        }
    }

    /// Reads a cookie by name; `None` when the browser has no such cookie.
    pub async fn cookie(&self, name: &str) -> Result<Option<Cookie>> {
        self.ensure_active("read cookie")?;
        let started = Instant::now();

        match self.driver.cookie(name).await {
            Ok(cookie) => {
                self.record(
                    "cookie",
                    Status::Pass,
                    &format!("read cookie '{name}'"),
                    started.elapsed(),
                    json!({ "name": name }),
                );
                Ok(cookie)
            }
            Err(e) => {
                let detail = e.to_string();
                self.record(
                    "cookie",
                    Status::Fail,
                    &detail,
                    started.elapsed(),
                    json!({ "name": name }),
                );
                Err(Error::action("cookie", detail))
            }
        }
    }

    /// Adds a cookie to the browser.
    pub async fn add_cookie(&self, cookie: Cookie) -> Result<()> {
        self.ensure_active("add cookie")?;
        let started = Instant::now();
        let name = cookie.name.clone();

        match self.driver.add_cookie(cookie).await {
            Ok(()) => {
                self.record(
                    "cookie",
                    Status::Pass,
                    &format!("added cookie '{name}'"),
                    started.elapsed(),
                    json!({ "name": name }),
                );
                Ok(())
            }
            Err(e) => {
                let detail = e.to_string();
                self.record(
                    "cookie",
                    Status::Fail,
                    &detail,
                    started.elapsed(),
                    json!({ "name": name }),
                );
                Err(Error::action("cookie", detail))
            }
        }
    }

    /// Deletes every cookie in the browser.
    pub async fn delete_all_cookies(&self) -> Result<()> {
        self.ensure_active("clear cookies")?;
        let started = Instant::now();

        match self.driver.delete_all_cookies().await {
            Ok(()) => {
                self.record(
                    "cookie",
                    Status::Pass,
                    "cleared cookies",
                    started.elapsed(),
                    json!({}),
                );
                Ok(())
            }
            Err(e) => {
                let detail = e.to_string();
                self.record("cookie", Status::Fail, &detail, started.elapsed(), json!({}));
                Err(Error::action("cookie", detail))
            }
        }
    }

    // ------------------------------------------------------------------------
    // Passthroughs
    // ------------------------------------------------------------------------

    /// Captures a screenshot of the current page as PNG bytes.
    ///
    /// Not recorded in the report; the wait engine stores its own
    /// failure screenshots.
    pub async fn screenshot(&self) -> Result<Vec<u8>> {
        self.ensure_active("screenshot")?;
        let encoded = self
            .driver
            .screenshot()
            .await
            .map_err(|e| Error::action("screenshot", e.to_string()))?;
        BASE64
            .decode(&encoded)
            .map_err(|e| Error::action("screenshot", format!("invalid base64 payload: {e}")))
    }

    /// Adjusts the driver's page load timeout. Not recorded.
    pub async fn set_page_load_timeout(&self, timeout: Duration) -> Result<()> {
        self.ensure_active("set page load timeout")?;
        self.driver
            .set_page_load_timeout(timeout)
            .await
            .map_err(|e| Error::action("set_page_load_timeout", e.to_string()))
    }

    // ------------------------------------------------------------------------
    // Shared plumbing
    // ------------------------------------------------------------------------

    /// Appends the record and publishes the matching event, in that
    /// order. `extra` must be a JSON object; the standard fields are
    /// merged into it.
    fn record(
        &self,
        action: &'static str,
        status: Status,
        message: &str,
        duration: Duration,
        extra: Value,
    ) {
        self.reporter
            .add_result(ActionRecord::new(action, status, message, duration));

        let mut payload = extra;
        if let Value::Object(fields) = &mut payload {
            fields.insert("session".into(), json!(self.id.to_string()));
            fields.insert("action".into(), json!(action));
            fields.insert("status".into(), json!(status.as_str()));
            fields.insert("message".into(), json!(message));
            fields.insert("duration_ms".into(), json!(duration.as_millis() as u64));
        }
        self.dispatcher.dispatch(action, &payload);
    }

    /// Waits for the element an action needs. A miss or a driver failure
    /// records the FAIL under the action's own name and returns the
    /// error to raise.
    async fn resolve(
        &self,
        action: &'static str,
        by: &By,
        started: Instant,
    ) -> Result<Box<dyn WebElement>> {
        match self.waiter.locate(by).await {
            Ok(Located::Found(element)) => Ok(element),
            Ok(Located::NotFound(miss)) => {
                let detail = miss.to_string();
                self.record(
                    action,
                    Status::Fail,
                    &detail,
                    started.elapsed(),
                    json!({
                        "locator": by.to_string(),
                        "artifact": miss.artifact.as_ref().map(|p| p.display().to_string()),
                    }),
                );
                Err(Error::action(action, detail))
            }
            Err(e) => {
                let detail = e.to_string();
                self.record(
                    action,
                    Status::Fail,
                    &detail,
                    started.elapsed(),
                    json!({ "locator": by.to_string() }),
                );
                Err(Error::action(action, detail))
            }
        }
    }
}

/// Clear-then-type sequence shared by [`Session::type_text`].
async fn fill(element: &dyn WebElement, text: &str) -> crate::driver::DriverResult<()> {
    element.clear().await?;
    element.type_text(text).await
}

// ============================================================================
// Tests
// ============================================================================
