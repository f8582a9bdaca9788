//! Fluent session construction.
//!
//! [`SessionBuilder`] gathers a driver factory, configuration sources,
//! plugins, and output sinks, then resolves the configuration, launches
//! the browser, and hands back a live [`Session`].
//!
//! Configuration precedence is defaults, then the file, then [`set`]
//! overrides. See [`crate::config`] for the recognized keys.
//!
//! [`set`]: SessionBuilder::set

use std::path::PathBuf;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{info, warn};
use uuid::Uuid;

use crate::artifact::{ArtifactSink, FsArtifactSink};
use crate::config::SessionConfig;
use crate::driver::{BrowserKind, DriverFactory, WebDriver};
use crate::error::{Error, Result};
use crate::plugin::{Plugin, PluginHost, SessionContext};
use crate::report::{FsReportSink, ReportSink};
use crate::wait::Waiter;

use super::core::Session;

/// Builder for [`Session`].
///
/// # Example
///
/// ```ignore
/// let session = Session::builder()
///     .factory(factory)
///     .config_file("automation.json")
///     .set("timeout", "20")
///     .plugin(LoginAudit::default())
///     .launch()
///     .await?;
/// ```
#[derive(Default)]
pub struct SessionBuilder {
    factory: Option<Arc<dyn DriverFactory>>,
    config_file: Option<PathBuf>,
    overrides: FxHashMap<String, String>,
    plugins: Vec<Arc<dyn Plugin>>,
    report_sink: Option<Arc<dyn ReportSink>>,
    artifact_sink: Option<Arc<dyn ArtifactSink>>,
}

impl SessionBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the factory that acquires the browser driver.
    #[must_use]
    pub fn factory(mut self, factory: impl DriverFactory + 'static) -> Self {
        self.factory = Some(Arc::new(factory));
        self
    }

    /// Reads settings from a flat JSON file at launch.
    #[must_use]
    pub fn config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Overrides a single setting; wins over the file and the defaults.
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.insert(key.into(), value.into());
        self
    }

    /// Registers a plugin whose hooks run at setup and teardown.
    #[must_use]
    pub fn plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Arc::new(plugin));
        self
    }

    /// Replaces the default filesystem report sink.
    #[must_use]
    pub fn report_sink(mut self, sink: impl ReportSink + 'static) -> Self {
        self.report_sink = Some(Arc::new(sink));
        self
    }

    /// Replaces the default filesystem screenshot sink.
    #[must_use]
    pub fn artifact_sink(mut self, sink: impl ArtifactSink + 'static) -> Self {
        self.artifact_sink = Some(Arc::new(sink));
        self
    }

    /// Resolves configuration, launches the browser, and runs every
    /// plugin's setup hook.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] when no factory was provided or the
    /// configuration is invalid, [`Error::DriverInit`] when the browser
    /// identifier is unrecognized or the driver cannot be acquired.
    pub async fn launch(self) -> Result<Session> {
        let config = SessionConfig::resolve(self.config_file.as_deref(), &self.overrides)?;
        let factory = self
            .factory
            .ok_or_else(|| Error::config("no driver factory configured"))?;
        let browser: BrowserKind = config.browser.parse()?;

        let launched = factory
            .launch(browser, &config)
            .await
            .map_err(|e| Error::driver_init(format!("failed to launch {browser}: {e}")))?;
        let driver: Arc<dyn WebDriver> = Arc::from(launched);

        if let Err(e) = driver.set_page_load_timeout(config.timeout).await {
            if let Err(close_error) = driver.close().await {
                warn!(error = %close_error, "browser shutdown failed during aborted launch");
            }
            return Err(Error::driver_init(format!(
                "cannot apply page load timeout: {e}"
            )));
        }

        let id = Uuid::new_v4();
        let report_sink = self
            .report_sink
            .unwrap_or_else(|| Arc::new(FsReportSink::new(&config.report_dir)));
        let artifact_sink = self
            .artifact_sink
            .unwrap_or_else(|| Arc::new(FsArtifactSink::new(config.report_dir.join("screenshots"))));

        let waiter = Waiter::new(
            Arc::clone(&driver),
            artifact_sink,
            config.timeout,
            config.highlight,
        );
        let plugins = PluginHost::new();
        for plugin in self.plugins {
            plugins.register(plugin);
        }
        plugins.notify_setup(&SessionContext::new(id, &config)).await;

        info!(
            session_id = %id,
            browser = %browser,
            timeout_ms = config.timeout.as_millis() as u64,
            "session started"
        );
        Ok(Session::assemble(
            id,
            config,
            driver,
            waiter,
            plugins,
            report_sink,
        ))
    }
}

// ============================================================================
// Tests
// ============================================================================
