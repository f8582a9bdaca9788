//! Session state machine and teardown.
//!
//! A session goes through three states and never moves backwards:
//!
//! | State | Meaning |
//! |-------|---------|
//! | Uninitialized | Settings collected, browser not launched |
//! | Active | Browser launched, actions accepted |
//! | Terminated | [`Session::close`] ran, actions rejected |
//!
//! The uninitialized state lives inside [`SessionBuilder`]; a
//! constructed [`Session`] starts out active. Closing is failure
//! tolerant: teardown hooks, the report flush, and the browser shutdown
//! each log their own failures and the remaining steps still run.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::driver::WebDriver;
use crate::error::{Error, Result};
use crate::events::{Dispatcher, EventHandler};
use crate::plugin::{Plugin, PluginHost, SessionContext};
use crate::report::{ReportSink, Reporter};
use crate::wait::Waiter;

use super::builder::SessionBuilder;

// ============================================================================
// State
// ============================================================================

/// Lifecycle state of a constructed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Active,
    Terminated,
}

// ============================================================================
// Session
// ============================================================================

/// A live browser session.
///
/// Element interaction goes through the wait engine, and every action
/// appends exactly one PASS or FAIL record to the report and publishes
/// one event named after the action.
pub struct Session {
    pub(super) id: Uuid,
    pub(super) config: SessionConfig,
    pub(super) driver: Arc<dyn WebDriver>,
    pub(super) waiter: Waiter,
    pub(super) dispatcher: Dispatcher,
    pub(super) plugins: PluginHost,
    pub(super) reporter: Reporter,
    pub(super) report_sink: Arc<dyn ReportSink>,
    state: Mutex<State>,
}

impl Session {
    /// Starts building a session.
    #[must_use]
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    pub(super) fn assemble(
        id: Uuid,
        config: SessionConfig,
        driver: Arc<dyn WebDriver>,
        waiter: Waiter,
        plugins: PluginHost,
        report_sink: Arc<dyn ReportSink>,
    ) -> Self {
        Self {
            id,
            config,
            driver,
            waiter,
            dispatcher: Dispatcher::new(),
            plugins,
            reporter: Reporter::new(id),
            report_sink,
            state: Mutex::new(State::Active),
        }
    }

    /// Unique id of this session, also stamped on the report.
    #[inline]
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Resolved configuration the session runs under.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Read access to the accumulated action records.
    #[inline]
    #[must_use]
    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    /// Returns `true` until [`Session::close`] runs.
    #[must_use]
    pub fn is_active(&self) -> bool {
        *self.state.lock() == State::Active
    }

    /// Subscribes a handler to events of the given name. Actions publish
    /// events named after themselves (`"click"`, `"navigate"`, ...).
    pub fn subscribe(&self, event: impl Into<String>, handler: EventHandler) {
        self.dispatcher.subscribe(event, handler);
    }

    /// Registers a plugin on the live session. Ignored once the session
    /// is closed, since its teardown hook would never run.
    pub fn register_plugin(&self, plugin: impl Plugin + 'static) {
        if !self.is_active() {
            warn!(
                session_id = %self.id,
                plugin = plugin.name(),
                "plugin registered after close, ignoring"
            );
            return;
        }
        self.plugins.register(Arc::new(plugin));
    }

    /// Guard invoked at the top of every action.
    pub(super) fn ensure_active(&self, operation: &str) -> Result<()> {
        match *self.state.lock() {
            State::Active => Ok(()),
            State::Terminated => Err(Error::session_closed(operation)),
        }
    }

    /// Closes the session: teardown hooks, report flush, browser shutdown.
    ///
    /// Idempotent and failure tolerant. Each teardown step logs its own
    /// failure and the remaining steps still run, so the report is
    /// written exactly once and the browser shutdown is attempted
    /// exactly once no matter what breaks along the way.
    pub async fn close(&self) {
        {
            let mut state = self.state.lock();
            if *state == State::Terminated {
                debug!(session_id = %self.id, "session already closed");
                return;
            }
            *state = State::Terminated;
        }
        info!(session_id = %self.id, "closing session");
        self.plugins
            .notify_teardown(&SessionContext::new(self.id, &self.config))
            .await;
        self.reporter.generate(self.report_sink.as_ref());
        if let Err(error) = self.driver.close().await {
            warn!(session_id = %self.id, error = %error, "browser shutdown reported an error");
        }
        info!(
            session_id = %self.id,
            records = self.reporter.len(),
            "session closed"
        );
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("state", &*self.state.lock())
            .field("records", &self.reporter.len())
            .finish_non_exhaustive()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if *self.state.lock() == State::Active {
            warn!(
                session_id = %self.id,
                "session dropped while active, report not written and browser left running"
            );
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::mock::{MockDriver, MockFactory};
    use crate::session::testkit::{
        BrokenReportSink, CapturingReportSink, MemoryArtifactSink, RecordingPlugin,
    };

    async fn launch(driver: &MockDriver) -> (Session, CapturingReportSink) {
        let sink = CapturingReportSink::default();
        let session = Session::builder()
            .factory(MockFactory::new(driver.clone()))
            .report_sink(sink.clone())
            .artifact_sink(MemoryArtifactSink::default())
            .launch()
            .await
            .expect("launch should succeed");
        (session, sink)
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let driver = MockDriver::new();
        let (session, sink) = launch(&driver).await;

        session.close().await;
        session.close().await;
        session.close().await;

        assert_eq!(driver.close_calls(), 1);
        assert_eq!(sink.write_count(), 1);
    }

    #[tokio::test]
    async fn test_actions_after_close_fail_with_session_closed() {
        let driver = MockDriver::new();
        let (session, _sink) = launch(&driver).await;
        session.close().await;

        let error = session.navigate("https://example.com").await.unwrap_err();
        assert!(error.is_session_closed());
        assert!(error.to_string().contains("cannot navigate"));
        assert!(session.reporter().is_empty());
    }

    #[tokio::test]
    async fn test_close_runs_hooks_flushes_report_and_shuts_down() {
        let driver = MockDriver::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = CapturingReportSink::default();
        let session = Session::builder()
            .factory(MockFactory::new(driver.clone()))
            .report_sink(sink.clone())
            .artifact_sink(MemoryArtifactSink::default())
            .plugin(RecordingPlugin::new("audit", &log))
            .launch()
            .await
            .unwrap();

        session.close().await;

        assert_eq!(*log.lock(), vec!["audit:setup", "audit:teardown"]);
        assert_eq!(sink.write_count(), 1);
        assert_eq!(driver.close_calls(), 1);
        assert!(!session.is_active());
    }

    #[tokio::test]
    async fn test_close_survives_a_failing_teardown_hook() {
        let driver = MockDriver::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = CapturingReportSink::default();
        let session = Session::builder()
            .factory(MockFactory::new(driver.clone()))
            .report_sink(sink.clone())
            .artifact_sink(MemoryArtifactSink::default())
            .plugin(RecordingPlugin::failing_teardown("flaky", &log))
            .plugin(RecordingPlugin::new("steady", &log))
            .launch()
            .await
            .unwrap();

        session.close().await;

        assert_eq!(
            *log.lock(),
            vec!["flaky:setup", "steady:setup", "flaky:teardown", "steady:teardown"]
        );
        assert_eq!(sink.write_count(), 1);
        assert_eq!(driver.close_calls(), 1);
    }

    #[tokio::test]
    async fn test_close_survives_a_failing_report_sink() {
        let driver = MockDriver::new();
        let session = Session::builder()
            .factory(MockFactory::new(driver.clone()))
            .report_sink(BrokenReportSink)
            .artifact_sink(MemoryArtifactSink::default())
            .launch()
            .await
            .unwrap();

        session.close().await;
        assert_eq!(driver.close_calls(), 1);
    }

    #[tokio::test]
    async fn test_close_survives_a_failing_browser_shutdown() {
        let driver = MockDriver::new();
        driver.fail_close();
        let (session, sink) = launch(&driver).await;

        session.close().await;

        assert_eq!(sink.write_count(), 1);
        assert!(!session.is_active());
    }

    #[tokio::test]
    async fn test_register_plugin_after_close_is_ignored() {
        let driver = MockDriver::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let (session, _sink) = launch(&driver).await;
        session.close().await;

        session.register_plugin(RecordingPlugin::new("late", &log));
        assert_eq!(session.plugins.len(), 0);
    }

    #[tokio::test]
    async fn test_session_starts_active() {
        let driver = MockDriver::new();
        let (session, _sink) = launch(&driver).await;
        assert!(session.is_active());
        session.close().await;
        assert!(!session.is_active());
    }
}
