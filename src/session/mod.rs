//! Session lifecycle and action surface.
//!
//! A [`Session`] owns one launched browser and everything wired around
//! it: the wait engine, the event dispatcher, the plugin host, and the
//! reporter. Actions go through the session so every outcome lands in
//! the report and reaches event subscribers.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SessionBuilder`] | Fluent configuration and launch |
//! | [`Session`] | Live browser session with recorded actions |
//!
//! # Example
//!
//! ```ignore
//! use smart_webdriver::{By, Session};
//!
//! let session = Session::builder()
//!     .factory(factory)
//!     .set("browser", "firefox")
//!     .set("timeout", "15")
//!     .launch()
//!     .await?;
//!
//! session.navigate("https://example.com/login").await?;
//! session.type_text(&By::id("user"), "admin").await?;
//! session.click(&By::css("button[type=submit]")).await?;
//! session.close().await;
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Action surface: navigation, element interaction, scripts, cookies.
mod actions;

/// Fluent session construction and launch.
pub mod builder;

/// Session state machine and teardown.
pub mod core;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::SessionBuilder;
pub use core::Session;

// ============================================================================
// Test fixtures
// ============================================================================

#[cfg(test)]
pub(crate) mod testkit {
    //! Fixtures shared by the session test modules.

    use std::io;
    use std::path::PathBuf;
    use std::sync::Arc;

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use crate::artifact::ArtifactSink;
    use crate::plugin::{Plugin, PluginResult, SessionContext};
    use crate::report::ReportSink;

    /// Plugin that appends `"<name>:setup"` / `"<name>:teardown"` to a
    /// shared log, optionally failing either hook.
    pub(crate) struct RecordingPlugin {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
        fail_setup: bool,
        fail_teardown: bool,
    }

    impl RecordingPlugin {
        pub(crate) fn new(name: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Self {
            Self {
                name,
                log: Arc::clone(log),
                fail_setup: false,
                fail_teardown: false,
            }
        }

        pub(crate) fn failing_setup(name: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Self {
            Self {
                fail_setup: true,
                ..Self::new(name, log)
            }
        }

        pub(crate) fn failing_teardown(name: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Self {
            Self {
                fail_teardown: true,
                ..Self::new(name, log)
            }
        }
    }

    #[async_trait]
    impl Plugin for RecordingPlugin {
        fn name(&self) -> &str {
            self.name
        }

        async fn on_setup(&self, _ctx: &SessionContext<'_>) -> PluginResult {
            self.log.lock().push(format!("{}:setup", self.name));
            if self.fail_setup {
                return Err("setup exploded".into());
            }
            Ok(())
        }

        async fn on_teardown(&self, _ctx: &SessionContext<'_>) -> PluginResult {
            self.log.lock().push(format!("{}:teardown", self.name));
            if self.fail_teardown {
                return Err("teardown exploded".into());
            }
            Ok(())
        }
    }

    /// Report sink keeping rendered documents in memory.
    #[derive(Clone, Default)]
    pub(crate) struct CapturingReportSink {
        documents: Arc<Mutex<Vec<String>>>,
    }

    impl CapturingReportSink {
        pub(crate) fn documents(&self) -> Vec<String> {
            self.documents.lock().clone()
        }

        pub(crate) fn write_count(&self) -> usize {
            self.documents.lock().len()
        }
    }

    impl ReportSink for CapturingReportSink {
        fn write_report(&self, html: &str) -> io::Result<()> {
            self.documents.lock().push(html.to_string());
            Ok(())
        }

        fn describe(&self) -> String {
            "in-memory report sink".to_string()
        }
    }

    /// Report sink that always fails.
    pub(crate) struct BrokenReportSink;

    impl ReportSink for BrokenReportSink {
        fn write_report(&self, _html: &str) -> io::Result<()> {
            Err(io::Error::other("disk full"))
        }

        fn describe(&self) -> String {
            "broken report sink".to_string()
        }
    }

    /// Artifact sink keeping stored names in memory.
    #[derive(Clone, Default)]
    pub(crate) struct MemoryArtifactSink {
        stored: Arc<Mutex<Vec<String>>>,
    }

    impl MemoryArtifactSink {
        pub(crate) fn names(&self) -> Vec<String> {
            self.stored.lock().clone()
        }
    }

    impl ArtifactSink for MemoryArtifactSink {
        fn store(&self, name: &str, _bytes: &[u8]) -> io::Result<PathBuf> {
            self.stored.lock().push(name.to_string());
            Ok(PathBuf::from(format!("{name}.png")))
        }

        fn describe(&self) -> String {
            "in-memory artifact sink".to_string()
        }
    }
}
