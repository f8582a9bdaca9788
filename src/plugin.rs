//! Lifecycle plugin host.
//!
//! Plugins extend a session at its lifecycle edges: `on_setup` runs when the
//! session reaches the active state, `on_teardown` runs during close, both in
//! registration order. Hook methods have provided defaults, so a plugin
//! implements only the hooks it cares about. Errors in individual hooks are
//! isolated and logged; they never prevent other plugins from running or the
//! session's own teardown from completing.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//! use smart_webdriver::{Plugin, PluginResult, SessionContext};
//!
//! struct AuditLog;
//!
//! #[async_trait]
//! impl Plugin for AuditLog {
//!     fn name(&self) -> &str {
//!         "audit-log"
//!     }
//!
//!     async fn on_teardown(&self, ctx: &SessionContext<'_>) -> PluginResult {
//!         append_audit_line(ctx.session_id)?;
//!         Ok(())
//!     }
//! }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::SessionConfig;

// ============================================================================
// Plugin Types
// ============================================================================

/// Error type plugin hooks may return; only ever logged.
pub type PluginError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias for plugin hooks.
pub type PluginResult = Result<(), PluginError>;

/// Read-only view of the owning session handed to hooks.
///
/// A back-reference, never ownership: plugins observe the session, they
/// cannot destroy it.
#[derive(Debug, Clone, Copy)]
pub struct SessionContext<'a> {
    /// The owning session's identifier.
    pub session_id: Uuid,

    /// The owning session's resolved configuration.
    pub config: &'a SessionConfig,
}

impl<'a> SessionContext<'a> {
    /// Creates a context view.
    #[inline]
    #[must_use]
    pub fn new(session_id: Uuid, config: &'a SessionConfig) -> Self {
        Self { session_id, config }
    }
}

/// A lifecycle extension point.
///
/// Implement whichever hooks apply; the defaults do nothing.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Stable name used in log events.
    fn name(&self) -> &str;

    /// Runs after the session reaches the active state.
    async fn on_setup(&self, _ctx: &SessionContext<'_>) -> PluginResult {
        Ok(())
    }

    /// Runs while the session is closing, before the report is flushed.
    async fn on_teardown(&self, _ctx: &SessionContext<'_>) -> PluginResult {
        Ok(())
    }
}

// ============================================================================
// PluginHost
// ============================================================================

/// Registry invoking plugin hooks in registration order.
#[derive(Default)]
pub struct PluginHost {
    plugins: Mutex<Vec<Arc<dyn Plugin>>>,
}

impl PluginHost {
    /// Creates an empty host.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a plugin.
    ///
    /// Registration order defines hook invocation order.
    pub fn register(&self, plugin: Arc<dyn Plugin>) {
        debug!(plugin = plugin.name(), "registering plugin");
        self.plugins.lock().push(plugin);
    }

    /// Returns the number of registered plugins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.lock().len()
    }

    /// Returns `true` if no plugins are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.lock().is_empty()
    }

    /// Invokes every plugin's setup hook in registration order.
    ///
    /// Failures are logged per plugin and never propagate.
    pub async fn notify_setup(&self, ctx: &SessionContext<'_>) {
        for plugin in self.snapshot() {
            debug!(plugin = plugin.name(), "running setup hook");
            if let Err(e) = plugin.on_setup(ctx).await {
                warn!(plugin = plugin.name(), error = %e, "setup hook failed");
            }
        }
    }

    /// Invokes every plugin's teardown hook in registration order.
    ///
    /// Failures are logged per plugin and never propagate.
    pub async fn notify_teardown(&self, ctx: &SessionContext<'_>) {
        for plugin in self.snapshot() {
            debug!(plugin = plugin.name(), "running teardown hook");
            if let Err(e) = plugin.on_teardown(ctx).await {
                warn!(plugin = plugin.name(), error = %e, "teardown hook failed");
            }
        }
    }

    /// Clones the registration list so hooks run without holding the lock.
    fn snapshot(&self) -> Vec<Arc<dyn Plugin>> {
        self.plugins.lock().clone()
    }
}

impl fmt::Debug for PluginHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginHost")
            .field("plugins", &self.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingPlugin {
        name: String,
        log: Arc<Mutex<Vec<String>>>,
        fail_setup: bool,
        fail_teardown: bool,
    }

    impl RecordingPlugin {
        fn new(name: &str, log: &Arc<Mutex<Vec<String>>>) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                log: Arc::clone(log),
                fail_setup: false,
                fail_teardown: false,
            })
        }

        fn failing(name: &str, log: &Arc<Mutex<Vec<String>>>) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                log: Arc::clone(log),
                fail_setup: true,
                fail_teardown: true,
            })
        }
    }

    #[async_trait]
    impl Plugin for RecordingPlugin {
        fn name(&self) -> &str {
            &self.name
        }

        async fn on_setup(&self, _ctx: &SessionContext<'_>) -> PluginResult {
            self.log.lock().push(format!("{}:setup", self.name));
            if self.fail_setup {
                return Err("setup refused".into());
            }
            Ok(())
        }

        async fn on_teardown(&self, _ctx: &SessionContext<'_>) -> PluginResult {
            self.log.lock().push(format!("{}:teardown", self.name));
            if self.fail_teardown {
                return Err("teardown refused".into());
            }
            Ok(())
        }
    }

    /// Implements no hooks at all; both defaults must be skippable no-ops.
    struct InertPlugin;

    #[async_trait]
    impl Plugin for InertPlugin {
        fn name(&self) -> &str {
            "inert"
        }
    }

    fn context(config: &SessionConfig) -> SessionContext<'_> {
        SessionContext::new(Uuid::new_v4(), config)
    }

    #[tokio::test]
    async fn test_hooks_run_in_registration_order() {
        let host = PluginHost::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        host.register(RecordingPlugin::new("alpha", &log));
        host.register(RecordingPlugin::new("beta", &log));
        host.register(RecordingPlugin::new("gamma", &log));

        let config = SessionConfig::default();
        let ctx = context(&config);
        host.notify_setup(&ctx).await;
        host.notify_teardown(&ctx).await;

        assert_eq!(
            *log.lock(),
            vec![
                "alpha:setup",
                "beta:setup",
                "gamma:setup",
                "alpha:teardown",
                "beta:teardown",
                "gamma:teardown",
            ]
        );
    }

    #[tokio::test]
    async fn test_failing_plugin_does_not_block_others() {
        let host = PluginHost::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        host.register(RecordingPlugin::failing("broken", &log));
        host.register(RecordingPlugin::new("healthy", &log));

        let config = SessionConfig::default();
        let ctx = context(&config);
        host.notify_setup(&ctx).await;
        host.notify_teardown(&ctx).await;

        assert_eq!(
            *log.lock(),
            vec![
                "broken:setup",
                "healthy:setup",
                "broken:teardown",
                "healthy:teardown",
            ]
        );
    }

    #[tokio::test]
    async fn test_plugin_with_default_hooks_is_skipped_quietly() {
        let host = PluginHost::new();
        host.register(Arc::new(InertPlugin));

        let config = SessionConfig::default();
        let ctx = context(&config);
        host.notify_setup(&ctx).await;
        host.notify_teardown(&ctx).await;

        assert_eq!(host.len(), 1);
    }

    #[tokio::test]
    async fn test_context_exposes_session_view() {
        let config = SessionConfig::default();
        let id = Uuid::new_v4();
        let ctx = SessionContext::new(id, &config);

        assert_eq!(ctx.session_id, id);
        assert_eq!(ctx.config.browser, "chrome");
    }

    #[test]
    fn test_empty_host() {
        let host = PluginHost::new();
        assert!(host.is_empty());
        assert_eq!(host.len(), 0);
    }
}
