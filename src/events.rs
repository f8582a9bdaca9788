//! In-process publish/subscribe bus for action notifications.
//!
//! Each session owns one [`Dispatcher`]. Action methods publish one event per
//! attempt, named after the action (`"click"`, `"navigate"`, ...) with a JSON
//! payload describing the target and outcome. Handlers run synchronously on
//! the dispatching task, in subscription order; a failing handler is logged
//! and skipped, never aborting delivery to the rest. The dispatcher reports
//! on actions, it must not be able to fail them.
//!
//! Handlers must not subscribe from inside a handler: the subscriber table
//! is locked for the duration of a dispatch.
//!
//! # Example
//!
//! ```ignore
//! session.subscribe("click", Box::new(|payload| {
//!     println!("clicked {}", payload["locator"]);
//!     Ok(())
//! }));
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::{debug, warn};

// ============================================================================
// Handler Types
// ============================================================================

/// Error type handlers may return; only ever logged.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// A subscribed event handler.
pub type EventHandler = Box<dyn Fn(&Value) -> Result<(), HandlerError> + Send + Sync>;

// ============================================================================
// Dispatcher
// ============================================================================

/// Synchronous event dispatcher.
///
/// Delivery order for a given event name equals subscription order.
#[derive(Default)]
pub struct Dispatcher {
    subscribers: Mutex<FxHashMap<String, Vec<EventHandler>>>,
}

impl Dispatcher {
    /// Creates an empty dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes a handler to an event name.
    ///
    /// Handlers for the same name are invoked in the order they were added.
    pub fn subscribe(&self, event: impl Into<String>, handler: EventHandler) {
        let event = event.into();
        debug!(event = %event, "subscribing event handler");
        self.subscribers
            .lock()
            .entry(event)
            .or_default()
            .push(handler);
    }

    /// Dispatches `payload` to every handler subscribed to `event`.
    ///
    /// Handler failures are logged at warn level and do not halt delivery
    /// to subsequent handlers. Dispatching an event with no subscribers is
    /// a no-op.
    pub fn dispatch(&self, event: &str, payload: &Value) {
        let subscribers = self.subscribers.lock();
        let Some(handlers) = subscribers.get(event) else {
            return;
        };

        debug!(event = %event, handlers = handlers.len(), "dispatching event");
        for (index, handler) in handlers.iter().enumerate() {
            if let Err(e) = handler(payload) {
                warn!(event = %event, handler = index, error = %e, "event handler failed");
            }
        }
    }

    /// Returns the number of handlers subscribed to `event`.
    #[must_use]
    pub fn subscriber_count(&self, event: &str) -> usize {
        self.subscribers
            .lock()
            .get(event)
            .map_or(0, Vec::len)
    }

    /// Returns `true` if no handlers are subscribed at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.lock().values().all(Vec::is_empty)
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let subscribers = self.subscribers.lock();
        f.debug_struct("Dispatcher")
            .field("events", &subscribers.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use serde_json::json;

    fn recording_handler(log: &Arc<Mutex<Vec<String>>>, tag: &str) -> EventHandler {
        let log = Arc::clone(log);
        let tag = tag.to_string();
        Box::new(move |_payload| {
            log.lock().push(tag.clone());
            Ok(())
        })
    }

    #[test]
    fn test_delivery_order_matches_subscription_order() {
        let dispatcher = Dispatcher::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        dispatcher.subscribe("click", recording_handler(&log, "first"));
        dispatcher.subscribe("click", recording_handler(&log, "second"));
        dispatcher.subscribe("click", recording_handler(&log, "third"));

        dispatcher.dispatch("click", &json!({}));

        assert_eq!(*log.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_failing_handler_does_not_halt_delivery() {
        let dispatcher = Dispatcher::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        dispatcher.subscribe("click", recording_handler(&log, "before"));
        dispatcher.subscribe(
            "click",
            Box::new(|_| Err("handler exploded".into())),
        );
        dispatcher.subscribe("click", recording_handler(&log, "after"));

        dispatcher.dispatch("click", &json!({}));

        assert_eq!(*log.lock(), vec!["before", "after"]);
    }

    #[test]
    fn test_dispatch_without_subscribers_is_noop() {
        let dispatcher = Dispatcher::new();
        dispatcher.dispatch("navigate", &json!({"url": "https://example.com"}));
        assert!(dispatcher.is_empty());
    }

    #[test]
    fn test_handlers_receive_the_payload() {
        let dispatcher = Dispatcher::new();
        let seen = Arc::new(Mutex::new(None));

        let seen_clone = Arc::clone(&seen);
        dispatcher.subscribe(
            "navigate",
            Box::new(move |payload| {
                *seen_clone.lock() = Some(payload.clone());
                Ok(())
            }),
        );

        dispatcher.dispatch("navigate", &json!({"url": "https://example.com"}));

        let seen = seen.lock().clone().unwrap();
        assert_eq!(seen["url"], "https://example.com");
    }

    #[test]
    fn test_events_are_isolated_by_name() {
        let dispatcher = Dispatcher::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        dispatcher.subscribe("click", recording_handler(&log, "click"));
        dispatcher.subscribe("type", recording_handler(&log, "type"));

        dispatcher.dispatch("click", &json!({}));

        assert_eq!(*log.lock(), vec!["click"]);
        assert_eq!(dispatcher.subscriber_count("click"), 1);
        assert_eq!(dispatcher.subscriber_count("type"), 1);
        assert_eq!(dispatcher.subscriber_count("cookie"), 0);
    }

    #[test]
    fn test_debug_output() {
        let dispatcher = Dispatcher::new();
        dispatcher.subscribe("click", Box::new(|_| Ok(())));
        let debug = format!("{dispatcher:?}");
        assert!(debug.contains("Dispatcher"));
    }
}
