//! Error types for the automation session layer.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use smart_webdriver::{By, Result, Session};
//!
//! async fn example(session: &Session) -> Result<()> {
//!     session.navigate("https://example.com").await?;
//!     session.click(&By::css("#submit")).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`] |
//! | Initialization | [`Error::DriverInit`] |
//! | Actions | [`Error::Action`], [`Error::Navigation`] |
//! | Lifecycle | [`Error::SessionClosed`] |
//!
//! An element that fails to appear within its wait timeout is NOT an error:
//! it surfaces as [`crate::wait::Located::NotFound`], a normal outcome value.
//! Only actions that require the element (click, type) translate that outcome
//! into [`Error::Action`].

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when a config source is unreadable, does not parse into a
    /// flat key-value mapping, or a setting value has the wrong type.
    /// Always surfaced before any session exists.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // Initialization Errors
    // ========================================================================
    /// Browser capability could not be acquired.
    ///
    /// Returned when the browser identifier is unrecognized or the driver
    /// factory fails; the session never reaches the active state.
    #[error("Driver initialization failed: {message}")]
    DriverInit {
        /// Description of the initialization failure.
        message: String,
    },

    // ========================================================================
    // Action Errors
    // ========================================================================
    /// A navigation attempt failed.
    ///
    /// The session remains active and usable for subsequent actions.
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL the navigation targeted.
        url: String,
        /// Description of the navigation failure.
        message: String,
    },

    /// A specific action failed after being attempted.
    ///
    /// Covers element-scoped actions (click, type), script execution and
    /// cookie management. The session remains active and usable.
    #[error("Action '{action}' failed: {message}")]
    Action {
        /// Name of the failed action.
        action: String,
        /// Description of the action failure.
        message: String,
    },

    // ========================================================================
    // Lifecycle Errors
    // ========================================================================
    /// Operation attempted on a terminated session.
    ///
    /// Returned for any action after [`crate::session::Session::close`] has
    /// run. This is a caller bug, always surfaced, never recorded.
    #[error("Session is closed: cannot {operation}")]
    SessionClosed {
        /// Operation that was attempted.
        operation: String,
    },
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a driver initialization error.
    #[inline]
    pub fn driver_init(message: impl Into<String>) -> Self {
        Self::DriverInit {
            message: message.into(),
        }
    }

    /// Creates a navigation error.
    #[inline]
    pub fn navigation(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Navigation {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates an action error.
    #[inline]
    pub fn action(action: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Action {
            action: action.into(),
            message: message.into(),
        }
    }

    /// Creates a session closed error.
    #[inline]
    pub fn session_closed(operation: impl Into<String>) -> Self {
        Self::SessionClosed {
            operation: operation.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this error is fatal to session creation.
    ///
    /// Fatal errors surface before a session reaches the active state.
    #[inline]
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config { .. } | Self::DriverInit { .. })
    }

    /// Returns `true` if this is an action-level failure.
    ///
    /// Action-level failures leave the session active and usable.
    #[inline]
    #[must_use]
    pub fn is_action_failure(&self) -> bool {
        matches!(self, Self::Action { .. } | Self::Navigation { .. })
    }

    /// Returns `true` if the session was already closed.
    #[inline]
    #[must_use]
    pub fn is_session_closed(&self) -> bool {
        matches!(self, Self::SessionClosed { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("timeout must be a number");
        assert_eq!(
            err.to_string(),
            "Configuration error: timeout must be a number"
        );
    }

    #[test]
    fn test_action_error_display() {
        let err = Error::action("click", "element not found: css:#submit");
        assert_eq!(
            err.to_string(),
            "Action 'click' failed: element not found: css:#submit"
        );
    }

    #[test]
    fn test_navigation_error_display() {
        let err = Error::navigation("https://example.com", "connection refused");
        assert_eq!(
            err.to_string(),
            "Navigation to https://example.com failed: connection refused"
        );
    }

    #[test]
    fn test_session_closed_display() {
        let err = Error::session_closed("click");
        assert_eq!(err.to_string(), "Session is closed: cannot click");
    }

    #[test]
    fn test_is_fatal() {
        assert!(Error::config("bad value").is_fatal());
        assert!(Error::driver_init("unrecognized browser: opera").is_fatal());
        assert!(!Error::action("click", "boom").is_fatal());
        assert!(!Error::session_closed("navigate").is_fatal());
    }

    #[test]
    fn test_is_action_failure() {
        assert!(Error::action("type", "stale element").is_action_failure());
        assert!(Error::navigation("https://x.test", "dns").is_action_failure());
        assert!(!Error::config("bad").is_action_failure());
    }

    #[test]
    fn test_is_session_closed() {
        assert!(Error::session_closed("cookie").is_session_closed());
        assert!(!Error::driver_init("no factory").is_session_closed());
    }
}
