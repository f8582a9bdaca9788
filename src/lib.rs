//! Smart WebDriver - Browser automation with reporting and plugins.
//!
//! This library provides a high-level API for driving browser automation
//! sessions: resilient element waits, per-action reporting, lifecycle
//! plugins, and event publication, on top of any WebDriver-style client.
//!
//! # Architecture
//!
//! The session is the hub everything hangs off:
//!
//! - Each [`Session`] owns: driver handle + wait engine + dispatcher + plugin host + reporter
//! - Driver acquisition sits behind the [`DriverFactory`] and [`WebDriver`] traits
//! - Every action appends exactly one PASS/FAIL record and publishes one event
//! - A missing element is a value ([`Located::NotFound`]), not an error
//!
//! Key design principles:
//!
//! - Constructor-time wiring: sinks, plugins, and subscribers attach to one
//!   session instance, never to process-global registries
//! - Failure-tolerant teardown: hooks, report flush, and browser shutdown
//!   each log their own failures and the remaining steps still run
//!
//! # Quick Start
//!
//! ```ignore
//! use smart_webdriver::{By, Result, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Launch a session through any DriverFactory implementation
//!     let session = Session::builder()
//!         .factory(factory)
//!         .config_file("automation.json")
//!         .set("timeout", "15")
//!         .launch()
//!         .await?;
//!
//!     // Navigate and interact; every action lands in the report
//!     session.navigate("https://example.com/login").await?;
//!     session.type_text(&By::id("user"), "admin").await?;
//!     session.click(&By::css("button[type=submit]")).await?;
//!
//!     // Teardown hooks run, the HTML report is written, the browser closes
//!     session.close().await;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`artifact`] | Failure screenshot naming and storage |
//! | [`config`] | Layered session configuration |
//! | [`driver`] | Driver abstraction: [`WebDriver`], [`DriverFactory`] |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`events`] | Synchronous per-session event dispatch |
//! | [`logging`] | Opt-in `tracing` subscriber setup |
//! | [`plugin`] | Session lifecycle hooks |
//! | [`proxy`] | Proxy configuration |
//! | [`report`] | Action records and HTML report rendering |
//! | [`selector`] | Element locator strategies |
//! | [`session`] | Session lifecycle and action surface |
//! | [`wait`] | Polling element-wait engine |
//!
//! # Features
//!
//! - **Resilient waits**: presence and visibility polled until a deadline,
//!   with a page screenshot stored on every miss
//! - **Complete reporting**: one self-contained HTML report per session
//! - **Extensible**: plugin hooks at setup and teardown, one event per action
//! - **Driver-agnostic**: any WebDriver client plugs in behind one trait

// ============================================================================
// Modules
// ============================================================================

/// Failure screenshot naming and storage.
///
/// Locator text is sanitized into stable artifact names; sinks decide
/// where the bytes land.
pub mod artifact;

/// Layered session configuration.
///
/// Precedence is defaults, then an optional flat JSON file, then
/// per-call overrides. Unknown keys are ignored with a warning.
pub mod config;

/// Driver abstraction.
///
/// - [`WebDriver`] - a live browser session
/// - [`WebElement`] - a located DOM element
/// - [`DriverFactory`] - launches drivers for a [`BrowserKind`]
pub mod driver;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Synchronous per-session event dispatch.
pub mod events;

/// Opt-in `tracing` subscriber setup.
pub mod logging;

/// Session lifecycle hooks.
///
/// Implement [`Plugin`] and register it on the builder; hooks run in
/// registration order and failures never block other plugins.
pub mod plugin;

/// Proxy configuration.
pub mod proxy;

/// Action records and HTML report rendering.
pub mod report;

/// Element locator strategies.
pub mod selector;

/// Session lifecycle and action surface.
///
/// Use [`Session::builder()`] to configure and launch a session.
pub mod session;

/// Polling element-wait engine.
pub mod wait;

// ============================================================================
// Re-exports
// ============================================================================

// Session types
pub use session::{Session, SessionBuilder};

// Configuration
pub use config::SessionConfig;

// Driver abstraction
pub use driver::{
    BrowserKind, Cookie, DriverError, DriverFactory, DriverResult, WebDriver, WebElement,
};

// Element location
pub use selector::By;
pub use wait::{Located, NotFound, Waiter};

// Proxy types
pub use proxy::{ProxyConfig, ProxyType};

// Events and plugins
pub use events::{Dispatcher, EventHandler, HandlerError};
pub use plugin::{Plugin, PluginError, PluginHost, PluginResult, SessionContext};

// Reporting
pub use artifact::{ArtifactSink, FsArtifactSink};
pub use report::{ActionRecord, FsReportSink, ReportSink, Reporter, Status};

// Error types
pub use error::{Error, Result};
