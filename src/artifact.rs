//! Failure-artifact naming and storage.
//!
//! When an element wait times out, the wait engine captures a snapshot of the
//! page and persists it through an [`ArtifactSink`] under
//! `element_not_found_<fragment>`, where the fragment is a sanitized slice of
//! the locator value: runs of non-alphanumeric characters collapse to a
//! single `_` and the result is truncated to [`MAX_FRAGMENT_LEN`] characters.
//! The name is filesystem-safe on every platform and collision-tolerant
//! enough for debugging snapshots.

// ============================================================================
// Imports
// ============================================================================

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::selector::By;

// ============================================================================
// Naming
// ============================================================================

/// Prefix for element-wait failure snapshots.
pub const ARTIFACT_PREFIX: &str = "element_not_found";

/// Maximum length of the sanitized locator fragment.
pub const MAX_FRAGMENT_LEN: usize = 20;

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^A-Za-z0-9]+").expect("static pattern is valid"));

/// Sanitizes a locator value into a filesystem-safe name fragment.
///
/// ```
/// use smart_webdriver::artifact::sanitize_fragment;
///
/// assert_eq!(sanitize_fragment("#login-button"), "_login_button");
/// assert_eq!(sanitize_fragment("div > input[name='q']"), "div_input_name_q_");
/// ```
#[must_use]
pub fn sanitize_fragment(value: &str) -> String {
    NON_ALPHANUMERIC
        .replace_all(value, "_")
        .chars()
        .take(MAX_FRAGMENT_LEN)
        .collect()
}

/// Builds the artifact name for a failed locator.
#[must_use]
pub fn artifact_name(by: &By) -> String {
    format!("{ARTIFACT_PREFIX}_{}", sanitize_fragment(by.value()))
}

// ============================================================================
// ArtifactSink
// ============================================================================

/// Write target receiving failure-capture snapshots.
pub trait ArtifactSink: Send + Sync {
    /// Persists a snapshot under `name`, returning where it landed.
    fn store(&self, name: &str, bytes: &[u8]) -> io::Result<PathBuf>;

    /// Human-readable destination used in log events.
    fn describe(&self) -> String;
}

/// Filesystem sink storing PNG snapshots under one directory.
///
/// Creates the directory idempotently on store.
#[derive(Debug, Clone)]
pub struct FsArtifactSink {
    dir: PathBuf,
}

impl FsArtifactSink {
    /// Creates a sink storing into `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The sink's directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ArtifactSink for FsArtifactSink {
    fn store(&self, name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("{name}.png"));
        fs::write(&path, bytes)?;
        Ok(path)
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================
