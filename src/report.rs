//! Action outcome aggregation and HTML report rendering.
//!
//! Each session owns one [`Reporter`]. Every action appends exactly one
//! [`ActionRecord`] the moment it concludes; records are immutable once
//! appended and accumulate in arrival order. On session close the reporter
//! renders one self-contained HTML document (summary header plus one table
//! row per record, PASS/FAIL styled apart, durations to two decimals) and
//! writes it through a [`ReportSink`]. A sink failure is logged, never
//! raised: the report must not mask the outcomes it describes.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use smart_webdriver::{ActionRecord, FsReportSink, Reporter};
//!
//! let reporter = Reporter::new(session_id);
//! reporter.add_result(ActionRecord::pass("click", "css:#submit", Duration::from_millis(420)));
//! reporter.generate(&FsReportSink::new("reports"));
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Local};
use parking_lot::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

// ============================================================================
// Status
// ============================================================================

/// Outcome of one attempted action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The action completed.
    Pass,
    /// The action failed (including element-not-found outcomes).
    Fail,
}

impl Status {
    /// Returns the uppercase label shown in reports.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
        }
    }

    /// Returns `true` for [`Status::Pass`].
    #[inline]
    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Returns the CSS class used in the rendered report.
    #[inline]
    #[must_use]
    fn css_class(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ActionRecord
// ============================================================================

/// One committed action outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRecord {
    /// Action name (`click`, `navigate`, ...).
    pub name: String,
    /// PASS or FAIL.
    pub status: Status,
    /// Human-readable detail: target locator, failure message.
    pub message: String,
    /// Measured wall-clock duration of the attempt.
    pub duration: Duration,
    /// When the action concluded.
    pub timestamp: DateTime<Local>,
}

impl ActionRecord {
    /// Creates a record with an explicit status.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        status: Status,
        message: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            status,
            message: message.into(),
            duration,
            timestamp: Local::now(),
        }
    }

    /// Creates a PASS record.
    #[inline]
    #[must_use]
    pub fn pass(name: impl Into<String>, message: impl Into<String>, duration: Duration) -> Self {
        Self::new(name, Status::Pass, message, duration)
    }

    /// Creates a FAIL record.
    #[inline]
    #[must_use]
    pub fn fail(name: impl Into<String>, message: impl Into<String>, duration: Duration) -> Self {
        Self::new(name, Status::Fail, message, duration)
    }
}

// ============================================================================
// ReportSink
// ============================================================================

/// Write target receiving one rendered report per session teardown.
pub trait ReportSink: Send + Sync {
    /// Persists the rendered document.
    fn write_report(&self, html: &str) -> io::Result<()>;

    /// Human-readable destination used in log events.
    fn describe(&self) -> String;
}

/// Filesystem sink writing `<dir>/<filename>`.
///
/// Creates the directory idempotently on write.
#[derive(Debug, Clone)]
pub struct FsReportSink {
    dir: PathBuf,
    filename: String,
}

impl FsReportSink {
    /// Default report file name.
    pub const DEFAULT_FILENAME: &'static str = "session_report.html";

    /// Creates a sink writing into `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            filename: Self::DEFAULT_FILENAME.to_string(),
        }
    }

    /// Overrides the report file name.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// Full path of the report file.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.filename)
    }
}

impl ReportSink for FsReportSink {
    fn write_report(&self, html: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(), html)
    }

    fn describe(&self) -> String {
        self.path().display().to_string()
    }
}

// ============================================================================
// Reporter
// ============================================================================

/// Per-session outcome aggregator.
///
/// Owned by exactly one session; never shared across sessions.
pub struct Reporter {
    session_id: Uuid,
    records: Mutex<Vec<ActionRecord>>,
}

impl Reporter {
    /// Creates an empty reporter for a session.
    #[must_use]
    pub fn new(session_id: Uuid) -> Self {
        Self {
            session_id,
            records: Mutex::new(Vec::new()),
        }
    }

    /// Appends a record.
    ///
    /// Records are immutable once appended and keep arrival order.
    pub fn add_result(&self, record: ActionRecord) {
        debug!(
            session_id = %self.session_id,
            action = %record.name,
            status = %record.status,
            "recording action outcome"
        );
        self.records.lock().push(record);
    }

    /// Returns a snapshot of the accumulated records.
    #[must_use]
    pub fn records(&self) -> Vec<ActionRecord> {
        self.records.lock().clone()
    }

    /// Returns the number of accumulated records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Returns `true` if no records have been committed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Returns how many records passed.
    #[must_use]
    pub fn pass_count(&self) -> usize {
        self.records
            .lock()
            .iter()
            .filter(|r| r.status.is_pass())
            .count()
    }

    /// Returns how many records failed.
    #[must_use]
    pub fn fail_count(&self) -> usize {
        self.len() - self.pass_count()
    }

    /// Renders the report document.
    ///
    /// Self-contained HTML: inline styles, one row per record in
    /// accumulation order, durations formatted to two decimal places.
    #[must_use]
    pub fn render(&self) -> String {
        let records = self.records.lock();

        let mut html = String::with_capacity(1024 + records.len() * 160);
        html.push_str(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
             <title>Automation Report</title>\n<style>\n\
             body { font-family: Arial, sans-serif; margin: 24px; }\n\
             table { border-collapse: collapse; width: 100%; }\n\
             th, td { border: 1px solid #ccc; padding: 6px 10px; text-align: left; }\n\
             th { background: #f0f0f0; }\n\
             .pass { color: #1a7f37; font-weight: bold; }\n\
             .fail { color: #cf222e; font-weight: bold; }\n\
             </style>\n</head>\n<body>\n<h1>Automation Report</h1>\n",
        );

        let passed = records.iter().filter(|r| r.status.is_pass()).count();
        let _ = writeln!(html, "<p>Session: {}</p>", self.session_id);
        let _ = writeln!(
            html,
            "<p>Generated: {}</p>",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        );
        let _ = writeln!(
            html,
            "<p>Total: {} | Passed: {} | Failed: {}</p>",
            records.len(),
            passed,
            records.len() - passed
        );

        html.push_str(
            "<table>\n<tr><th>Action</th><th>Status</th><th>Message</th>\
             <th>Duration (s)</th><th>Time</th></tr>\n",
        );
        for record in records.iter() {
            let _ = writeln!(
                html,
                "<tr><td>{}</td><td class=\"{}\">{}</td><td>{}</td><td>{:.2}</td><td>{}</td></tr>",
                escape(&record.name),
                record.status.css_class(),
                record.status,
                escape(&record.message),
                record.duration.as_secs_f64(),
                record.timestamp.format("%Y-%m-%d %H:%M:%S"),
            );
        }
        html.push_str("</table>\n</body>\n</html>\n");
        html
    }

    /// Renders the report and writes it through `sink`.
    ///
    /// A sink failure is logged at warn level and not raised; report
    /// generation must never mask the outcomes of the recorded actions.
    pub fn generate(&self, sink: &dyn ReportSink) {
        let html = self.render();
        match sink.write_report(&html) {
            Ok(()) => info!(
                session_id = %self.session_id,
                destination = %sink.describe(),
                records = self.len(),
                "report written"
            ),
            Err(e) => warn!(
                session_id = %self.session_id,
                destination = %sink.describe(),
                error = %e,
                "failed to write report"
            ),
        }
    }
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter")
            .field("session_id", &self.session_id)
            .field("records", &self.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Escaping
// ============================================================================

/// Escapes text for embedding in the HTML document.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    fn reporter() -> Reporter {
        Reporter::new(Uuid::new_v4())
    }

    fn row_count(html: &str) -> usize {
        html.matches("<tr><td>").count()
    }

    #[test]
    fn test_records_keep_arrival_order() {
        let reporter = reporter();
        reporter.add_result(ActionRecord::pass("navigate", "https://a.test", Duration::ZERO));
        reporter.add_result(ActionRecord::fail("click", "not found", Duration::ZERO));
        reporter.add_result(ActionRecord::pass("type", "css:#user", Duration::ZERO));

        let names: Vec<String> = reporter.records().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["navigate", "click", "type"]);
        assert_eq!(reporter.pass_count(), 2);
        assert_eq!(reporter.fail_count(), 1);
    }

    #[test]
    fn test_render_contains_one_row_per_record() {
        let reporter = reporter();
        for i in 0..5 {
            reporter.add_result(ActionRecord::pass(
                format!("action{i}"),
                "ok",
                Duration::from_millis(10),
            ));
        }

        let html = reporter.render();
        assert_eq!(row_count(&html), 5);
        assert!(html.contains("Total: 5 | Passed: 5 | Failed: 0"));

        // Accumulation order is preserved in the document.
        let first = html.find("action0").unwrap();
        let last = html.find("action4").unwrap();
        assert!(first < last);
    }

    #[test]
    fn test_render_distinguishes_pass_and_fail() {
        let reporter = reporter();
        reporter.add_result(ActionRecord::pass("click", "css:#ok", Duration::ZERO));
        reporter.add_result(ActionRecord::fail("click", "element not found", Duration::ZERO));

        let html = reporter.render();
        assert!(html.contains(r#"<td class="pass">PASS</td>"#));
        assert!(html.contains(r#"<td class="fail">FAIL</td>"#));
    }

    #[test]
    fn test_render_formats_duration_to_two_decimals() {
        let reporter = reporter();
        reporter.add_result(ActionRecord::pass("wait", "", Duration::from_millis(1234)));
        reporter.add_result(ActionRecord::pass("fast", "", Duration::from_millis(5)));

        let html = reporter.render();
        assert!(html.contains("<td>1.23</td>"));
        assert!(html.contains("<td>0.01</td>"));
    }

    #[test]
    fn test_render_escapes_html() {
        let reporter = reporter();
        reporter.add_result(ActionRecord::fail(
            "script",
            r#"<script>alert("x")</script> & more"#,
            Duration::ZERO,
        ));

        let html = reporter.render();
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&amp; more"));
    }

    #[test]
    fn test_render_empty_report() {
        let html = reporter().render();
        assert_eq!(row_count(&html), 0);
        assert!(html.contains("Total: 0 | Passed: 0 | Failed: 0"));
    }

    #[test]
    fn test_fs_sink_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FsReportSink::new(dir.path().join("nested").join("reports"));

        let reporter = reporter();
        reporter.add_result(ActionRecord::pass("click", "css:#go", Duration::ZERO));
        reporter.generate(&sink);

        let written = fs::read_to_string(sink.path()).unwrap();
        assert!(written.contains("css:#go"));
    }

    #[test]
    fn test_fs_sink_custom_filename() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FsReportSink::new(dir.path()).with_filename("run42.html");
        assert!(sink.path().ends_with("run42.html"));
    }

    #[test]
    fn test_sink_failure_is_swallowed() {
        struct BrokenSink;

        impl ReportSink for BrokenSink {
            fn write_report(&self, _html: &str) -> io::Result<()> {
                Err(io::Error::other("disk full"))
            }
            fn describe(&self) -> String {
                "broken".to_string()
            }
        }

        let reporter = reporter();
        reporter.add_result(ActionRecord::pass("click", "", Duration::ZERO));
        // Must not panic or propagate.
        reporter.generate(&BrokenSink);
        assert_eq!(reporter.len(), 1);
    }

    #[test]
    fn test_capturing_sink_receives_rendered_document() {
        #[derive(Default)]
        struct CapturingSink {
            html: Arc<Mutex<Option<String>>>,
        }

        impl ReportSink for CapturingSink {
            fn write_report(&self, html: &str) -> io::Result<()> {
                *self.html.lock() = Some(html.to_string());
                Ok(())
            }
            fn describe(&self) -> String {
                "memory".to_string()
            }
        }

        let sink = CapturingSink::default();
        let captured = Arc::clone(&sink.html);

        let reporter = reporter();
        reporter.add_result(ActionRecord::fail("click", "element not found", Duration::ZERO));
        reporter.generate(&sink);

        let html = captured.lock().clone().unwrap();
        assert!(html.contains("element not found"));
    }

    #[test]
    fn test_status_display() {
        assert_eq!(Status::Pass.to_string(), "PASS");
        assert_eq!(Status::Fail.to_string(), "FAIL");
        assert!(Status::Pass.is_pass());
        assert!(!Status::Fail.is_pass());
    }
}
