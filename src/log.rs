//! Download log aggregation
//!
//! A [`LogCollector`] belongs to one download run and ends up in its
//! [`DownloadResult`](crate::types::DownloadResult). The [`LogBoard`] is the
//! process-wide snapshot read by polling clients; it mirrors the collector of
//! the most recent run.

use crate::types::{DownloadSource, Event, Invocation, ProcessOutcome};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

/// Text returned by [`LogBoard::text`] before any run has logged anything
pub const NO_LOGS_PLACEHOLDER: &str = "No logs yet...";

/// Markers opening the line that announces a download, one per source kind
pub const START_MARKERS: [&str; 2] = [
    "📥 Starting download from torrent file:",
    "🧲 Starting download from magnet link",
];
/// Marker prefixed to the line carrying the exit code
pub const EXIT_MARKER: &str = "📊 Process completed with exit code:";

/// Kind of a log entry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    /// Lifecycle marker written by the orchestrator
    Lifecycle,
    /// A line of the process's standard output
    Output,
    /// A line of the process's standard error
    Warning,
}

/// One annotated log entry
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    /// Entry kind
    pub kind: EntryKind,
    /// Display text (prefix already stripped)
    pub text: String,
}

impl LogEntry {
    /// Rendered line, with warnings tagged
    pub fn render(&self) -> String {
        match self.kind {
            EntryKind::Warning => format!("⚠️ {}", self.text),
            EntryKind::Lifecycle | EntryKind::Output => self.text.clone(),
        }
    }
}

/// Ordered log of a single download run
#[derive(Clone, Debug, Default)]
pub struct LogCollector {
    display_prefix: String,
    entries: Vec<LogEntry>,
    published: usize,
}

impl LogCollector {
    /// Create an empty collector that strips `display_prefix` from every line
    pub fn new(display_prefix: impl Into<String>) -> Self {
        Self {
            display_prefix: display_prefix.into(),
            entries: Vec::new(),
            published: 0,
        }
    }

    /// Entries in append order
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Whether nothing has been logged
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Full log joined with newlines
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(LogEntry::render)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn push(&mut self, kind: EntryKind, text: &str) {
        let text = strip_prefix(text, &self.display_prefix);
        self.entries.push(LogEntry { kind, text });
    }

    /// Append the pre-execution markers: start, output path, command, execution start
    pub fn begin(&mut self, source: &DownloadSource, invocation: &Invocation, output: &Path) {
        let start = match source {
            DownloadSource::TorrentFile(path) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                format!("{} {}", START_MARKERS[0], name)
            }
            DownloadSource::MagnetUri(_) => START_MARKERS[1].to_string(),
        };
        self.push(EntryKind::Lifecycle, &start);
        self.push(
            EntryKind::Lifecycle,
            &format!("📁 Download path: {}", output.display()),
        );
        self.push(
            EntryKind::Lifecycle,
            &format!("⚡ Command: {}", invocation.display()),
        );
        self.push(EntryKind::Lifecycle, "🚀 Starting download...");
    }

    /// Append captured output: every stdout line, then non-blank stderr lines as warnings
    pub fn record_output(&mut self, outcome: &ProcessOutcome) {
        for line in &outcome.stdout_lines {
            self.push(EntryKind::Output, line.trim());
        }
        for line in &outcome.stderr_lines {
            let line = line.trim();
            if !line.is_empty() {
                self.push(EntryKind::Warning, line);
            }
        }
    }

    /// Append the exit-code marker followed by the success or failure marker
    pub fn complete(&mut self, exit_code: i32) {
        self.push(EntryKind::Lifecycle, &format!("{} {}", EXIT_MARKER, exit_code));
        if exit_code == 0 {
            self.push(EntryKind::Lifecycle, "✅ Download completed successfully!");
        } else {
            self.push(
                EntryKind::Lifecycle,
                &format!("❌ Download failed with exit code: {}", exit_code),
            );
        }
    }

    /// Append a launch failure; no exit-code marker follows
    pub fn launch_failed(&mut self, reason: &str) {
        self.push(
            EntryKind::Lifecycle,
            &format!("❌ Error during download: {}", reason),
        );
    }

    /// Append a diagnostic warning written by the orchestrator
    pub fn warn(&mut self, text: &str) {
        self.push(EntryKind::Lifecycle, &format!("⚠️ {}", text));
    }

    /// Append an informational lifecycle line
    pub fn note(&mut self, text: &str) {
        self.push(EntryKind::Lifecycle, text);
    }

    fn take_unpublished(&mut self) -> Vec<String> {
        let lines = self.entries[self.published..]
            .iter()
            .map(LogEntry::render)
            .collect();
        self.published = self.entries.len();
        lines
    }
}

/// Whether a rendered line is a start-of-download marker
pub fn is_start_line(line: &str) -> bool {
    START_MARKERS.iter().any(|marker| line.starts_with(marker))
}

/// Remove every occurrence of the internal naming prefix
pub fn strip_prefix(text: &str, prefix: &str) -> String {
    if prefix.is_empty() {
        text.to_string()
    } else {
        text.replace(prefix, "")
    }
}

/// Shared snapshot of the most recent run's log
///
/// Readable at any time; reset once at the start of each run.
#[derive(Clone, Debug)]
pub struct LogBoard {
    lines: Arc<RwLock<Vec<String>>>,
    event_tx: broadcast::Sender<Event>,
}

impl LogBoard {
    /// Create an empty board that announces new lines on `event_tx`
    pub fn new(event_tx: broadcast::Sender<Event>) -> Self {
        Self {
            lines: Arc::new(RwLock::new(Vec::new())),
            event_tx,
        }
    }

    /// Clear the board for a new run
    pub async fn reset(&self) {
        self.lines.write().await.clear();
    }

    /// Copy the collector's not-yet-published lines onto the board
    pub async fn publish(&self, collector: &mut LogCollector) {
        let fresh = collector.take_unpublished();
        if fresh.is_empty() {
            return;
        }

        let mut lines = self.lines.write().await;
        for line in fresh {
            // no subscribers is fine
            self.event_tx.send(Event::LogLine { line: line.clone() }).ok();
            lines.push(line);
        }
    }

    /// Current log text, or the placeholder when nothing has been logged
    pub async fn text(&self) -> String {
        let lines = self.lines.read().await;
        if lines.is_empty() {
            NO_LOGS_PLACEHOLDER.to_string()
        } else {
            lines.join("\n")
        }
    }

    /// Number of lines on the board
    pub async fn len(&self) -> usize {
        self.lines.read().await.len()
    }

    /// Whether the board is empty
    pub async fn is_empty(&self) -> bool {
        self.lines.read().await.is_empty()
    }
}
