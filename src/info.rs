//! Metadata queries
//!
//! An info query runs the metadata verb once and turns its output into
//! display text. It never touches the download log or the artifact, and it
//! never fails: every error becomes an error-prefixed [`InfoReport`].

use crate::error::Error;
use crate::guard::ExecutableGuard;
use crate::launcher::ProcessRunner;
use crate::log::strip_prefix;
use crate::types::{DownloadSource, InfoReport, Invocation};
use std::sync::Arc;
use tracing::{debug, warn};

/// Heading of a successful report
pub const INFO_HEADING: &str = "ℹ️ Torrent Information:";
/// Heading of a report for a failed query
pub const INFO_ERROR_HEADING: &str = "❌ Error getting torrent info:";

/// Stateless metadata query against the downloader
#[derive(Clone)]
pub struct InfoQuery {
    guard: ExecutableGuard,
    runner: Arc<dyn ProcessRunner>,
    display_prefix: String,
}

impl InfoQuery {
    /// Create a query that runs through `runner`
    pub fn new(
        guard: ExecutableGuard,
        runner: Arc<dyn ProcessRunner>,
        display_prefix: impl Into<String>,
    ) -> Self {
        Self {
            guard,
            runner,
            display_prefix: display_prefix.into(),
        }
    }

    /// Query metadata for `source`
    pub async fn query(&self, source: &DownloadSource) -> InfoReport {
        let executable = match self.guard.ensure() {
            Ok(path) => path,
            Err(e) => return error_report(&e),
        };

        let source = source.clone().into_absolute();
        let invocation = Invocation::metadata(&executable, &source);
        debug!(verb = invocation.verb().as_str(), runner = self.runner.name(), "querying metadata");

        match self.runner.run(&invocation).await {
            Ok(outcome) if outcome.success() => InfoReport {
                ok: true,
                text: format!(
                    "{}\n{}",
                    INFO_HEADING,
                    strip_prefix(&outcome.stdout_lines.join("\n"), &self.display_prefix)
                ),
            },
            Ok(outcome) => {
                warn!(exit_code = outcome.exit_code, "metadata query failed");
                InfoReport {
                    ok: false,
                    text: format!(
                        "{}\n{}",
                        INFO_ERROR_HEADING,
                        strip_prefix(&outcome.stderr_lines.join("\n"), &self.display_prefix)
                    ),
                }
            }
            Err(e) => InfoReport {
                ok: false,
                text: format!(
                    "{}\n{}",
                    INFO_ERROR_HEADING,
                    strip_prefix(&e.to_string(), &self.display_prefix)
                ),
            },
        }
    }
}

/// Report for an error raised before the metadata verb could run
pub fn error_report(error: &Error) -> InfoReport {
    let text = match error {
        Error::ExecutableMissing { .. } => {
            "❌ Error: BitTorrent binary not found or cannot be made executable".to_string()
        }
        Error::NoSourceProvided { .. } => "❌ No torrent file or magnet link provided".to_string(),
        Error::InvalidMagnetFormat(_) => "❌ Error: Invalid magnet link format".to_string(),
        other => format!("❌ Error: {}", other),
    };
    InfoReport { ok: false, text }
}
