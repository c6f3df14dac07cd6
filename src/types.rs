//! Core types for bittorrent-runner

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use utoipa::ToSchema;

use crate::error::SourceKind;

/// The scheme every magnet URI must start with
pub const MAGNET_SCHEME: &str = "magnet:";

/// A single resolved download source
///
/// Built fresh for every user action and consumed by the launcher or the
/// info query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DownloadSource {
    /// Path to a `.torrent` descriptor
    TorrentFile(PathBuf),
    /// Magnet URI (always starts with `magnet:`)
    MagnetUri(String),
}

impl DownloadSource {
    /// Source kind, for error reporting
    pub fn kind(&self) -> SourceKind {
        match self {
            DownloadSource::TorrentFile(_) => SourceKind::TorrentFile,
            DownloadSource::MagnetUri(_) => SourceKind::Magnet,
        }
    }

    /// The same source with a relative torrent path made absolute
    ///
    /// The downloader runs in its own directory, so relative paths from the
    /// caller's point of view must be fixed up first.
    pub fn into_absolute(self) -> Self {
        match self {
            DownloadSource::TorrentFile(path) => DownloadSource::TorrentFile(absolute(&path)),
            magnet => magnet,
        }
    }

    /// The argument handed to the executable
    pub fn as_arg(&self) -> &std::ffi::OsStr {
        match self {
            DownloadSource::TorrentFile(path) => path.as_os_str(),
            DownloadSource::MagnetUri(uri) => std::ffi::OsStr::new(uri),
        }
    }
}

/// The fixed verb set understood by the downloader executable
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Verb {
    /// `info <torrentPath>`
    Info,
    /// `magnet_info <magnetUri>`
    MagnetInfo,
    /// `download -o <outPath> <torrentPath>`
    Download,
    /// `magnet_download -o <outPath> <magnetUri>`
    MagnetDownload,
}

impl Verb {
    /// Command-line spelling of the verb
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Info => "info",
            Verb::MagnetInfo => "magnet_info",
            Verb::Download => "download",
            Verb::MagnetDownload => "magnet_download",
        }
    }

    /// Metadata verb for a source
    pub fn metadata_for(source: &DownloadSource) -> Self {
        match source {
            DownloadSource::TorrentFile(_) => Verb::Info,
            DownloadSource::MagnetUri(_) => Verb::MagnetInfo,
        }
    }

    /// Download verb for a source
    pub fn download_for(source: &DownloadSource) -> Self {
        match source {
            DownloadSource::TorrentFile(_) => Verb::Download,
            DownloadSource::MagnetUri(_) => Verb::MagnetDownload,
        }
    }
}

/// A fully-specified external invocation
///
/// Immutable once built; the argument vector is passed to the OS directly,
/// never through a shell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    executable: PathBuf,
    verb: Verb,
    args: Vec<std::ffi::OsString>,
    working_dir: PathBuf,
}

impl Invocation {
    /// Metadata query for `source`
    pub fn metadata(executable: &Path, source: &DownloadSource) -> Self {
        let verb = Verb::metadata_for(source);
        Self {
            executable: executable.to_path_buf(),
            verb,
            args: vec![verb.as_str().into(), source.as_arg().to_os_string()],
            working_dir: working_dir_of(executable),
        }
    }

    /// Download of `source` into `output`
    pub fn download(executable: &Path, source: &DownloadSource, output: &Path) -> Self {
        let verb = Verb::download_for(source);
        Self {
            executable: executable.to_path_buf(),
            verb,
            args: vec![
                verb.as_str().into(),
                "-o".into(),
                output.as_os_str().to_os_string(),
                source.as_arg().to_os_string(),
            ],
            working_dir: working_dir_of(executable),
        }
    }

    /// Executable being run
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Verb of this invocation
    pub fn verb(&self) -> Verb {
        self.verb
    }

    /// Argument vector (verb first)
    pub fn args(&self) -> &[std::ffi::OsString] {
        &self.args
    }

    /// Directory the process runs in
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Human-readable command line for logs
    ///
    /// Arguments containing whitespace are single-quoted. This is display only.
    pub fn display(&self) -> String {
        let mut parts = vec![self.executable.to_string_lossy().into_owned()];
        for arg in &self.args {
            let arg = arg.to_string_lossy();
            if arg.chars().any(char::is_whitespace) {
                parts.push(format!("'{}'", arg));
            } else {
                parts.push(arg.into_owned());
            }
        }
        parts.join(" ")
    }
}

/// Absolute form of `path`, or `path` itself if the current directory is unavailable
pub fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn working_dir_of(executable: &Path) -> PathBuf {
    match executable.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Result of one synchronous process run
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// Exit code (-1 when the process was terminated by a signal)
    pub exit_code: i32,
    /// Standard output, split into lines
    pub stdout_lines: Vec<String>,
    /// Standard error, split into lines
    pub stderr_lines: Vec<String>,
}

impl ProcessOutcome {
    /// Build an outcome from raw captured output
    pub fn from_output(exit_code: i32, stdout: &[u8], stderr: &[u8]) -> Self {
        Self {
            exit_code,
            stdout_lines: split_lines(stdout),
            stderr_lines: split_lines(stderr),
        }
    }

    /// Whether the process exited with code 0
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

fn split_lines(raw: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(raw)
        .lines()
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect()
}

/// Final classification of a download call
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DownloadStatus {
    /// Exit code 0 and the artifact exists
    Succeeded,
    /// Exit code 0 but no artifact at the expected path
    PartialSuccess,
    /// Validation, availability, launch, or exit-code failure
    Failed,
}

/// Structured result handed back to the control surface
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DownloadResult {
    /// Final classification
    pub status: DownloadStatus,
    /// Descriptive status line for display
    pub status_message: String,
    /// The complete log of this run, joined with newlines (empty when no run happened)
    pub log_text: String,
    /// Path of the produced artifact (only on full success)
    #[schema(value_type = Option<String>)]
    pub artifact_path: Option<PathBuf>,
    /// Whether the artifact was found
    pub found: bool,
    /// Exit code of the process, if one ran to completion
    pub exit_code: Option<i32>,
    /// Machine-readable error code when the run did not fully succeed
    pub error_code: Option<String>,
}

/// Display text returned by a metadata query
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct InfoReport {
    /// Whether the query succeeded
    pub ok: bool,
    /// Formatted text, prefixed with an info or error marker
    pub text: String,
}

/// A named magnet link preset
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MagnetPreset {
    /// Display name
    pub name: String,
    /// Magnet URI
    pub link: String,
}

/// Events emitted by [`TorrentClient`](crate::TorrentClient)
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A download run began (log was reset)
    DownloadStarted {
        /// Source being downloaded
        source: DownloadSource,
        /// When the run began
        at: DateTime<Utc>,
    },
    /// A line was appended to the current run's log
    LogLine {
        /// The rendered log line
        line: String,
    },
    /// A download run finished
    DownloadFinished {
        /// Final classification
        status: DownloadStatus,
        /// Exit code, if the process ran to completion
        exit_code: Option<i32>,
        /// When the run finished
        at: DateTime<Utc>,
    },
    /// A metadata query completed
    InfoQueried {
        /// Whether the query succeeded
        ok: bool,
    },
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_verb_forms() {
        let exe = Path::new("/opt/bt/bittorrent");
        let torrent = DownloadSource::TorrentFile(PathBuf::from("/data/sample.torrent"));
        let magnet = DownloadSource::MagnetUri("magnet:?xt=urn:btih:ABC".into());
        let out = Path::new("/opt/bt/out.gif");

        let info = Invocation::metadata(exe, &torrent);
        assert_eq!(info.verb(), Verb::Info);
        assert_eq!(info.args(), &["info", "/data/sample.torrent"]);

        let info = Invocation::metadata(exe, &magnet);
        assert_eq!(info.verb(), Verb::MagnetInfo);
        assert_eq!(info.args(), &["magnet_info", "magnet:?xt=urn:btih:ABC"]);

        let dl = Invocation::download(exe, &torrent, out);
        assert_eq!(
            dl.args(),
            &["download", "-o", "/opt/bt/out.gif", "/data/sample.torrent"]
        );

        let dl = Invocation::download(exe, &magnet, out);
        assert_eq!(dl.verb(), Verb::MagnetDownload);
        assert_eq!(
            dl.args(),
            &["magnet_download", "-o", "/opt/bt/out.gif", "magnet:?xt=urn:btih:ABC"]
        );
        assert_eq!(dl.working_dir(), Path::new("/opt/bt"));
    }

    #[test]
    fn test_invocation_keeps_shell_metacharacters_as_one_argument() {
        let exe = Path::new("./bittorrent");
        let magnet = DownloadSource::MagnetUri("magnet:?xt=urn:btih:A'; rm -rf /".into());
        let inv = Invocation::metadata(exe, &magnet);

        assert_eq!(inv.args().len(), 2);
        assert_eq!(inv.args()[1], "magnet:?xt=urn:btih:A'; rm -rf /");
        assert_eq!(inv.working_dir(), Path::new("."));
    }

    #[test]
    fn test_invocation_display_quotes_whitespace() {
        let exe = Path::new("./bittorrent");
        let torrent = DownloadSource::TorrentFile(PathBuf::from("my file.torrent"));
        let inv = Invocation::metadata(exe, &torrent);
        assert_eq!(inv.display(), "./bittorrent info 'my file.torrent'");
    }

    #[test]
    fn test_process_outcome_line_splitting() {
        let outcome = ProcessOutcome::from_output(0, b"Name: x\r\nLength: 100\n", b"");
        assert_eq!(outcome.stdout_lines, vec!["Name: x", "Length: 100"]);
        assert!(outcome.stderr_lines.is_empty());
        assert!(outcome.success());

        let outcome = ProcessOutcome::from_output(2, b"", b"oops\n\nmore");
        assert_eq!(outcome.stderr_lines, vec!["oops", "", "more"]);
        assert!(!outcome.success());
    }

    #[test]
    fn test_download_source_serialization() {
        let json =
            serde_json::to_value(DownloadSource::MagnetUri("magnet:?xt=1".into())).unwrap();
        assert_eq!(json["type"], "magnet_uri");
        assert_eq!(json["value"], "magnet:?xt=1");
    }
}
