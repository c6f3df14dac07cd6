//! Fake downloader executables
//!
//! Each fixture is a `/bin/sh` script that understands the four downloader
//! verbs. Every invocation appends its arguments, one per line, to
//! `argv.log` in the working directory.

use std::path::{Path, PathBuf};

/// Name of the file the fake executables append their arguments to
pub const ARGV_LOG: &str = "argv.log";

/// Bytes written as the downloaded artifact
pub const ARTIFACT_CONTENT: &[u8] = b"GIF89a";

/// How the fake downloader behaves on download verbs
#[derive(Clone, Copy, Debug)]
pub enum Behavior {
    /// Write the artifact and exit 0
    Success,
    /// Sleep for a second, then behave like [`Behavior::Success`]
    Slow,
    /// Exit 0 without writing anything
    NoArtifact,
    /// Print an error and exit with the given code
    Fail(i32),
}

fn download_branch(behavior: Behavior) -> String {
    match behavior {
        Behavior::Slow => format!("\n    sleep 1{}", download_branch(Behavior::Success)),
        Behavior::Success => r#"
    [ -e "$3" ] && echo "stale artifact present" >&2
    echo "codecrafters.Peer handshake complete"
    echo ""
    echo "codecrafters.Downloaded piece 0"
    echo "tracker slow" >&2
    printf 'GIF89a' > "$3"
    exit 0"#
            .to_string(),
        Behavior::NoArtifact => r#"
    echo "codecrafters.Nothing to do"
    exit 0"#
            .to_string(),
        Behavior::Fail(code) => format!(
            r#"
    echo "codecrafters.Connecting to peers"
    echo "no peers available" >&2
    exit {code}"#
        ),
    }
}

/// Script body for a fake downloader
pub fn script(behavior: Behavior) -> String {
    format!(
        r#"#!/bin/sh
for arg in "$@"; do printf '%s\n' "$arg" >> {ARGV_LOG}; done
case "$1" in
  info)
    echo "codecrafters.Name: x"
    echo "Length: 100"
    exit 0 ;;
  magnet_info)
    echo "codecrafters.Tracker URL: http://tracker.example/announce"
    echo "codecrafters.Info Hash: ABC"
    exit 0 ;;
  download|magnet_download){branch}
    ;;
  *)
    echo "unknown command: $1" >&2
    exit 2 ;;
esac
"#,
        branch = download_branch(behavior)
    )
}

/// Write an executable fake downloader named `bittorrent` into `dir`
pub fn install_fake_downloader(dir: &Path, behavior: Behavior) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("bittorrent");
    std::fs::write(&path, script(behavior)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Arguments recorded by the fake downloader, one invocation after another
pub fn recorded_args(dir: &Path) -> Vec<String> {
    std::fs::read_to_string(dir.join(ARGV_LOG))
        .map(|s| s.lines().map(str::to_string).collect())
        .unwrap_or_default()
}
