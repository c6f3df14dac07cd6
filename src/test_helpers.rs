//! Shared fixtures for unit tests

use crate::config::Config;
use crate::error::Result;
use crate::launcher::ProcessRunner;
use crate::types::{Invocation, ProcessOutcome};
use crate::TorrentClient;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// Runner that stands in for the downloader executable
///
/// Metadata verbs print a fixed two-line description. Download verbs record
/// whether the output path existed beforehand, optionally write the artifact,
/// and print one stdout and one stderr line.
pub(crate) struct ScriptedRunner {
    pub(crate) exit_code: i32,
    pub(crate) write_artifact: bool,
    pub(crate) calls: Mutex<Vec<Invocation>>,
    pub(crate) saw_artifact_before_run: Mutex<Vec<bool>>,
    delay: Duration,
}

impl ScriptedRunner {
    pub(crate) fn new(exit_code: i32, write_artifact: bool) -> Arc<Self> {
        Self::with_delay(exit_code, write_artifact, Duration::ZERO)
    }

    /// Runner whose download verbs take `delay` before producing output
    pub(crate) fn with_delay(exit_code: i32, write_artifact: bool, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            exit_code,
            write_artifact,
            calls: Mutex::new(Vec::new()),
            saw_artifact_before_run: Mutex::new(Vec::new()),
            delay,
        })
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ProcessRunner for ScriptedRunner {
    async fn run(&self, invocation: &Invocation) -> Result<ProcessOutcome> {
        self.calls.lock().unwrap().push(invocation.clone());

        // metadata verbs carry no output path
        let Some(output) = invocation.args().get(2).map(PathBuf::from) else {
            return Ok(ProcessOutcome::from_output(
                self.exit_code,
                b"Name: x\nLength: 100\n",
                b"",
            ));
        };

        self.saw_artifact_before_run
            .lock()
            .unwrap()
            .push(output.exists());
        tokio::time::sleep(self.delay).await;
        if self.write_artifact {
            std::fs::write(&output, b"GIF89a").unwrap();
        }
        Ok(ProcessOutcome::from_output(
            self.exit_code,
            b"codecrafters.peer connected\n",
            b"\nchoked\n",
        ))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Config rooted in a fresh temp dir with one torrent preset and one magnet preset
///
/// The executable file is created only when `exe_present` is set.
pub(crate) fn test_config(exe_present: bool) -> (Config, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let exe = dir.path().join("bittorrent");
    if exe_present {
        std::fs::write(&exe, "#!/bin/sh\n").unwrap();
    }
    std::fs::write(dir.path().join("sample.torrent"), b"d4:infoe").unwrap();
    std::fs::write(
        dir.path().join("magnets.txt"),
        "sample: magnet:?xt=urn:btih:PRESET\n",
    )
    .unwrap();

    let mut config = Config::default();
    config.tools.executable_path = exe;
    config.presets.magnet_file = dir.path().join("magnets.txt");
    config.presets.torrent_dir = dir.path().to_path_buf();
    config.presets.upload_dir = dir.path().join("uploads");
    (config, dir)
}

/// Client over [`test_config`] driven by `runner`
pub(crate) async fn create_test_client(
    runner: Arc<ScriptedRunner>,
    exe_present: bool,
) -> (TorrentClient, TempDir) {
    let (config, dir) = test_config(exe_present);
    let client = TorrentClient::with_runner(config, runner).await;
    (client, dir)
}
