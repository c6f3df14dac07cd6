//! The [`TorrentClient`] orchestrator
//!
//! Each download call walks `Idle → SourceResolved → GuardChecked → Running`
//! and ends in exactly one of `Succeeded`, `PartialSuccess` or `Failed`.
//! Download runs are serialized; metadata queries are not.

use crate::config::Config;
use crate::error::{Error, Result, SourceKind, ToHttpStatus};
use crate::guard::ExecutableGuard;
use crate::info::{InfoQuery, error_report};
use crate::launcher::{CommandRunner, ProcessRunner, clear_artifact};
use crate::log::{LogBoard, LogCollector};
use crate::presets::PresetCatalog;
use crate::resolver::{resolve_magnet, resolve_torrent};
use crate::types::{
    DownloadResult, DownloadSource, DownloadStatus, Event, InfoReport, Invocation, absolute,
};
use crate::verifier::{ArtifactVerifier, Verdict};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock, broadcast};
use tracing::{error, info, warn};

/// Orchestrates the external downloader (cloneable - all fields are Arc-wrapped)
#[derive(Clone)]
pub struct TorrentClient {
    /// Configuration (wrapped in Arc for sharing across handlers)
    pub(crate) config: Arc<Config>,
    /// Process runner (trait object so tests can script outcomes)
    pub(crate) runner: Arc<dyn ProcessRunner>,
    /// Preset magnet links and torrent files
    pub(crate) presets: Arc<RwLock<PresetCatalog>>,
    /// Snapshot of the most recent run's log
    pub(crate) log_board: LogBoard,
    /// Held for the whole of a download run
    run_lock: Arc<Mutex<()>>,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: broadcast::Sender<Event>,
}

impl TorrentClient {
    /// Create a client that runs the real downloader executable
    pub async fn new(config: Config) -> Self {
        Self::with_runner(config, Arc::new(CommandRunner)).await
    }

    /// Create a client with a custom process runner
    pub async fn with_runner(config: Config, runner: Arc<dyn ProcessRunner>) -> Self {
        let (event_tx, _rx) = broadcast::channel(1000);
        let presets = PresetCatalog::load(&config.presets).await;

        info!(
            executable = %config.tools.executable_path.display(),
            artifact = %config.artifact_path().display(),
            runner = runner.name(),
            "torrent client ready"
        );

        Self {
            config: Arc::new(config),
            runner,
            presets: Arc::new(RwLock::new(presets)),
            log_board: LogBoard::new(event_tx.clone()),
            run_lock: Arc::new(Mutex::new(())),
            event_tx,
        }
    }

    /// Subscribe to client events
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Get the current configuration
    pub fn get_config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    /// Executable guard built from the configuration
    pub fn guard(&self) -> ExecutableGuard {
        ExecutableGuard::from_config(&self.config.tools)
    }

    /// Current preset lists
    pub async fn presets(&self) -> PresetCatalog {
        self.presets.read().await.clone()
    }

    /// Re-read the magnet list file and the torrent directory
    pub async fn reload_presets(&self) {
        let catalog = PresetCatalog::load(&self.config.presets).await;
        *self.presets.write().await = catalog;
    }

    /// Log of the most recent run, or `"No logs yet..."` when nothing was logged
    pub async fn current_logs(&self) -> String {
        self.log_board.text().await
    }

    /// Download from an uploaded torrent file or a preset torrent
    ///
    /// The uploaded file wins when both are given.
    pub async fn download_torrent(
        &self,
        uploaded: Option<PathBuf>,
        preset: Option<&str>,
    ) -> DownloadResult {
        let resolved = {
            let presets = self.presets.read().await;
            resolve_torrent(uploaded, preset, &presets)
        };
        match resolved {
            Ok(source) => self.download(source).await,
            Err(e) => rejected(e),
        }
    }

    /// Download from a custom magnet link or a preset magnet
    ///
    /// A non-blank custom link wins when both are given; it must start with `magnet:`.
    pub async fn download_magnet(&self, custom: Option<&str>, preset: Option<&str>) -> DownloadResult {
        let resolved = {
            let presets = self.presets.read().await;
            resolve_magnet(custom, preset, &presets)
        };
        match resolved {
            Ok(source) => self.download(source).await,
            Err(e) => rejected(e),
        }
    }

    /// Download a resolved source
    ///
    /// Never fails: every error is folded into the returned [`DownloadResult`].
    /// The run itself happens on a spawned task, so once the process has
    /// started it runs to completion and the log gets its closing markers
    /// even if the caller stops waiting.
    pub async fn download(&self, source: DownloadSource) -> DownloadResult {
        let client = self.clone();
        match tokio::spawn(async move { client.run_download(source).await }).await {
            Ok(result) => result,
            Err(e) => {
                error!(error = %e, "download task failed");
                rejected(Error::Other(format!("download task failed: {}", e)))
            }
        }
    }

    async fn run_download(&self, source: DownloadSource) -> DownloadResult {
        let executable = match self.guard().ensure() {
            Ok(path) => path,
            Err(e) => return rejected(e),
        };

        let _running = self.run_lock.lock().await;

        let source = source.into_absolute();
        let artifact = absolute(&self.config.artifact_path());
        let invocation = Invocation::download(&executable, &source, &artifact);
        let mut log = LogCollector::new(&self.config.tools.display_prefix);

        self.log_board.reset().await;
        self.emit_event(Event::DownloadStarted {
            source: source.clone(),
            at: chrono::Utc::now(),
        });

        log.begin(&source, &invocation, &artifact);
        self.log_board.publish(&mut log).await;

        if let Err(e) = clear_artifact(&artifact).await {
            error!(path = %artifact.display(), error = %e, "cannot remove previous artifact");
            log.launch_failed(&e.to_string());
            return self.finish(log, Err(e)).await;
        }

        info!(
            verb = invocation.verb().as_str(),
            output = %artifact.display(),
            "starting download"
        );

        let outcome = match self.runner.run(&invocation).await {
            Ok(outcome) => outcome,
            Err(e) => {
                log.launch_failed(&e.to_string());
                return self.finish(log, Err(e)).await;
            }
        };

        log.record_output(&outcome);
        log.complete(outcome.exit_code);

        let verifier = ArtifactVerifier::for_invocation(&artifact, &invocation);
        let verdict = verifier.verify(&outcome, &mut log).await;
        let exit_code = outcome.exit_code;
        self.finish(log, Ok((verdict, exit_code))).await
    }

    async fn finish(
        &self,
        mut log: LogCollector,
        ran: Result<(Verdict, i32)>,
    ) -> DownloadResult {
        self.log_board.publish(&mut log).await;
        let log_text = log.render();

        let result = match ran {
            Ok((Verdict::Succeeded { artifact }, exit_code)) => {
                let name = artifact
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                DownloadResult {
                    status: DownloadStatus::Succeeded,
                    status_message: format!("✅ Download completed! File: {}", name),
                    log_text,
                    artifact_path: Some(artifact),
                    found: true,
                    exit_code: Some(exit_code),
                    error_code: None,
                }
            }
            Ok((Verdict::PartialSuccess(e), exit_code)) => DownloadResult {
                status: DownloadStatus::PartialSuccess,
                status_message: "⚠️ Download completed but expected file not found".to_string(),
                log_text,
                artifact_path: None,
                found: false,
                exit_code: Some(exit_code),
                error_code: Some(e.error_code().to_string()),
            },
            Ok((Verdict::Failed(e), exit_code)) => DownloadResult {
                status: DownloadStatus::Failed,
                status_message: "❌ Download failed".to_string(),
                log_text,
                artifact_path: None,
                found: false,
                exit_code: Some(exit_code),
                error_code: Some(e.error_code().to_string()),
            },
            Err(e) => DownloadResult {
                status: DownloadStatus::Failed,
                status_message: format!("❌ Error during download: {}", e),
                log_text,
                artifact_path: None,
                found: false,
                exit_code: None,
                error_code: Some(e.error_code().to_string()),
            },
        };

        self.emit_event(Event::DownloadFinished {
            status: result.status,
            exit_code: result.exit_code,
            at: chrono::Utc::now(),
        });
        result
    }

    /// Metadata for a resolved source
    pub async fn info(&self, source: &DownloadSource) -> InfoReport {
        let query = InfoQuery::new(
            self.guard(),
            Arc::clone(&self.runner),
            self.config.tools.display_prefix.clone(),
        );
        let report = query.query(source).await;
        self.emit_event(Event::InfoQueried { ok: report.ok });
        report
    }

    /// Metadata for an uploaded or preset torrent file
    pub async fn info_torrent(&self, path: Option<PathBuf>, preset: Option<&str>) -> InfoReport {
        let resolved = {
            let presets = self.presets.read().await;
            resolve_torrent(path, preset, &presets)
        };
        match resolved {
            Ok(source) => self.info(&source).await,
            Err(e) => error_report(&e),
        }
    }

    /// Metadata for a custom or preset magnet link
    pub async fn info_magnet(&self, custom: Option<&str>, preset: Option<&str>) -> InfoReport {
        let resolved = {
            let presets = self.presets.read().await;
            resolve_magnet(custom, preset, &presets)
        };
        match resolved {
            Ok(source) => self.info(&source).await,
            Err(e) => error_report(&e),
        }
    }

    /// Store an uploaded torrent file in the upload directory
    ///
    /// Only the final path component of `file_name` is kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUpload`] for an empty body, a missing name, or
    /// a name without the torrent extension.
    pub async fn store_upload(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let name = std::path::Path::new(file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| Error::InvalidUpload("missing file name".to_string()))?;

        let extension = &self.config.presets.torrent_extension;
        let has_extension = std::path::Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if !has_extension {
            return Err(Error::InvalidUpload(format!(
                "{} is not a .{} file",
                name, extension
            )));
        }
        if bytes.is_empty() {
            return Err(Error::InvalidUpload(format!("{} is empty", name)));
        }

        let dir = &self.config.presets.upload_dir;
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(name);
        tokio::fs::write(&path, bytes).await?;
        info!(path = %path.display(), size = bytes.len(), "stored uploaded torrent");
        Ok(path)
    }

    /// Emit an event to all subscribers
    ///
    /// If there are no active subscribers, the event is silently dropped.
    pub(crate) fn emit_event(&self, event: Event) {
        self.event_tx.send(event).ok();
    }

    /// Spawn the REST API server in a background task
    pub fn spawn_api_server(self: &Arc<Self>) -> tokio::task::JoinHandle<Result<()>> {
        let client = self.clone();
        let config = self.config.clone();

        tokio::spawn(async move { crate::api::start_api_server(client, config).await })
    }
}

/// Result for a request that never reached the process launcher
///
/// The shared log is left untouched.
fn rejected(error: Error) -> DownloadResult {
    warn!(error = %error, "download request rejected");
    let status_message = match &error {
        Error::ExecutableMissing { .. } => {
            "❌ Error: BitTorrent binary not found or cannot be made executable".to_string()
        }
        Error::NoSourceProvided {
            kind: SourceKind::TorrentFile,
        } => "❌ No torrent file selected".to_string(),
        Error::NoSourceProvided {
            kind: SourceKind::Magnet,
        } => "❌ No magnet link provided".to_string(),
        Error::InvalidMagnetFormat(_) => "❌ Error: Invalid magnet link format".to_string(),
        other => format!("❌ Error: {}", other),
    };

    DownloadResult {
        status: DownloadStatus::Failed,
        status_message,
        log_text: String::new(),
        artifact_path: None,
        found: false,
        exit_code: None,
        error_code: Some(error.error_code().to_string()),
    }
}
