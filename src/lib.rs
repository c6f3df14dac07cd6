//! # bittorrent-runner
//!
//! Orchestration layer around a pre-built command-line BitTorrent downloader.
//!
//! ## Design Philosophy
//!
//! bittorrent-runner is designed to be:
//! - **Safe to drive from user input** - Sources are passed as an argument vector, never through a shell
//! - **Honest about outcomes** - A run that exits 0 without producing its artifact is reported as a
//!   partial success, never as a plain success or failure
//! - **Library-first** - The REST API is an optional control surface on top of [`TorrentClient`]
//! - **Event-driven** - Consumers can subscribe to log lines and run lifecycle events
//!
//! ## Quick Start
//!
//! ```no_run
//! use bittorrent_runner::{Config, TorrentClient};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut config = Config::default();
//!     config.tools.executable_path = "/opt/bittorrent/bittorrent".into();
//!
//!     let client = TorrentClient::new(config).await;
//!
//!     let info = client
//!         .info_magnet(Some("magnet:?xt=urn:btih:ad42ce8109f54c99613ce38f9b4d87e70f24a165"), None)
//!         .await;
//!     println!("{}", info.text);
//!
//!     let result = client
//!         .download_magnet(Some("magnet:?xt=urn:btih:ad42ce8109f54c99613ce38f9b4d87e70f24a165"), None)
//!         .await;
//!     println!("{}\n{}", result.status_message, result.log_text);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Download orchestration
pub mod client;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Downloader executable availability
pub mod guard;
/// Metadata queries
pub mod info;
/// Process launching
pub mod launcher;
/// Download log aggregation
pub mod log;
/// Preset magnet links and torrent files
pub mod presets;
/// Download source resolution
pub mod resolver;
/// Core types and events
pub mod types;
/// Artifact verification
pub mod verifier;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used types
pub use client::TorrentClient;
pub use config::{ApiConfig, Config, OutputConfig, PresetConfig, ToolsConfig};
pub use error::{ApiError, Error, ErrorDetail, Result, SourceKind, ToHttpStatus};
pub use guard::ExecutableGuard;
pub use launcher::{CommandRunner, ProcessRunner};
pub use presets::PresetCatalog;
pub use types::{
    DownloadResult, DownloadSource, DownloadStatus, Event, InfoReport, Invocation, MagnetPreset,
    ProcessOutcome, Verb,
};

/// Serve the REST API until a termination signal arrives.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// A download in progress is allowed to finish before the server stops.
///
/// # Example
///
/// ```no_run
/// use bittorrent_runner::{Config, TorrentClient, run_with_shutdown};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = Arc::new(TorrentClient::new(Config::default()).await);
///     run_with_shutdown(client).await?;
///     Ok(())
/// }
/// ```
pub async fn run_with_shutdown(client: std::sync::Arc<TorrentClient>) -> Result<()> {
    let config = client.get_config();
    api::serve_with_shutdown(client, config, wait_for_signal()).await
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Set up signal handlers - these may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
