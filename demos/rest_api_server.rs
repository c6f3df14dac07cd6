//! REST API server example
//!
//! This example runs bittorrent-runner with the REST API enabled, driving a
//! downloader binary at `./bittorrent`.
//!
//! After starting, you can:
//! - List presets via GET http://localhost:6789/presets
//! - Upload a torrent via POST http://localhost:6789/torrents/upload (multipart `file` field)
//! - Download via POST http://localhost:6789/downloads/magnet with `{"custom": "magnet:?..."}`
//! - Poll the log via GET http://localhost:6789/logs
//! - Stream events via GET http://localhost:6789/events

use bittorrent_runner::config::{ApiConfig, Config, OutputConfig, PresetConfig, ToolsConfig};
use bittorrent_runner::TorrentClient;
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing (optional)
    // Uncomment if you add tracing-subscriber to your dependencies:
    // tracing_subscriber::fmt::init();

    let tools = ToolsConfig {
        executable_path: "./bittorrent".into(),
        search_path: true, // fall back to a `bittorrent` on PATH
        ..Default::default()
    };

    let api_config = ApiConfig {
        bind_address: "127.0.0.1:6789".parse::<SocketAddr>()?,
        cors_enabled: true,
        cors_origins: vec!["*".to_string()],
    };

    let config = Config {
        tools,
        output: OutputConfig {
            artifact_path: "downloaded_file.gif".into(),
        },
        presets: PresetConfig {
            magnet_file: "magnet_links.txt".into(),
            torrent_dir: ".".into(),
            ..Default::default()
        },
        server: api_config,
    };

    let client = Arc::new(TorrentClient::new(config).await);

    let presets = client.presets().await;
    println!(
        "Loaded {} magnet presets and {} torrent files",
        presets.magnets.len(),
        presets.torrents.len()
    );
    if !client.guard().is_available() {
        println!("Warning: downloader binary not found, downloads will be rejected");
    }

    println!("API listening on http://127.0.0.1:6789 (Ctrl+C to stop)");
    bittorrent_runner::run_with_shutdown(client).await?;

    Ok(())
}
