//! Test configuration helpers

use super::fixtures::{Behavior, install_fake_downloader};
use bittorrent_runner::{Config, TorrentClient};
use tempfile::TempDir;

/// Magnet preset listed in every test configuration
pub const PRESET_MAGNET: &str = "magnet:?xt=urn:btih:PRESET";

/// Configuration rooted in a temp dir
///
/// The layout is `bin/` (executable and artifact), `presets/` (one torrent
/// and the magnet list) and `uploads/`.
pub fn test_config() -> (Config, TempDir) {
    let temp_dir = tempfile::tempdir().unwrap();
    let bin = temp_dir.path().join("bin");
    let presets = temp_dir.path().join("presets");
    std::fs::create_dir_all(&bin).unwrap();
    std::fs::create_dir_all(&presets).unwrap();

    std::fs::write(presets.join("sample.torrent"), b"d4:infoe").unwrap();
    std::fs::write(
        presets.join("magnet_links.txt"),
        format!("sample: {PRESET_MAGNET}\n# not a preset\n"),
    )
    .unwrap();

    let mut config = Config::default();
    config.tools.executable_path = bin.join("bittorrent");
    config.presets.magnet_file = presets.join("magnet_links.txt");
    config.presets.torrent_dir = presets;
    config.presets.upload_dir = temp_dir.path().join("uploads");
    (config, temp_dir)
}

/// Client backed by a fake downloader with the given behavior
pub async fn create_client(behavior: Behavior) -> (TorrentClient, TempDir) {
    let (config, temp_dir) = test_config();
    install_fake_downloader(&temp_dir.path().join("bin"), behavior);
    let client = TorrentClient::new(config).await;
    (client, temp_dir)
}

/// Client whose executable does not exist
pub async fn create_client_without_executable() -> (TorrentClient, TempDir) {
    let (config, temp_dir) = test_config();
    let client = TorrentClient::new(config).await;
    (client, temp_dir)
}
