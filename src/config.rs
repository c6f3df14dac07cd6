//! Configuration types for bittorrent-runner

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use utoipa::ToSchema;

/// External downloader binary settings
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ToolsConfig {
    /// Path to the downloader executable (default: "./bittorrent")
    #[serde(default = "default_executable_path")]
    pub executable_path: PathBuf,

    /// Search PATH for the executable's file name if it is missing at
    /// `executable_path` (default: false)
    #[serde(default)]
    pub search_path: bool,

    /// Internal naming prefix stripped from every displayed line (default: "codecrafters.")
    #[serde(default = "default_display_prefix")]
    pub display_prefix: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            executable_path: default_executable_path(),
            search_path: false,
            display_prefix: default_display_prefix(),
        }
    }
}

/// Output artifact settings
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct OutputConfig {
    /// Where the downloader writes the assembled artifact (default: "downloaded_file.gif")
    ///
    /// A relative path is resolved against the executable's directory, which is
    /// also the working directory of every invocation.
    #[serde(default = "default_artifact_path")]
    pub artifact_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            artifact_path: default_artifact_path(),
        }
    }
}

/// Preset sources: the magnet list file and the torrent directory
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PresetConfig {
    /// Newline-delimited `name:link` file (default: "../magnet_links.txt")
    #[serde(default = "default_magnet_file")]
    pub magnet_file: PathBuf,

    /// Directory scanned for preset torrent files (default: "..")
    #[serde(default = "default_torrent_dir")]
    pub torrent_dir: PathBuf,

    /// Extension identifying torrent files, without the dot (default: "torrent")
    #[serde(default = "default_torrent_extension")]
    pub torrent_extension: String,

    /// Directory where uploaded torrent files are stored (default: "./uploads")
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
}

impl Default for PresetConfig {
    fn default() -> Self {
        Self {
            magnet_file: default_magnet_file(),
            torrent_dir: default_torrent_dir(),
            torrent_extension: default_torrent_extension(),
            upload_dir: default_upload_dir(),
        }
    }
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Address to bind the API server to (default: 127.0.0.1:7860)
    #[serde(default = "default_bind_address")]
    #[schema(value_type = String)]
    pub bind_address: SocketAddr,

    /// Enable CORS (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins; "*" allows any (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
        }
    }
}

/// Main configuration for [`TorrentClient`](crate::TorrentClient)
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// External downloader binary
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Output artifact location
    #[serde(default)]
    pub output: OutputConfig,

    /// Preset magnet links and torrent files
    #[serde(default)]
    pub presets: PresetConfig,

    /// REST API server
    #[serde(default)]
    pub server: ApiConfig,
}

impl Config {
    /// Directory containing the executable; every invocation runs there
    pub fn working_dir(&self) -> PathBuf {
        match self.tools.executable_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Artifact path, resolved against the working directory when relative
    pub fn artifact_path(&self) -> PathBuf {
        resolve_against(&self.working_dir(), &self.output.artifact_path)
    }
}

fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn default_executable_path() -> PathBuf {
    PathBuf::from("./bittorrent")
}

fn default_display_prefix() -> String {
    "codecrafters.".to_string()
}

fn default_artifact_path() -> PathBuf {
    PathBuf::from("downloaded_file.gif")
}

fn default_magnet_file() -> PathBuf {
    PathBuf::from("../magnet_links.txt")
}

fn default_torrent_dir() -> PathBuf {
    PathBuf::from("..")
}

fn default_torrent_extension() -> String {
    "torrent".to_string()
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("./uploads")
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 7860))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_true() -> bool {
    true
}
