//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`downloads`] - Download runs and the log of the latest run
//! - [`torrents`] - Metadata queries and torrent uploads
//! - [`presets`] - Preset magnet links and torrent files
//! - [`system`] - Health, events, OpenAPI

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod downloads;
mod presets;
mod system;
mod torrents;

// Re-export all handlers so `routes::function_name` works
pub use downloads::*;
pub use presets::*;
pub use system::*;
pub use torrents::*;

// ============================================================================
// Request/Response Types (shared across handlers)
// ============================================================================

/// Request body for POST /downloads/torrent
///
/// `uploaded_path` wins over `preset` when both are set.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct TorrentDownloadRequest {
    /// Path returned by POST /torrents/upload
    #[schema(value_type = Option<String>)]
    pub uploaded_path: Option<PathBuf>,
    /// Name of a preset torrent file
    pub preset: Option<String>,
}

/// Request body for POST /downloads/magnet
///
/// A non-blank `custom` link wins over `preset`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct MagnetDownloadRequest {
    /// Magnet link typed by the user (must start with `magnet:`)
    pub custom: Option<String>,
    /// Name of a preset magnet link
    pub preset: Option<String>,
}

/// Request body for POST /info
///
/// Torrent fields take precedence over magnet fields.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct InfoRequest {
    /// Path of a torrent file (for example one returned by POST /torrents/upload)
    #[schema(value_type = Option<String>)]
    pub torrent_path: Option<PathBuf>,
    /// Custom magnet link
    pub magnet: Option<String>,
    /// Name of a preset torrent file
    pub preset_torrent: Option<String>,
    /// Name of a preset magnet link
    pub preset_magnet: Option<String>,
}

/// Response for POST /torrents/upload
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UploadResponse {
    /// Where the file was stored
    #[schema(value_type = String)]
    pub path: PathBuf,
    /// Metadata of the uploaded torrent
    pub info: crate::types::InfoReport,
}

/// Response for GET /presets
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PresetsResponse {
    /// Magnet link presets, in file order
    pub magnets: Vec<crate::types::MagnetPreset>,
    /// Preset torrent file names
    pub torrents: Vec<String>,
}

/// Response for GET /logs
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LogsResponse {
    /// Log text of the latest run, or "No logs yet..."
    pub logs: String,
}
