//! OpenAPI documentation and schema generation
//!
//! This module defines the OpenAPI specification for the bittorrent-runner
//! REST API using utoipa for compile-time spec generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the bittorrent-runner REST API
///
/// The spec is served at `/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "bittorrent-runner REST API",
        version = "0.1.0",
        description = "REST API for running a command-line BitTorrent downloader: metadata queries, downloads from torrent files or magnet links, and live download logs",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:7860", description = "Local development server")
    ),
    paths(
        // Downloads
        crate::api::routes::download_torrent,
        crate::api::routes::download_magnet,
        crate::api::routes::current_logs,

        // Torrents
        crate::api::routes::query_info,
        crate::api::routes::upload_torrent,

        // Presets
        crate::api::routes::list_presets,
        crate::api::routes::reload_presets,

        // System
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
        crate::api::routes::event_stream,
    ),
    components(schemas(
        // Core types from types.rs
        crate::types::DownloadStatus,
        crate::types::DownloadResult,
        crate::types::InfoReport,
        crate::types::MagnetPreset,
        crate::types::Verb,

        // Config types from config.rs
        crate::config::Config,
        crate::config::ToolsConfig,
        crate::config::OutputConfig,
        crate::config::PresetConfig,
        crate::config::ApiConfig,

        // API request/response types from routes
        crate::api::routes::TorrentDownloadRequest,
        crate::api::routes::MagnetDownloadRequest,
        crate::api::routes::InfoRequest,
        crate::api::routes::UploadResponse,
        crate::api::routes::PresetsResponse,
        crate::api::routes::LogsResponse,

        // Error types from error.rs
        crate::error::ApiError,
        crate::error::ErrorDetail,
        crate::error::SourceKind,
    )),
    tags(
        (name = "downloads", description = "Downloads - Run the downloader and read the latest log"),
        (name = "torrents", description = "Torrents - Metadata queries and torrent file uploads"),
        (name = "presets", description = "Presets - Predefined magnet links and torrent files"),
        (name = "system", description = "System endpoints - Health checks, OpenAPI spec, events"),
    )
)]
pub struct ApiDoc;
