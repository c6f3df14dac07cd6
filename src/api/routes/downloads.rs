//! Download handlers.

use super::{LogsResponse, MagnetDownloadRequest, TorrentDownloadRequest};
use crate::api::AppState;
use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};

/// POST /downloads/torrent - Download from an uploaded or preset torrent file
///
/// Blocks until the downloader exits. Partial success (exit code 0 but no
/// artifact) is a 200 with `status = "partial_success"`.
#[utoipa::path(
    post,
    path = "/downloads/torrent",
    tag = "downloads",
    request_body = TorrentDownloadRequest,
    responses(
        (status = 200, description = "Download finished (succeeded or partial_success)", body = crate::types::DownloadResult),
        (status = 400, description = "No torrent file selected", body = crate::types::DownloadResult),
        (status = 404, description = "Preset torrent file not found", body = crate::types::DownloadResult),
        (status = 500, description = "Downloader could not be started", body = crate::types::DownloadResult),
        (status = 502, description = "Downloader exited with a non-zero code", body = crate::types::DownloadResult),
        (status = 503, description = "Downloader executable missing", body = crate::types::DownloadResult)
    )
)]
pub async fn download_torrent(
    State(state): State<AppState>,
    Json(request): Json<TorrentDownloadRequest>,
) -> Response {
    state
        .client
        .download_torrent(request.uploaded_path, request.preset.as_deref())
        .await
        .into_response()
}

/// POST /downloads/magnet - Download from a custom or preset magnet link
#[utoipa::path(
    post,
    path = "/downloads/magnet",
    tag = "downloads",
    request_body = MagnetDownloadRequest,
    responses(
        (status = 200, description = "Download finished (succeeded or partial_success)", body = crate::types::DownloadResult),
        (status = 400, description = "No magnet link provided", body = crate::types::DownloadResult),
        (status = 404, description = "Preset magnet link not found", body = crate::types::DownloadResult),
        (status = 422, description = "Custom magnet link has an invalid format", body = crate::types::DownloadResult),
        (status = 500, description = "Downloader could not be started", body = crate::types::DownloadResult),
        (status = 502, description = "Downloader exited with a non-zero code", body = crate::types::DownloadResult),
        (status = 503, description = "Downloader executable missing", body = crate::types::DownloadResult)
    )
)]
pub async fn download_magnet(
    State(state): State<AppState>,
    Json(request): Json<MagnetDownloadRequest>,
) -> Response {
    state
        .client
        .download_magnet(request.custom.as_deref(), request.preset.as_deref())
        .await
        .into_response()
}

/// GET /logs - Log of the most recent download
#[utoipa::path(
    get,
    path = "/logs",
    tag = "downloads",
    responses(
        (status = 200, description = "Current log text", body = LogsResponse)
    )
)]
pub async fn current_logs(State(state): State<AppState>) -> impl IntoResponse {
    Json(LogsResponse {
        logs: state.client.current_logs().await,
    })
}
