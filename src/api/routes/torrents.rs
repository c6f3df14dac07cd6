//! Metadata and upload handlers.

use super::{InfoRequest, UploadResponse};
use crate::api::AppState;
use crate::error::Error;
use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// POST /info - Metadata for a torrent file or magnet link
///
/// Torrent fields win when either is non-blank; otherwise the magnet fields
/// are used. Always 200: a failed query is reported in the body with `ok = false`.
#[utoipa::path(
    post,
    path = "/info",
    tag = "torrents",
    request_body = InfoRequest,
    responses(
        (status = 200, description = "Metadata text or an error message", body = crate::types::InfoReport)
    )
)]
pub async fn query_info(
    State(state): State<AppState>,
    Json(request): Json<InfoRequest>,
) -> impl IntoResponse {
    let wants_torrent = request
        .torrent_path
        .as_ref()
        .is_some_and(|p| !p.as_os_str().is_empty())
        || request
            .preset_torrent
            .as_deref()
            .is_some_and(|p| !p.trim().is_empty());

    let report = if wants_torrent {
        state
            .client
            .info_torrent(request.torrent_path, request.preset_torrent.as_deref())
            .await
    } else {
        state
            .client
            .info_magnet(request.magnet.as_deref(), request.preset_magnet.as_deref())
            .await
    };
    Json(report)
}

/// POST /torrents/upload - Store an uploaded torrent file
///
/// Expects a multipart form with the torrent in the `file` field. Returns the
/// stored path (to pass to POST /downloads/torrent) and the torrent's metadata.
#[utoipa::path(
    post,
    path = "/torrents/upload",
    tag = "torrents",
    request_body(content = Vec<u8>, description = "Multipart form with a `file` field", content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "File stored", body = UploadResponse),
        (status = 400, description = "Missing or invalid file", body = crate::error::ApiError),
        (status = 500, description = "File could not be stored", body = crate::error::ApiError)
    )
)]
pub async fn upload_torrent(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("").to_string();
        match field.bytes().await {
            Ok(bytes) => upload = Some((file_name, bytes.to_vec())),
            Err(e) => {
                return Error::InvalidUpload(format!("failed to read file: {}", e)).into_response();
            }
        }
    }

    let Some((file_name, bytes)) = upload else {
        return Error::InvalidUpload("no file provided in 'file' field".to_string()).into_response();
    };

    let path = match state.client.store_upload(&file_name, &bytes).await {
        Ok(path) => path,
        Err(e) => return e.into_response(),
    };

    let info = state.client.info_torrent(Some(path.clone()), None).await;
    (StatusCode::CREATED, Json(UploadResponse { path, info })).into_response()
}
