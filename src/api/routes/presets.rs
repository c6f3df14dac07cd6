//! Preset handlers.

use super::PresetsResponse;
use crate::api::AppState;
use axum::{Json, extract::State, response::IntoResponse};

/// GET /presets - List preset magnet links and torrent files
#[utoipa::path(
    get,
    path = "/presets",
    tag = "presets",
    responses(
        (status = 200, description = "Preset lists", body = PresetsResponse)
    )
)]
pub async fn list_presets(State(state): State<AppState>) -> impl IntoResponse {
    let catalog = state.client.presets().await;
    Json(PresetsResponse {
        magnets: catalog.magnets,
        torrents: catalog.torrents,
    })
}

/// POST /presets/reload - Re-read the magnet list file and the torrent directory
#[utoipa::path(
    post,
    path = "/presets/reload",
    tag = "presets",
    responses(
        (status = 200, description = "Reloaded preset lists", body = PresetsResponse)
    )
)]
pub async fn reload_presets(State(state): State<AppState>) -> impl IntoResponse {
    state.client.reload_presets().await;
    list_presets(State(state)).await
}
