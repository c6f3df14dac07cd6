//! REST API server module
//!
//! Provides the HTTP control surface for the downloader: preset listing,
//! metadata queries, torrent uploads, downloads, log polling and an event
//! stream.

use crate::{Config, Result, TorrentClient};
use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod error_response;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::AppState;

/// Create the API router with all route definitions
///
/// # Routes
///
/// ## Downloads
/// - `POST /downloads/torrent` - Download from an uploaded or preset torrent file
/// - `POST /downloads/magnet` - Download from a custom or preset magnet link
/// - `GET /logs` - Log of the most recent download
///
/// ## Torrents
/// - `POST /info` - Metadata for a torrent file or magnet link
/// - `POST /torrents/upload` - Store an uploaded torrent file and query its metadata
///
/// ## Presets
/// - `GET /presets` - List preset magnet links and torrent files
/// - `POST /presets/reload` - Re-read the preset sources
///
/// ## System
/// - `GET /health` - Health check
/// - `GET /openapi.json` - OpenAPI specification
/// - `GET /events` - Server-sent events stream
pub fn create_router(client: Arc<TorrentClient>, config: Arc<Config>) -> Router {
    let state = AppState::new(client, config.clone());

    let router = Router::new()
        // Downloads
        .route("/downloads/torrent", post(routes::download_torrent))
        .route("/downloads/magnet", post(routes::download_magnet))
        .route("/logs", get(routes::current_logs))
        // Torrents
        .route("/info", post(routes::query_info))
        .route("/torrents/upload", post(routes::upload_torrent))
        // Presets
        .route("/presets", get(routes::list_presets))
        .route("/presets/reload", post(routes::reload_presets))
        // System
        .route("/health", get(routes::health_check))
        .route("/openapi.json", get(routes::openapi_spec))
        .route("/events", get(routes::event_stream))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if config.server.cors_enabled {
        router.layer(build_cors_layer(&config.server.cors_origins))
    } else {
        router
    }
}

/// Build a CORS layer based on configured origins
///
/// `"*"` (or an empty list) allows any origin.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_any = origins.iter().any(|o| o == "*");

    if allow_any || origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Start the API server on the configured bind address.
///
/// Runs until the server fails; see [`serve_with_shutdown`] for a stoppable variant.
///
/// # Example
///
/// ```no_run
/// use bittorrent_runner::{Config, TorrentClient};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Arc::new(Config::default());
/// let client = Arc::new(TorrentClient::new((*config).clone()).await);
///
/// // Start API server (blocks until shutdown)
/// bittorrent_runner::api::start_api_server(client, config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_api_server(client: Arc<TorrentClient>, config: Arc<Config>) -> Result<()> {
    serve_with_shutdown(client, config, std::future::pending::<()>()).await
}

/// Serve the API until `shutdown` resolves, letting in-flight requests finish
pub async fn serve_with_shutdown<F>(
    client: Arc<TorrentClient>,
    config: Arc<Config>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let bind_address = config.server.bind_address;

    tracing::info!(address = %bind_address, "Starting API server");

    let app = create_router(client, config);

    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(crate::error::Error::Io)?;

    tracing::info!(address = %bind_address, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| crate::error::Error::ApiServerError(e.to_string()))?;

    tracing::info!("API server stopped");
    Ok(())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
