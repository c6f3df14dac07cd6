//! Application state for the API server

use crate::{Config, TorrentClient};
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// Cloned for each request (cheap Arc clone).
#[derive(Clone)]
pub struct AppState {
    /// The torrent client that runs downloads and queries
    pub client: Arc<TorrentClient>,

    /// Configuration (read-only)
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(client: Arc<TorrentClient>, config: Arc<Config>) -> Self {
        Self { client, config }
    }
}
