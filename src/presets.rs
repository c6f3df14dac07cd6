//! Preset catalog: named magnet links and torrent files offered for selection
//!
//! Magnet presets come from a newline-delimited `name:link` file read once at
//! load time. Torrent presets are the files in a directory with a fixed
//! extension.

use crate::config::PresetConfig;
use crate::error::{Error, Result};
use crate::types::MagnetPreset;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Loaded preset lists
#[derive(Clone, Debug, Default)]
pub struct PresetCatalog {
    /// Magnet link presets, in file order
    pub magnets: Vec<MagnetPreset>,
    /// Torrent file names (not paths), sorted
    pub torrents: Vec<String>,
    torrent_dir: PathBuf,
    upload_dir: PathBuf,
}

impl PresetCatalog {
    /// Load both preset lists. Missing files or directories yield empty lists.
    pub async fn load(config: &PresetConfig) -> Self {
        let magnets = match tokio::fs::read_to_string(&config.magnet_file).await {
            Ok(content) => parse_magnet_lines(&content),
            Err(e) => {
                debug!(
                    path = %config.magnet_file.display(),
                    error = %e,
                    "no magnet preset file"
                );
                Vec::new()
            }
        };

        let torrents = list_torrent_files(&config.torrent_dir, &config.torrent_extension).await;

        debug!(
            magnets = magnets.len(),
            torrents = torrents.len(),
            "loaded presets"
        );

        Self {
            magnets,
            torrents,
            torrent_dir: config.torrent_dir.clone(),
            upload_dir: config.upload_dir.clone(),
        }
    }

    /// Look up a magnet link by preset name
    pub fn magnet(&self, name: &str) -> Result<&str> {
        self.magnets
            .iter()
            .find(|preset| preset.name == name)
            .map(|preset| preset.link.as_str())
            .ok_or_else(|| Error::PresetNotFound(format!("magnet link {}", name)))
    }

    /// Resolve a torrent preset name to a path that currently exists
    pub fn torrent_path(&self, name: &str) -> Result<PathBuf> {
        if !self.torrents.iter().any(|t| t == name) {
            return Err(Error::PresetNotFound(format!("torrent file {}", name)));
        }

        let path = self.torrent_dir.join(name);
        if !path.is_file() {
            warn!(path = %path.display(), "preset torrent file disappeared");
            return Err(Error::PresetNotFound(format!("File {} not found", name)));
        }
        Ok(path)
    }

    /// Canonical path of an uploaded torrent
    ///
    /// Only regular files inside the upload directory are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUpload`] when the path does not exist, is not a
    /// file, or lies outside the upload directory.
    pub fn uploaded_path(&self, path: &Path) -> Result<PathBuf> {
        let rejected =
            || Error::InvalidUpload(format!("{} is not an uploaded torrent", path.display()));

        let upload_dir = std::fs::canonicalize(&self.upload_dir).map_err(|e| {
            debug!(path = %self.upload_dir.display(), error = %e, "upload directory unavailable");
            rejected()
        })?;
        let resolved = std::fs::canonicalize(path).map_err(|_| rejected())?;

        if !resolved.starts_with(&upload_dir) || !resolved.is_file() {
            warn!(path = %path.display(), "refusing torrent path outside the upload directory");
            return Err(rejected());
        }
        Ok(resolved)
    }
}

/// Parse `name:link` lines, splitting on the first colon
///
/// Lines without a colon are skipped, as are lines whose name or link is empty.
pub fn parse_magnet_lines(content: &str) -> Vec<MagnetPreset> {
    content
        .lines()
        .filter_map(|line| {
            let (name, link) = line.trim().split_once(':')?;
            let (name, link) = (name.trim(), link.trim());
            if name.is_empty() || link.is_empty() {
                return None;
            }
            Some(MagnetPreset {
                name: name.to_string(),
                link: link.to_string(),
            })
        })
        .collect()
}

async fn list_torrent_files(dir: &Path, extension: &str) -> Vec<String> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            debug!(path = %dir.display(), error = %e, "no torrent preset directory");
            return Vec::new();
        }
    };

    let mut names = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        let path = entry.path();
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
        if !matches || !path.is_file() {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            names.push(name.to_string());
        }
    }
    names.sort();
    names
}
