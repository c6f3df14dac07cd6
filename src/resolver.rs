//! Download source resolution
//!
//! Each request carries up to two competing inputs per source kind: an
//! explicit value (an uploaded file or a typed magnet link) and a preset
//! name. The explicit value always wins.

use crate::error::{Error, Result, SourceKind};
use crate::presets::PresetCatalog;
use crate::types::{DownloadSource, MAGNET_SCHEME};
use std::path::PathBuf;
use tracing::debug;

/// Resolve a torrent-file request
///
/// # Errors
///
/// - [`Error::InvalidUpload`] when the uploaded path is not a file in the upload directory
/// - [`Error::NoSourceProvided`] when neither input is present
/// - [`Error::PresetNotFound`] when only a preset is given and it cannot be found
pub fn resolve_torrent(
    uploaded: Option<PathBuf>,
    preset: Option<&str>,
    catalog: &PresetCatalog,
) -> Result<DownloadSource> {
    if let Some(path) = uploaded.filter(|p| !p.as_os_str().is_empty()) {
        let path = catalog.uploaded_path(&path)?;
        debug!(path = %path.display(), "using uploaded torrent file");
        return Ok(DownloadSource::TorrentFile(path));
    }

    match non_blank(preset) {
        Some(name) => {
            let path = catalog.torrent_path(name)?;
            debug!(preset = name, path = %path.display(), "using preset torrent file");
            Ok(DownloadSource::TorrentFile(path))
        }
        None => Err(Error::NoSourceProvided {
            kind: SourceKind::TorrentFile,
        }),
    }
}

/// Resolve a magnet request
///
/// A custom link is trimmed and must start with `magnet:`; it is rejected
/// even when a valid preset is also selected.
///
/// # Errors
///
/// - [`Error::InvalidMagnetFormat`] for a custom link without the magnet scheme
/// - [`Error::NoSourceProvided`] when neither input is present
/// - [`Error::PresetNotFound`] when only a preset is given and it is unknown
pub fn resolve_magnet(
    custom: Option<&str>,
    preset: Option<&str>,
    catalog: &PresetCatalog,
) -> Result<DownloadSource> {
    if let Some(link) = non_blank(custom) {
        validate_magnet(link)?;
        debug!("using custom magnet link");
        return Ok(DownloadSource::MagnetUri(link.to_string()));
    }

    match non_blank(preset) {
        Some(name) => {
            let link = catalog.magnet(name)?;
            debug!(preset = name, "using preset magnet link");
            Ok(DownloadSource::MagnetUri(link.to_string()))
        }
        None => Err(Error::NoSourceProvided {
            kind: SourceKind::Magnet,
        }),
    }
}

/// Check that a magnet string carries the magnet scheme
pub fn validate_magnet(link: &str) -> Result<()> {
    if link.starts_with(MAGNET_SCHEME) {
        Ok(())
    } else {
        Err(Error::InvalidMagnetFormat(link.to_string()))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
