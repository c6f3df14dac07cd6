//! Executable guard: makes sure the downloader binary is present and runnable
//!
//! The check is synchronous and idempotent. Callers must abort before building
//! any [`Invocation`](crate::types::Invocation) when it fails.

use crate::config::ToolsConfig;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Guards access to the downloader executable
#[derive(Clone, Debug)]
pub struct ExecutableGuard {
    path: PathBuf,
    search_path: bool,
}

impl ExecutableGuard {
    /// Create a guard for an explicit executable path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            search_path: false,
        }
    }

    /// Create a guard from the tools configuration
    pub fn from_config(tools: &ToolsConfig) -> Self {
        Self {
            path: tools.executable_path.clone(),
            search_path: tools.search_path,
        }
    }

    /// Configured executable path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the executable is available (fixing permissions if needed)
    pub fn is_available(&self) -> bool {
        self.ensure().is_ok()
    }

    /// Verify the executable exists, set its execute permission if missing,
    /// and return the absolute path to run.
    ///
    /// When the configured path does not exist and PATH searching is enabled,
    /// the executable's file name is looked up with `which`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExecutableMissing`] when no regular file is found or its
    /// permissions cannot be fixed.
    pub fn ensure(&self) -> Result<PathBuf> {
        if self.path.is_file() {
            make_executable(&self.path)?;
            debug!(path = %self.path.display(), "downloader executable available");
            return Ok(crate::types::absolute(&self.path));
        }

        if self.search_path
            && let Some(name) = self.path.file_name()
            && let Ok(found) = which::which(name)
        {
            info!(
                configured = %self.path.display(),
                found = %found.display(),
                "downloader executable found in PATH"
            );
            return Ok(found);
        }

        warn!(path = %self.path.display(), "downloader executable not found");
        Err(Error::ExecutableMissing {
            path: self.path.clone(),
        })
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let missing = || Error::ExecutableMissing {
        path: path.to_path_buf(),
    };

    let mut perms = std::fs::metadata(path).map_err(|_| missing())?.permissions();
    let mode = perms.mode();
    if mode & 0o111 == 0o111 {
        return Ok(());
    }

    perms.set_mode(mode | 0o755);
    std::fs::set_permissions(path, perms).map_err(|e| {
        warn!(path = %path.display(), error = %e, "cannot make downloader executable");
        missing()
    })?;
    info!(path = %path.display(), "set execute permission on downloader");
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
