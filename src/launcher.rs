//! Process launcher for the external downloader
//!
//! [`ProcessRunner`] is the seam between the orchestration layer and the OS.
//! [`CommandRunner`] is the real implementation; tests can substitute their
//! own runner to script outcomes.

use crate::error::{Error, Result};
use crate::types::{Invocation, ProcessOutcome};
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Runs one [`Invocation`] to completion
///
/// Implementations run exactly one process per call, without retry or timeout.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run the invocation and wait for it to exit
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProcessLaunch`] when the process could not be started.
    /// A non-zero exit is NOT an error here; it is reported in the outcome.
    async fn run(&self, invocation: &Invocation) -> Result<ProcessOutcome>;

    /// Runner name for logs
    fn name(&self) -> &'static str;
}

/// Runs invocations with [`tokio::process::Command`]
///
/// Arguments are passed as a vector straight to the OS; no shell is involved.
#[derive(Clone, Copy, Debug, Default)]
pub struct CommandRunner;

#[async_trait]
impl ProcessRunner for CommandRunner {
    async fn run(&self, invocation: &Invocation) -> Result<ProcessOutcome> {
        let program = invocation.executable();
        debug!(
            program = %program.display(),
            verb = invocation.verb().as_str(),
            working_dir = %invocation.working_dir().display(),
            "spawning downloader"
        );

        let output = Command::new(program)
            .args(invocation.args())
            .current_dir(invocation.working_dir())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                warn!(program = %program.display(), error = %e, "failed to spawn downloader");
                Error::ProcessLaunch {
                    program: program.display().to_string(),
                    reason: e.to_string(),
                }
            })?;

        // terminated by a signal
        let exit_code = output.status.code().unwrap_or(-1);
        info!(
            verb = invocation.verb().as_str(),
            exit_code,
            "downloader exited"
        );

        Ok(ProcessOutcome::from_output(
            exit_code,
            &output.stdout,
            &output.stderr,
        ))
    }

    fn name(&self) -> &'static str {
        "command"
    }
}

/// Remove whatever sits at the artifact path (file or directory)
///
/// A missing path is not an error.
pub async fn clear_artifact(path: &Path) -> Result<()> {
    let metadata = match tokio::fs::symlink_metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    if metadata.is_dir() {
        tokio::fs::remove_dir_all(path).await?;
    } else {
        tokio::fs::remove_file(path).await?;
    }
    debug!(path = %path.display(), "removed previous artifact");
    Ok(())
}
