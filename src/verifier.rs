//! Artifact verification after a download process exits

use crate::error::Error;
use crate::log::LogCollector;
use crate::types::{Invocation, ProcessOutcome};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Classification of a finished download process
#[derive(Debug)]
pub enum Verdict {
    /// Exit code 0 and the artifact exists
    Succeeded {
        /// Path of the produced artifact
        artifact: PathBuf,
    },
    /// Exit code 0 but nothing at the artifact path
    PartialSuccess(Error),
    /// Non-zero exit, whether or not an artifact exists
    Failed(Error),
}

impl Verdict {
    /// Whether this is a full success
    pub fn is_success(&self) -> bool {
        matches!(self, Verdict::Succeeded { .. })
    }
}

/// Verifies that a successful run produced its artifact
#[derive(Clone, Debug)]
pub struct ArtifactVerifier {
    artifact: PathBuf,
    working_dir: PathBuf,
}

impl ArtifactVerifier {
    /// Create a verifier for an expected artifact
    ///
    /// `working_dir` is listed into the log when the artifact is missing.
    pub fn new(artifact: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            artifact: artifact.into(),
            working_dir: working_dir.into(),
        }
    }

    /// Verifier for the artifact of `invocation`, listing the directory the process ran in
    pub fn for_invocation(artifact: impl Into<PathBuf>, invocation: &Invocation) -> Self {
        Self::new(artifact, invocation.working_dir())
    }

    /// Expected artifact path
    pub fn artifact(&self) -> &Path {
        &self.artifact
    }

    /// Classify the outcome, appending diagnostics to `log`
    ///
    /// The artifact is only looked at when the process exited with code 0.
    pub async fn verify(&self, outcome: &ProcessOutcome, log: &mut LogCollector) -> Verdict {
        if !outcome.success() {
            warn!(exit_code = outcome.exit_code, "download process failed");
            return Verdict::Failed(Error::ProcessNonZeroExit {
                code: outcome.exit_code,
            });
        }

        if tokio::fs::try_exists(&self.artifact).await.unwrap_or(false) {
            log.note(&format!("📁 File found: {}", self.artifact.display()));
            info!(path = %self.artifact.display(), "artifact verified");
            return Verdict::Succeeded {
                artifact: self.artifact.clone(),
            };
        }

        warn!(path = %self.artifact.display(), "process succeeded but artifact is missing");
        log.warn(&format!(
            "Expected file not found at: {}",
            self.artifact.display()
        ));
        let files = list_files(&self.working_dir).await;
        log.note(&format!("🔍 Files in working directory: {:?}", files));

        Verdict::PartialSuccess(Error::ArtifactNotFound {
            path: self.artifact.clone(),
        })
    }
}

async fn list_files(dir: &Path) -> Vec<String> {
    let mut names = Vec::new();
    let Ok(mut entries) = tokio::fs::read_dir(dir).await else {
        return names;
    };
    while let Ok(Some(entry)) = entries.next_entry().await {
        let is_file = entry
            .file_type()
            .await
            .map(|t| t.is_file())
            .unwrap_or(false);
        if is_file {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    names
}
