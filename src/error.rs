//! Error types for bittorrent-runner
//!
//! This module provides the error taxonomy for the orchestration layer:
//! - Validation errors detected before any process launch (missing source, malformed magnet)
//! - Executable availability errors
//! - Process errors (spawn failure vs. clean non-zero exit)
//! - The "process succeeded but produced no artifact" partial-success case
//! - HTTP status code mapping and structured error bodies for the REST surface

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for bittorrent-runner operations
pub type Result<T> = std::result::Result<T, Error>;

/// Which kind of download source a request was about
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// A `.torrent` descriptor file
    TorrentFile,
    /// A magnet URI
    Magnet,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::TorrentFile => write!(f, "torrent file"),
            SourceKind::Magnet => write!(f, "magnet link"),
        }
    }
}

/// Main error type for bittorrent-runner
#[derive(Debug, Error)]
pub enum Error {
    /// The downloader binary is absent or could not be made executable
    #[error("downloader executable not found or not executable: {}", path.display())]
    ExecutableMissing {
        /// Where the executable was expected
        path: PathBuf,
    },

    /// Neither an explicit value nor a preset was supplied
    #[error("no {kind} provided")]
    NoSourceProvided {
        /// The source kind the request asked for
        kind: SourceKind,
    },

    /// A custom magnet string did not start with the `magnet:` scheme
    #[error("invalid magnet link format: {0}")]
    InvalidMagnetFormat(String),

    /// The process could not be started at all
    #[error("failed to start {program}: {reason}")]
    ProcessLaunch {
        /// Program that was being spawned
        program: String,
        /// Underlying OS error
        reason: String,
    },

    /// The process ran and exited with a non-zero code
    #[error("process exited with code {code}")]
    ProcessNonZeroExit {
        /// Exit code reported by the process (-1 when terminated by a signal)
        code: i32,
    },

    /// The process reported success but the expected artifact is absent
    #[error("process succeeded but expected artifact not found at {}", path.display())]
    ArtifactNotFound {
        /// Path where the artifact was expected
        path: PathBuf,
    },

    /// An uploaded file was rejected (wrong extension, empty, or unnamed)
    #[error("invalid upload: {0}")]
    InvalidUpload(String),

    /// A preset name did not match any known preset, or its file is gone
    #[error("preset not found: {0}")]
    PresetNotFound(String),

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "artifact_path")
        key: Option<String>,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error was detected before any process was launched
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::NoSourceProvided { .. }
                | Error::InvalidMagnetFormat(_)
                | Error::PresetNotFound(_)
                | Error::InvalidUpload(_)
        )
    }
}

/// API error response format
///
/// ```json
/// {
///   "error": {
///     "code": "invalid_magnet_format",
///     "message": "invalid magnet link format: http://example.com"
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "executable_missing")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    /// Create a "validation error" error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("validation_error", message)
    }

    /// Create an "internal server error"
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("internal_error", message)
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

/// HTTP status for a machine-readable error code
///
/// The single status table: [`Error::status_code`](ToHttpStatus::status_code)
/// and download result responses both go through it. Unknown codes are 500.
pub fn status_for_code(code: &str) -> u16 {
    match code {
        // 400 Bad Request - nothing to work with
        "no_source_provided" | "invalid_upload" | "config_error" => 400,

        // 404 Not Found
        "preset_not_found" => 404,

        // 422 Unprocessable Entity - malformed input
        "invalid_magnet_format" => 422,

        // 502 Bad Gateway - the downstream tool failed
        "process_non_zero_exit" => 502,

        // 503 Service Unavailable - the tool is not installed
        "executable_missing" => 503,

        // Partial success is still a completed run
        "artifact_not_found" => 200,

        // 500 Internal Server Error
        _ => 500,
    }
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        status_for_code(self.error_code())
    }

    fn error_code(&self) -> &str {
        match self {
            Error::ExecutableMissing { .. } => "executable_missing",
            Error::NoSourceProvided { .. } => "no_source_provided",
            Error::InvalidMagnetFormat(_) => "invalid_magnet_format",
            Error::ProcessLaunch { .. } => "process_launch_error",
            Error::ProcessNonZeroExit { .. } => "process_non_zero_exit",
            Error::ArtifactNotFound { .. } => "artifact_not_found",
            Error::PresetNotFound(_) => "preset_not_found",
            Error::InvalidUpload(_) => "invalid_upload",
            Error::Config { .. } => "config_error",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
            Error::ApiServerError(_) => "api_server_error",
            Error::Other(_) => "internal_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        let details = match &error {
            Error::ExecutableMissing { path } | Error::ArtifactNotFound { path } => {
                Some(serde_json::json!({ "path": path }))
            }
            Error::NoSourceProvided { kind } => Some(serde_json::json!({ "kind": kind })),
            Error::ProcessNonZeroExit { code } => Some(serde_json::json!({ "exit_code": code })),
            Error::Config {
                key: Some(key), ..
            } => Some(serde_json::json!({ "key": key })),
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}
