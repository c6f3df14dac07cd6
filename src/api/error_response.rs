//! HTTP error response handling for the API
//!
//! Conversions from domain errors and download results to HTTP responses.

use crate::error::{ApiError, Error, ToHttpStatus, status_for_code};
use crate::types::DownloadResult;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Implement IntoResponse for Error to automatically convert errors to HTTP responses
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let api_error: ApiError = self.into();

        (status_code, Json(api_error)).into_response()
    }
}

/// Implement IntoResponse for ApiError for explicit error responses
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // errors normally go through Error::into_response, which knows the status
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}

/// HTTP status for a download result, derived from its error code
///
/// Full and partial success are both 200.
pub fn download_status(result: &DownloadResult) -> StatusCode {
    match result.error_code.as_deref() {
        None => StatusCode::OK,
        Some(code) => StatusCode::from_u16(status_for_code(code))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

impl IntoResponse for DownloadResult {
    fn into_response(self) -> Response {
        (download_status(&self), Json(self)).into_response()
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceKind;
    use crate::types::DownloadStatus;
    use std::path::PathBuf;

    fn result_with(error: Option<Error>) -> DownloadResult {
        DownloadResult {
            status: DownloadStatus::Failed,
            status_message: String::new(),
            log_text: String::new(),
            artifact_path: None,
            found: false,
            exit_code: None,
            error_code: error.map(|e| e.error_code().to_string()),
        }
    }

    #[test]
    fn test_download_status_matches_error_status() {
        let errors = vec![
            Error::ExecutableMissing {
                path: PathBuf::from("bittorrent"),
            },
            Error::NoSourceProvided {
                kind: SourceKind::Magnet,
            },
            Error::InvalidMagnetFormat("x".into()),
            Error::ProcessLaunch {
                program: "bittorrent".into(),
                reason: "denied".into(),
            },
            Error::ProcessNonZeroExit { code: 1 },
            Error::ArtifactNotFound {
                path: PathBuf::from("out.gif"),
            },
            Error::PresetNotFound("x".into()),
            Error::InvalidUpload("x".into()),
            Error::Io(std::io::Error::other("disk")),
        ];

        for error in errors {
            let expected = error.status_code();
            let result = result_with(Some(error));
            assert_eq!(download_status(&result).as_u16(), expected, "{:?}", result.error_code);
        }
        assert_eq!(download_status(&result_with(None)), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_error_into_response() {
        let error = Error::InvalidMagnetFormat("http://example.com".to_string());
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let api_error: ApiError = serde_json::from_slice(&body).unwrap();

        assert_eq!(api_error.error.code, "invalid_magnet_format");
        assert!(api_error.error.message.contains("http://example.com"));
    }

    #[tokio::test]
    async fn test_executable_missing_into_response() {
        let error = Error::ExecutableMissing {
            path: PathBuf::from("/opt/bt/bittorrent"),
        };
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let api_error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            api_error.error.details.as_ref().unwrap()["path"],
            "/opt/bt/bittorrent"
        );
    }
}
