use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::export::ExportError;
use crate::interview::session::InterviewError;
use crate::jobs::JobSearchError;
use crate::llm_client::LlmError;
use crate::normalize::NormalizeError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    /// No file or text supplied. Shown to the user as a warning.
    #[error("Input missing: {0}")]
    InputMissing(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Speech was not understood. The user is expected to try again.
    #[error("Recognition failure: {0}")]
    Recognition(String),

    /// Malformed PDF or audio.
    #[error("Decode failure: {0}")]
    Decode(String),

    #[error("External call failed: {0}")]
    ExternalCall(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        AppError::ExternalCall(format!("generative model: {err}"))
    }
}

impl From<JobSearchError> for AppError {
    fn from(err: JobSearchError) -> Self {
        AppError::ExternalCall(format!("job search: {err}"))
    }
}

impl From<NormalizeError> for AppError {
    fn from(err: NormalizeError) -> Self {
        match err {
            NormalizeError::Unrecognized(msg) => AppError::Recognition(msg),
            NormalizeError::Transcription(e) => AppError::from(e),
            err @ (NormalizeError::ToolNotFound { .. } | NormalizeError::Io(_)) => {
                AppError::Internal(anyhow::Error::new(err))
            }
            other => AppError::Decode(other.to_string()),
        }
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        AppError::Internal(anyhow::Error::new(err))
    }
}

impl From<InterviewError> for AppError {
    fn from(err: InterviewError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::InputMissing(msg) => {
                (StatusCode::BAD_REQUEST, "INPUT_MISSING", msg.clone())
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Recognition(msg) => {
                tracing::warn!("Speech recognition failed: {msg}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "RECOGNITION_FAILURE",
                    "Could not understand the audio. Try again.".to_string(),
                )
            }
            AppError::Decode(msg) => {
                tracing::warn!("Decode failure: {msg}");
                (StatusCode::UNPROCESSABLE_ENTITY, "DECODE_FAILURE", msg.clone())
            }
            AppError::ExternalCall(msg) => {
                tracing::error!("External call error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "EXTERNAL_CALL_FAILURE",
                    "An upstream service call failed".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
