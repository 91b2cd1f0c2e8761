use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    /// The identity has exhausted its quota. `upgrade` distinguishes
    /// "this feature requires a Pro account" from "free allowance used up".
    #[error("Usage limit reached: {message}")]
    UsageLimit { message: String, upgrade: bool },

    /// Transport or service failure talking to the generative API.
    #[error("AI service error: {0}")]
    Llm(String),

    /// The generative API answered, but the response could not be parsed
    /// into the expected shape. Never consumes quota.
    #[error("AI response format error: {0}")]
    LlmFormat(String),

    #[error("Storage error: {0}")]
    Storage(String),

    /// The feedback webhook is not configured. Surfaced only for feedback
    /// submissions; all other telemetry failures are swallowed.
    #[error("Telemetry endpoint unavailable")]
    TelemetryUnavailable,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, upgrade) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None)
            }
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
                None,
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Access denied".to_string(),
                None,
            ),
            AppError::UsageLimit { message, upgrade } => (
                StatusCode::PAYMENT_REQUIRED,
                "USAGE_LIMIT",
                message.clone(),
                Some(*upgrade),
            ),
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "The AI service failed. This could be due to a network issue or invalid input."
                        .to_string(),
                    None,
                )
            }
            AppError::LlmFormat(msg) => {
                tracing::error!("LLM format error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_FORMAT_ERROR",
                    "The AI returned a response in an unexpected format. \
                     Please try adjusting your inputs and try again."
                        .to_string(),
                    None,
                )
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                    None,
                )
            }
            AppError::TelemetryUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "TELEMETRY_UNAVAILABLE",
                "Feedback service is not available at the moment.".to_string(),
                None,
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(upgrade) = upgrade {
            error["upgrade"] = json!(upgrade);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
