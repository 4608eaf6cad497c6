use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fanout_core::error::CoreError;
use fanout_dispatch::DispatchError;
use fanout_storage::{StorageError, BUNDLE_EXISTS_MESSAGE};
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain errors of the workspace crates and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce consistent JSON error
/// responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `fanout_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bundle storage error from `fanout_storage`.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A dispatch that could not start (config load or empty roster).
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),

            AppError::Storage(storage) => match storage {
                // Rejected submissions are client errors: nothing was started.
                StorageError::BundleExists(_) => (
                    StatusCode::BAD_REQUEST,
                    "CONFLICT",
                    BUNDLE_EXISTS_MESSAGE.to_string(),
                ),
                StorageError::InvalidSubmitter(_) => {
                    (StatusCode::BAD_REQUEST, "BAD_REQUEST", storage.to_string())
                }
                StorageError::Io { .. } | StorageError::Serialize(_) => {
                    tracing::error!(error = %storage, "Storage error");
                    internal()
                }
            },

            AppError::Dispatch(dispatch) => match dispatch {
                DispatchError::Config(err) => {
                    tracing::error!(error = %err, "Worker configuration could not be loaded");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "CONFIG_ERROR",
                        "Worker configuration could not be loaded".to_string(),
                    )
                }
                DispatchError::Core(core) => classify_core_error(core),
            },

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}
