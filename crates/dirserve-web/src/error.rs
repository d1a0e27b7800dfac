use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use dirserve_core::CoreError;
use serde::Serialize;

#[derive(Debug)]
pub enum AppError {
    /// The request named a path that does not exist.
    NotFound(String),
    /// The request failed its schema, escaped the root or named an invalid file.
    Malformed(String),
    /// A filesystem operation failed. Carries the message shown to the client.
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl AppError {
    /// Maps a core failure to a response, logging the underlying cause.
    ///
    /// Caller-input errors become [`AppError::Malformed`]; everything else
    /// becomes [`AppError::Internal`] carrying `public` as the client message.
    pub fn from_core(err: CoreError, public: &str) -> Self {
        if err.is_malformed_request() {
            tracing::warn!("Rejected request: {err}");
            return AppError::Malformed(err.to_string());
        }
        tracing::error!("{public}: {err}");
        AppError::Internal(public.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Malformed(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = ErrorBody {
            success: false,
            error: message,
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        tracing::error!("Internal error: {:#}", e);
        AppError::Internal("Internal server error".to_string())
    }
}
