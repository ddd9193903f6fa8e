//! HTTP error mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Handler failure, rendered as `{"detail": ...}`
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Models not loaded")]
    NotReady,

    #[error("Error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotReady => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<vartha_core::Error> for AppError {
    fn from(err: vartha_core::Error) -> Self {
        match err {
            vartha_core::Error::NotReady => AppError::NotReady,
            vartha_core::Error::InvalidInput(msg) => AppError::InvalidRequest(msg),
            other => {
                metrics::counter!("vartha_errors_total", "kind" => other.kind()).increment(1);
                AppError::Internal(other.to_string())
            }
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        metrics::counter!("vartha_errors_total", "kind" => "task").increment(1);
        AppError::Internal(format!("inference task failed: {}", err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() && !matches!(self, AppError::NotReady) {
            error!("Classification failed: {:?}", self);
        }

        let body = json!({ "detail": self.to_string() });

        (status, Json(body)).into_response()
    }
}
