use axum::{
    extract::{
        multipart::MultipartError,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use skybook_core::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    InvalidBody(String),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            AppError::Core(err) => match err {
                CoreError::RangeViolation { .. }
                | CoreError::InvalidDuration { .. }
                | CoreError::EmptyRequest
                | CoreError::BlankField { .. }
                | CoreError::InvalidImage(_) => StatusCode::BAD_REQUEST,
                CoreError::UniquenessConflict { .. } => StatusCode::CONFLICT,
                CoreError::NotFound { .. } => StatusCode::NOT_FOUND,
                CoreError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Anyhow(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::InvalidBody(_) => "INVALID_BODY",
            AppError::Core(err) => match err {
                CoreError::RangeViolation { .. } => "RANGE_VIOLATION",
                CoreError::InvalidDuration { .. } => "INVALID_DURATION",
                CoreError::UniquenessConflict { .. } => "SEAT_TAKEN",
                CoreError::EmptyRequest => "EMPTY_REQUEST",
                CoreError::BlankField { .. } => "BLANK_FIELD",
                CoreError::InvalidImage(_) => "INVALID_IMAGE",
                CoreError::NotFound { .. } => "NOT_FOUND",
                CoreError::Storage(_) => "INTERNAL",
            },
            AppError::Anyhow(_) => "INTERNAL",
        }
    }

    fn field(&self) -> Option<&str> {
        match self {
            AppError::Core(err) => err.field(),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internal details stay in the log.
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "Internal Server Error");
            "Internal Server Error".to_string()
        } else {
            tracing::debug!(code = self.code(), error = %self, "request rejected");
            self.to_string()
        };

        let body = Json(json!({
            "error": message,
            "code": self.code(),
            "field": self.field(),
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidBody(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidBody(rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::InvalidBody(err.body_text())
    }
}
