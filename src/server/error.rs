use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found")]
    NotFound,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unprocessable: {0}")]
    Unprocessable(String),
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

pub type ApiResponse<T> = Result<T, ApiError>;

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    status_code: u16,
    message: &'static str,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ApiError::NotFound => "Not found",
            ApiError::BadRequest(_) => "bad request",
            ApiError::Unprocessable(_) => "request unable to be processed",
            ApiError::MethodNotAllowed => "method not allowed",
            ApiError::Database(_) => "internal server error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Database(error) => tracing::error!("Database error: {:#?}", error),
            ApiError::BadRequest(reason) | ApiError::Unprocessable(reason) => {
                tracing::debug!("Rejected request: {reason}")
            }
            _ => {}
        }
        let status = self.status();
        let body = ErrorBody {
            success: false,
            status_code: status.as_u16(),
            message: self.message(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> ApiError {
        match error {
            sqlx::Error::RowNotFound => ApiError::NotFound,
            error => ApiError::Database(error),
        }
    }
}

// malformed ids in the path are reported as a missing resource
impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> ApiError {
        ApiError::NotFound
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> ApiError {
        ApiError::Unprocessable(rejection.body_text())
    }
}
