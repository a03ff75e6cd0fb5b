//! Mock API errors
//!
//! Every error renders as `{ "message": ... }` with its status, the shape
//! the client parses rejections from. Injected faults may carry no message,
//! in which case the body is empty.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use shared::{ErrorBody, ValidationErrors};

#[derive(Debug, thiserror::Error)]
pub enum MockError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    /// Failure configured through the fault controls
    #[error("Injected failure: {status}")]
    Injected {
        status: StatusCode,
        message: Option<String>,
    },
}

impl MockError {
    pub fn not_found(kind: &str, id: &str) -> Self {
        Self::NotFound(format!("{} not found with id: {}", kind, id))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            MockError::Unauthorized => StatusCode::UNAUTHORIZED,
            MockError::Forbidden(_) => StatusCode::FORBIDDEN,
            MockError::NotFound(_) => StatusCode::NOT_FOUND,
            MockError::Conflict(_) => StatusCode::CONFLICT,
            MockError::Validation(_) => StatusCode::BAD_REQUEST,
            MockError::Injected { status, .. } => *status,
        }
    }
}

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            MockError::Injected { message: None, .. } => status.into_response(),
            MockError::Injected {
                message: Some(message),
                ..
            } => (status, Json(ErrorBody::new(message))).into_response(),
            err => (status, Json(ErrorBody::new(err.to_string()))).into_response(),
        }
    }
}

impl From<ValidationErrors> for MockError {
    fn from(errors: ValidationErrors) -> Self {
        MockError::Validation(errors.to_string())
    }
}

impl From<MultipartError> for MockError {
    fn from(e: MultipartError) -> Self {
        MockError::Validation(format!("Multipart error: {}", e))
    }
}

pub type MockResult<T> = Result<T, MockError>;
