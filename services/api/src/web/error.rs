//! services/api/src/web/error.rs
//!
//! JSON error responses shared by every handler.
//!
//! All failures are rendered as `{"message": "...", "field": "..."}` with the
//! matching status code. Internal details are logged and never sent to the client.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mindtrack_core::ports::PortError;
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

/// The body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// Malformed or rejected input. Maps to 400.
    #[error("{message}")]
    Validation {
        message: String,
        field: Option<String>,
    },
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Internal server error")]
    Internal,
}

impl HttpError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.to_string()),
        }
    }

    pub fn unauthorized() -> Self {
        Self::Unauthorized("Unauthorized".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            HttpError::Validation { .. } => StatusCode::BAD_REQUEST,
            HttpError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            HttpError::NotFound(_) => StatusCode::NOT_FOUND,
            HttpError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let field = match &self {
            HttpError::Validation { field, .. } => field.clone(),
            _ => None,
        };
        let body = ErrorBody {
            message: self.to_string(),
            field,
        };
        (status, Json(body)).into_response()
    }
}

impl From<PortError> for HttpError {
    fn from(e: PortError) -> Self {
        match e {
            PortError::Conflict(message) => HttpError::Validation {
                message,
                field: None,
            },
            PortError::Unauthorized => HttpError::unauthorized(),
            PortError::NotFound(message) => HttpError::NotFound(message),
            PortError::Unexpected(details) => {
                error!("Unexpected port failure: {}", details);
                HttpError::Internal
            }
        }
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        HttpError::Validation {
            message: rejection.body_text(),
            field: None,
        }
    }
}
