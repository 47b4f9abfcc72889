use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::models::schema::{FieldViolation, ValidationError};
use crate::models::PayloadError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<PayloadError> for ApiError {
    fn from(err: PayloadError) -> Self {
        match err {
            PayloadError::Invalid(err) => ApiError::Validation(err),
            other @ PayloadError::Serialize { .. } => ApiError::Internal(other.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<FieldViolation>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, fields) = match self {
            ApiError::Validation(err) => {
                tracing::warn!("{} payload failed validation: {}", err.entity, message);
                (StatusCode::UNPROCESSABLE_ENTITY, err.violations)
            }
            ApiError::Internal(_) => {
                tracing::error!("{}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, Vec::new())
            }
        };

        let body = Json(ErrorResponse {
            error: status.to_string(),
            message,
            fields,
        });

        (status, body).into_response()
    }
}
