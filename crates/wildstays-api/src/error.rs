use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use wildstays_booking::{ListingValidation, ReservationError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication required.")]
    Unauthorized,
    #[error("Invalid username or password.")]
    InvalidCredentials,
    #[error("You do not have access to this {0}.")]
    Forbidden(&'static str),
    #[error("{0} not found.")]
    NotFound(&'static str),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("File exceeds the {0} byte limit.")]
    PayloadTooLarge(usize),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Unauthorized | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match self {
            ApiError::Internal(err) => {
                error!("Internal server error: {:#}", err);
                "Something went wrong. Please try again later.".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<ReservationError> for ApiError {
    fn from(err: ReservationError) -> Self {
        match err {
            ReservationError::ListingNotFound(_) => ApiError::NotFound("Listing"),
            ReservationError::InvalidDates(kind) => ApiError::Validation(kind.to_string()),
            ReservationError::Unavailable => ApiError::Conflict(ReservationError::Unavailable.to_string()),
            ReservationError::Storage(e) => ApiError::Internal(
                e.context("An error occurred while creating the reservation"),
            ),
        }
    }
}

impl From<ListingValidation> for ApiError {
    fn from(err: ListingValidation) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}
