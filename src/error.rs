use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

use crate::dao::storage::StorageError;

/// Message returned for blank guesses.
pub const EMPTY_GUESS_MESSAGE: &str = "Guess must be a non-empty artist name";

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage backend is unavailable.
    #[error("storage unavailable")]
    Unavailable(#[source] StorageError),
    /// The session has no game attached.
    #[error("no game for this session")]
    InvalidSession,
    /// Invalid input provided by the client.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The guess did not produce a comparison.
    #[error("no result")]
    NoResult,
    /// Upstream metadata could not be fetched; carries the client-facing message.
    #[error("upstream failure: {0}")]
    Upstream(String),
    /// Requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        ServiceError::Unavailable(err)
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(err: ValidationErrors) -> Self {
        let message = err
            .field_errors()
            .into_values()
            .flat_map(|errors| errors.iter())
            .find_map(|error| error.message.as_ref().map(ToString::to_string))
            .unwrap_or_else(|| format!("validation failed: {err}"));
        ServiceError::InvalidInput(message)
    }
}

/// Application-level errors that are converted to HTTP responses.
///
/// The display string is the message sent to the client; upstream details are
/// logged where the error is raised and never forwarded.
#[derive(Debug, Error)]
pub enum AppError {
    /// The session has no game attached.
    #[error("Game session invalid")]
    InvalidSession,
    /// A guess was accepted but yielded no comparison.
    #[error("No result returned")]
    NoResult,
    /// Bad request with invalid input.
    #[error("{0}")]
    BadRequest(String),
    /// Requested resource not found.
    #[error("{0}")]
    NotFound(String),
    /// Artist metadata could not be fetched.
    #[error("{0}")]
    Lookup(String),
    /// Storage unavailable.
    #[error("{0}")]
    ServiceUnavailable(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unavailable(_) => {
                AppError::ServiceUnavailable("Storage unavailable".into())
            }
            ServiceError::InvalidSession => AppError::InvalidSession,
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::NoResult => AppError::NoResult,
            ServiceError::Upstream(message) => AppError::Lookup(message),
            ServiceError::NotFound(message) => AppError::NotFound(message),
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Always `"ERROR"`.
    #[schema(value_type = String)]
    pub error: &'static str,
    /// Human readable reason.
    pub message: String,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidSession | AppError::NoResult | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Lookup(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let payload = Json(ErrorBody {
            error: "ERROR",
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_errors_are_bad_requests() {
        let response = AppError::InvalidSession.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidSession.to_string(), "Game session invalid");
        assert_eq!(AppError::NoResult.to_string(), "No result returned");
    }

    #[test]
    fn lookup_errors_are_internal() {
        let err = AppError::Lookup("Could not find that artist".into());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Could not find that artist");
    }

    #[test]
    fn every_service_error_has_a_status() {
        let cases = [
            (ServiceError::InvalidSession, StatusCode::BAD_REQUEST),
            (ServiceError::NoResult, StatusCode::BAD_REQUEST),
            (
                ServiceError::InvalidInput(EMPTY_GUESS_MESSAGE.into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ServiceError::NotFound("Artist not found".into()),
                StatusCode::NOT_FOUND,
            ),
            (
                ServiceError::Upstream("Could not find that artist".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ServiceError::Unavailable(StorageError::unavailable(
                    "down".into(),
                    std::io::Error::other("refused"),
                )),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }
}
