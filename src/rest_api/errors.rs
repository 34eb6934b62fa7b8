//! # REST API Errors
//!
//! Maps repository outcomes onto HTTP responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::repository::{OperationResult, RepositoryDefect, RepositoryResult};

/// Result type for REST handlers
pub type RestResult<T> = Result<T, RestError>;

/// REST API errors
#[derive(Debug, Clone, Error)]
pub enum RestError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Request body is not acceptable JSON for this route
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Malformed id or payload rejected by the store
    #[error("{0}")]
    Invalid(String),

    /// No document with the requested id
    #[error("No {0} found with this id!")]
    NotFound(&'static str),

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Backing store failed
    #[error("Storage failure: {0}")]
    StorageFailure(String),

    /// Storage driver broke its contract
    #[error("Internal error: {0}")]
    Defect(#[from] RepositoryDefect),
}

impl RestError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            RestError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            RestError::Invalid(_) => StatusCode::BAD_REQUEST,

            // 404 Not Found
            RestError::NotFound(_) => StatusCode::NOT_FOUND,

            // 500 Internal Server Error
            RestError::StorageFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RestError::Defect(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            RestError::InvalidBody(_) => "invalid_body",
            RestError::Invalid(_) => "invalid",
            RestError::NotFound(_) => "not_found",
            RestError::StorageFailure(_) => "storage_failure",
            RestError::Defect(_) => "defect",
        }
    }
}

impl From<JsonRejection> for RestError {
    fn from(rejection: JsonRejection) -> Self {
        RestError::InvalidBody(rejection.body_text())
    }
}

/// Turn a repository outcome into a handler result.
///
/// `resource` names the entity in the not-found message.
pub fn into_rest<T>(resource: &'static str, result: RepositoryResult<T>) -> RestResult<T> {
    match result? {
        OperationResult::Found(value) => Ok(value),
        OperationResult::NotFound => Err(RestError::NotFound(resource)),
        OperationResult::Invalid(reason) => Err(RestError::Invalid(reason)),
        OperationResult::StorageFailure(detail) => Err(RestError::StorageFailure(detail)),
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<&RestError> for ErrorResponse {
    fn from(err: &RestError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            error: err.to_string(),
        }
    }
}

/// Cause of an error response, attached as a response extension so the
/// request logger can report it
#[derive(Debug, Clone)]
pub struct FailureDetail {
    pub kind: &'static str,
    pub error: String,
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse::from(&self));
        let mut response = (self.status_code(), body).into_response();
        response.extensions_mut().insert(FailureDetail {
            kind: self.kind(),
            error: self.to_string(),
        });
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(RestError::InvalidBody("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(RestError::Invalid("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(RestError::NotFound("pizza").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            RestError::StorageFailure("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            RestError::from(RepositoryDefect::Driver("x".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(RestError::NotFound("pizza").to_string(), "No pizza found with this id!");
    }

    #[test]
    fn test_into_rest_covers_every_outcome() {
        assert_eq!(into_rest("pizza", Ok(OperationResult::Found(1))).unwrap(), 1);
        assert!(matches!(
            into_rest::<i32>("pizza", Ok(OperationResult::NotFound)),
            Err(RestError::NotFound("pizza"))
        ));
        assert!(matches!(
            into_rest::<i32>("pizza", Ok(OperationResult::Invalid("bad".into()))),
            Err(RestError::Invalid(_))
        ));
        assert!(matches!(
            into_rest::<i32>("pizza", Ok(OperationResult::StorageFailure("down".into()))),
            Err(RestError::StorageFailure(_))
        ));
        assert!(matches!(
            into_rest::<i32>("pizza", Err(RepositoryDefect::Driver("bad".into()))),
            Err(RestError::Defect(_))
        ));
    }

    #[test]
    fn test_response_carries_failure_detail() {
        let response = RestError::StorageFailure("memory store is offline".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let detail = response.extensions().get::<FailureDetail>().unwrap();
        assert_eq!(detail.kind, "storage_failure");
        assert_eq!(detail.error, "Storage failure: memory store is offline");
    }

    #[test]
    fn test_error_response_body() {
        let body = ErrorResponse::from(&RestError::NotFound("pizza"));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], 404);
        assert_eq!(json["error"], "No pizza found with this id!");
    }
}
