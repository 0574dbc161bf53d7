//! Error types for the stages API.
//!
//! `ApiError` is what every request path returns. Lookup failures travel
//! inside it as `StoreError` and keep their own status and message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::core::PipelineId;

/// Errors raised by the lookup collaborators.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The backing store could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The backing store did not answer in time.
    #[error("Store timed out: {0}")]
    Timeout(String),

    /// The store answered with an HTTP-classified failure of its own.
    #[error("{message}")]
    Status {
        /// Status the failure should surface with.
        code: u16,
        /// Message to surface.
        message: String,
    },

    /// Any other backend failure.
    #[error("Store error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Creates an unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout(message.into())
    }

    /// Creates an error carrying an explicit status code.
    #[must_use]
    pub fn status(code: u16, message: impl Into<String>) -> Self {
        Self::Status {
            code,
            message: message.into(),
        }
    }

    /// Creates a generic backend error.
    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Returns the HTTP status this error surfaces with.
    ///
    /// A `Status` code outside 400..=599 surfaces as 500.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Status { code, .. } => StatusCode::from_u16(*code)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Self::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// The error type returned by request handling.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A requested entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The request failed validation.
    #[error("{0}")]
    BadRequest(String),

    /// No usable credential was presented.
    #[error("{0}")]
    Unauthorized(String),

    /// The credential lacks the required scope.
    #[error("{0}")]
    Forbidden(String),

    /// A lookup failed; surfaced unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A failure inside this service.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// The pipeline does not exist.
    #[must_use]
    pub fn pipeline_not_found(pipeline_id: PipelineId) -> Self {
        Self::NotFound(format!("Pipeline {pipeline_id} does not exist"))
    }

    /// The pipeline has no parentless commit event.
    #[must_use]
    pub fn latest_event_not_found(pipeline_id: PipelineId) -> Self {
        Self::NotFound(format!(
            "Latest event does not exist for pipeline {pipeline_id}"
        ))
    }

    /// Creates a validation error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Returns the HTTP status for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Store(err) => err.status_code(),
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Builds the JSON error body.
    #[must_use]
    pub fn to_body(&self) -> ErrorBody {
        let status = self.status_code();
        ErrorBody {
            status_code: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Unknown").to_string(),
            message: self.to_string(),
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Numeric HTTP status.
    pub status_code: u16,
    /// Reason phrase of the status.
    pub error: String,
    /// Human readable message.
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            debug!(status = status.as_u16(), error = %self, "Request rejected");
        }
        (status, Json(self.to_body())).into_response()
    }
}

/// Result alias for request handling.
pub type ApiResult<T> = Result<T, ApiError>;
