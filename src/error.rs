//! API errors and their HTTP representation.
//!
//! Every handler returns `Result<_, ApiError>`, so any failure ends up as a JSON
//! body of the shape `{ "error": ..., "message"?: ... }`.

use crate::database::StoreError;
use crate::features::users::model::{ErrorBody, PayloadError};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Path id is not an integer (400)
    #[error("Invalid user ID")]
    InvalidId,

    /// Client supplied fields failed validation (400)
    #[error("{0}")]
    Validation(&'static str),

    /// Body could not be parsed at all (400)
    #[error("Invalid request body: {0}")]
    MalformedBody(String),

    /// Store rejected the write because of a uniqueness rule (400)
    #[error("{0}")]
    Conflict(&'static str),

    /// No user with that id (404)
    #[error("User not found")]
    NotFound,

    /// No route for this method and path (404)
    #[error("Endpoint not found")]
    EndpointNotFound,

    /// Any other store failure (500, logged)
    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        #[source]
        source: StoreError,
    },
}

impl ApiError {
    /// Wrap a store failure, recognising constraint violations as client errors.
    pub fn store(context: &'static str, source: StoreError) -> Self {
        match source {
            StoreError::ConstraintViolation(_) => Self::Conflict("Email already exists"),
            source => Self::Store { context, source },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidId | Self::Validation(_) | Self::MalformedBody(_) | Self::Conflict(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound | Self::EndpointNotFound => StatusCode::NOT_FOUND,
            Self::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            Self::MalformedBody(detail) => ErrorBody {
                error: "Invalid request body".to_string(),
                message: Some(detail.clone()),
            },
            Self::Store { context, source } => ErrorBody {
                error: context.to_string(),
                message: Some(source.to_string()),
            },
            other => ErrorBody {
                error: other.to_string(),
                message: None,
            },
        }
    }
}

impl From<PayloadError> for ApiError {
    fn from(e: PayloadError) -> Self {
        match e {
            PayloadError::MissingName => Self::Validation("Name is required"),
            PayloadError::EmptyEmail => Self::Validation("Email must not be empty"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Store { context, source } = &self {
            tracing::error!(error = %source, "{}", context);
        }

        (self.status(), Json(self.body())).into_response()
    }
}
