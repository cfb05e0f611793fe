//! Error types for the delta API

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use delta_validator::ErrorPayload;
use thiserror::Error;

/// Configuration problems detected at start-up.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("mandatory configuration values are missing: {}", .0.join(", "))]
    MissingMandatory(Vec<String>),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Failures while handing a delta to the bus.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("unable to obtain the delta schema: {0}")]
    Schema(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("publish rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("no broker addresses configured")]
    NoBrokers,

    #[error("invalid broker address {0}")]
    InvalidBroker(String),
}

/// Outcome of a delta request that is not a plain success.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed validation with {} errors", .0.len())]
    Validation(ErrorPayload),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(payload) => (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/json")],
                payload.to_json(),
            )
                .into_response(),
            // Internal failures are logged by the handler; clients only see the status.
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
