//! Client-visible error taxonomy.
//!
//! Every failure an action or the dispatcher surfaces to a client is an
//! [`ApiError`]. Each kind carries a fixed status code and a machine-readable
//! kind name; the dispatcher is the only place that turns one into a response.

use axum::http::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// A typed error with a fixed HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Malformed or missing client input.
    #[error("{0}")]
    BadRequest(String),

    /// The addressed route or entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The request was not fully received and handled in time.
    #[error("{0}")]
    RequestTimeout(String),

    /// Request body exceeds the configured size limit.
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Request URL exceeds the configured length limit.
    #[error("{0}")]
    UriTooLong(String),

    /// Body content type is not recognised or has no registered codec.
    #[error("{0}")]
    UnsupportedMediaType(String),

    /// Unexpected failure inside the service.
    #[error("{0}")]
    InternalError(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn unsupported_media_type(message: impl Into<String>) -> Self {
        Self::UnsupportedMediaType(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }

    /// HTTP status for this kind.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RequestTimeout(_) => StatusCode::REQUEST_TIMEOUT,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::UriTooLong(_) => StatusCode::URI_TOO_LONG,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable kind name.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BadRequest",
            ApiError::NotFound(_) => "NotFound",
            ApiError::RequestTimeout(_) => "RequestTimeout",
            ApiError::PayloadTooLarge(_) => "PayloadTooLarge",
            ApiError::UriTooLong(_) => "UriTooLong",
            ApiError::UnsupportedMediaType(_) => "UnsupportedMediaType",
            ApiError::InternalError(_) => "InternalError",
        }
    }

    /// Structured body sent to the client.
    pub fn body(&self) -> ErrorBody<'_> {
        ErrorBody {
            error: ErrorDetail {
                code: self.status().as_u16(),
                kind: self.kind(),
                message: self.to_string(),
            },
        }
    }
}

/// Wire shape of an error response: `{"error": {"code", "kind", "message"}}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: ErrorDetail<'a>,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail<'a> {
    pub code: u16,
    pub kind: &'a str,
    pub message: String,
}
