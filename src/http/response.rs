//! Response encoding.
//!
//! # Responsibilities
//! - Serialize structured replies as `application/json`
//! - Render typed errors with their status and structured body
//! - Pass raw responses through unchanged

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::error::ApiError;
use crate::resource::Reply;

/// Encode a successful reply. `status` applies to structured replies only.
pub fn reply_response(reply: Reply, status: StatusCode) -> Response {
    match reply {
        Reply::Structured(value) => match serde_json::to_vec(&value) {
            Ok(bytes) => json_response(status, bytes),
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode reply");
                error_response(&ApiError::internal("failed to encode response"))
            }
        },
        Reply::Raw(raw) => {
            let mut response = Response::new(Body::from(raw.body));
            *response.status_mut() = raw.status;
            *response.headers_mut() = raw.headers;
            response
        }
    }
}

/// Encode a typed error as `{"error": {"code", "kind", "message"}}`.
pub fn error_response(err: &ApiError) -> Response {
    match serde_json::to_vec(&err.body()) {
        Ok(bytes) => json_response(err.status(), bytes),
        Err(_) => (err.status(), err.kind()).into_response(),
    }
}

fn json_response(status: StatusCode, bytes: Vec<u8>) -> Response {
    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error_response(&self)
    }
}
