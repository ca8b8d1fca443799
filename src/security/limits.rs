//! Request size limits.
//!
//! # Responsibilities
//! - Enforce maximum URI length (414 URI Too Long)
//! - Reject declared bodies over the limit before reading them (413)
//!
//! # Design Decisions
//! - Limits checked before any body bytes are read (early rejection)
//! - Chunked bodies without `Content-Length` are still capped while buffering

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::ServerConfig;
use crate::error::ApiError;

/// Limits applied to every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLimits {
    pub max_url_len: usize,
    pub max_body_size: usize,
}

impl RequestLimits {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            max_url_len: config.listener.max_url_len,
            max_body_size: config.limits.max_body_size,
        }
    }

    /// Check URL length and declared body size.
    pub fn check<B>(&self, request: &Request<B>) -> Result<(), ApiError> {
        let url_len = request
            .uri()
            .path_and_query()
            .map_or(0, |pq| pq.as_str().len());
        if url_len > self.max_url_len {
            return Err(ApiError::UriTooLong(format!(
                "request URL is {url_len} bytes, limit is {}",
                self.max_url_len
            )));
        }

        let declared = request
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<usize>().ok());
        if let Some(len) = declared {
            if len > self.max_body_size {
                return Err(ApiError::PayloadTooLarge(format!(
                    "request body is {len} bytes, limit is {}",
                    self.max_body_size
                )));
            }
        }

        Ok(())
    }
}

/// Middleware rejecting requests that break [`RequestLimits`].
pub async fn enforce_limits(
    State(limits): State<RequestLimits>,
    request: Request<Body>,
    next: Next,
) -> Response {
    match limits.check(&request) {
        Ok(()) => next.run(request).await,
        Err(err) => {
            tracing::warn!(
                kind = err.kind(),
                method = %request.method(),
                error = %err,
                "Request rejected by limits"
            );
            err.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMITS: RequestLimits = RequestLimits {
        max_url_len: 32,
        max_body_size: 8,
    };

    #[test]
    fn test_url_length() {
        let ok = Request::builder().uri("/get_data?id=1").body(()).unwrap();
        assert!(LIMITS.check(&ok).is_ok());

        let long = format!("/get_data?id={}", "9".repeat(40));
        let req = Request::builder().uri(long).body(()).unwrap();
        assert!(matches!(LIMITS.check(&req), Err(ApiError::UriTooLong(_))));
    }

    #[test]
    fn test_declared_body_size() {
        let req = Request::builder()
            .uri("/set_data")
            .header(header::CONTENT_LENGTH, "9")
            .body(())
            .unwrap();
        assert!(matches!(LIMITS.check(&req), Err(ApiError::PayloadTooLarge(_))));

        let req = Request::builder()
            .uri("/set_data")
            .header(header::CONTENT_LENGTH, "8")
            .body(())
            .unwrap();
        assert!(LIMITS.check(&req).is_ok());
    }
}
