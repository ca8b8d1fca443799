//! Request model.
//!
//! # Responsibilities
//! - Buffer the body up to the configured limit
//! - Parse query parameters and the declared content type
//! - Generate request IDs (UUID v4) for correlation
//!
//! # Design Decisions
//! - A [`Request`] is immutable once constructed
//! - Repeated query keys keep the last value
//! - Header lookups are case-insensitive (backed by `HeaderMap`)

use axum::body::{to_bytes, Body, Bytes};
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method};
use http_body_util::LengthLimitError;
use std::collections::HashMap;
use std::error::Error as StdError;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::error::ApiError;
use crate::resource::MediaType;

/// Header carrying the correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// An inbound request as seen by actions.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    query: HashMap<String, String>,
    headers: HeaderMap,
    body: Bytes,
    content_type: Option<MediaType>,
}

impl Request {
    /// Start building a request for `target` (path plus optional `?query`).
    pub fn builder(method: Method, target: &str) -> RequestBuilder {
        RequestBuilder {
            method,
            target: target.to_string(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Buffer an axum request, rejecting bodies over `max_body_size`.
    pub async fn from_http(
        request: axum::http::Request<Body>,
        max_body_size: usize,
    ) -> Result<Self, ApiError> {
        let (parts, body) = request.into_parts();
        let body = to_bytes(body, max_body_size).await.map_err(|e| {
            tracing::debug!(error = %e, limit = max_body_size, "Failed to read request body");
            if exceeded_limit(&e) {
                ApiError::PayloadTooLarge(format!("request body exceeds {max_body_size} bytes"))
            } else {
                ApiError::bad_request(format!("failed to read request body: {e}"))
            }
        })?;

        Ok(Self::from_parts(
            parts.method,
            parts.uri.path(),
            parts.uri.query(),
            parts.headers,
            body,
        ))
    }

    fn from_parts(
        method: Method,
        path: &str,
        query: Option<&str>,
        headers: HeaderMap,
        body: Bytes,
    ) -> Self {
        let query = query
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .into_owned()
                    .collect::<HashMap<_, _>>()
            })
            .unwrap_or_default();

        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(MediaType::parse);

        Self {
            method,
            path: path.to_string(),
            query,
            headers,
            body,
            content_type,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// A single query parameter.
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    pub fn query_params(&self) -> &HashMap<String, String> {
        &self.query
    }

    /// A header value, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn has_body(&self) -> bool {
        !self.body.is_empty()
    }

    /// Declared body media type, if the header parsed.
    pub fn content_type(&self) -> Option<&MediaType> {
        self.content_type.as_ref()
    }

    pub fn request_id(&self) -> Option<&str> {
        self.header(X_REQUEST_ID)
    }
}

/// Whether a body read failed on the size limit rather than on transport.
fn exceeded_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}

/// Builder for [`Request`], mainly for tests and embedding.
#[derive(Debug)]
pub struct RequestBuilder {
    method: Method,
    target: String,
    headers: HeaderMap,
    body: Bytes,
}

impl RequestBuilder {
    /// Add a header. Invalid values are skipped.
    pub fn header(mut self, name: HeaderName, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.append(name, value);
        }
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn build(self) -> Request {
        let (path, query) = match self.target.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (self.target.as_str(), None),
        };
        Request::from_parts(self.method, path, query, self.headers, self.body)
    }
}

/// Generates a UUID v4 for requests that arrive without an ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}
