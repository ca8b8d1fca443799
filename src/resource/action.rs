//! Typed action signatures and results.

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::Request;
use crate::routing::PathArgs;

/// What an action produces: a reply on success or a typed error.
pub type ActionResult = Result<Reply, ApiError>;

type PlainFn = dyn Fn(&Request, &PathArgs) -> ActionResult + Send + Sync;
type BodyFn = dyn Fn(&Request, &PathArgs, Value) -> ActionResult + Send + Sync;

/// The call shape an action declares.
pub enum Handler {
    /// Takes the request and path arguments only.
    Plain(Box<PlainFn>),
    /// Additionally takes the decoded request body.
    WithBody(Box<BodyFn>),
}

/// A named handler bound to a route.
pub struct Action {
    name: String,
    handler: Handler,
    default_status: StatusCode,
}

impl Action {
    /// An action that does not accept a request body.
    pub fn plain<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Request, &PathArgs) -> ActionResult + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            handler: Handler::Plain(Box::new(f)),
            default_status: StatusCode::OK,
        }
    }

    /// An action that requires a decoded request body.
    pub fn with_body<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Request, &PathArgs, Value) -> ActionResult + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            handler: Handler::WithBody(Box::new(f)),
            default_status: StatusCode::OK,
        }
    }

    /// Status used for structured replies (200 unless overridden).
    pub fn default_status(mut self, status: StatusCode) -> Self {
        self.default_status = status;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> StatusCode {
        self.default_status
    }

    pub fn accepts_body(&self) -> bool {
        matches!(self.handler, Handler::WithBody(_))
    }

    /// Call the handler with the arguments its signature declares.
    ///
    /// A body-less call to a body action, or a body passed to a plain action,
    /// is rejected before the handler runs.
    pub fn invoke(&self, request: &Request, args: &PathArgs, body: Option<Value>) -> ActionResult {
        match (&self.handler, body) {
            (Handler::Plain(f), None) => f(request, args),
            (Handler::WithBody(f), Some(body)) => f(request, args, body),
            (Handler::Plain(_), Some(_)) => Err(ApiError::bad_request(format!(
                "action '{}' does not accept a request body",
                self.name
            ))),
            (Handler::WithBody(_), None) => Err(ApiError::bad_request(format!(
                "action '{}' requires a request body",
                self.name
            ))),
        }
    }
}

impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name)
            .field("accepts_body", &self.accepts_body())
            .field("default_status", &self.default_status)
            .finish()
    }
}

/// Successful action output.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Serialized as `application/json` with the action's default status.
    Structured(Value),
    /// Sent unchanged.
    Raw(RawResponse),
}

impl Reply {
    /// Structured reply from any serializable value.
    pub fn json<T: Serialize>(value: &T) -> ActionResult {
        serde_json::to_value(value)
            .map(Reply::Structured)
            .map_err(|e| ApiError::internal(format!("failed to serialize reply: {e}")))
    }

    /// Empty `200 OK`.
    pub fn empty() -> Self {
        Reply::Raw(RawResponse::new(StatusCode::OK, Bytes::new()))
    }
}

impl From<RawResponse> for Reply {
    fn from(raw: RawResponse) -> Self {
        Reply::Raw(raw)
    }
}

impl From<String> for Reply {
    fn from(text: String) -> Self {
        Reply::Raw(RawResponse::text(text))
    }
}

impl From<&'static str> for Reply {
    fn from(text: &'static str) -> Self {
        Reply::Raw(RawResponse::text(text))
    }
}

impl From<Bytes> for Reply {
    fn from(bytes: Bytes) -> Self {
        Reply::Raw(RawResponse::bytes(bytes))
    }
}

impl From<()> for Reply {
    fn from(_: ()) -> Self {
        Reply::empty()
    }
}

/// A pre-built response passed through the dispatcher untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// `200 OK` with a `text/plain` body.
    pub fn text(body: impl Into<String>) -> Self {
        let body: String = body.into();
        Self::new(StatusCode::OK, body)
            .with_header(header::CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"))
    }

    /// `200 OK` with an `application/octet-stream` body.
    pub fn bytes(body: impl Into<Bytes>) -> Self {
        Self::new(StatusCode::OK, body)
            .with_header(header::CONTENT_TYPE, HeaderValue::from_static("application/octet-stream"))
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn with_header(mut self, name: header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}
