//! The generic resource dispatcher.
//!
//! # Responsibilities
//! - Resolve a request to an action through the route table
//! - Decode the request body with the codec for its declared type
//! - Invoke the action and encode its reply or error
//! - Contain panics raised inside actions
//!
//! # Design Decisions
//! - Exactly one response per request
//! - Business logic never builds HTTP responses for errors; it returns
//!   [`ApiError`] and the dispatcher renders it
//! - Panic payloads are logged, never sent to clients

use axum::http::header;
use axum::response::Response;
use serde_json::Value;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

use crate::error::ApiError;
use crate::http::response::{error_response, reply_response};
use crate::http::Request;
use crate::observability::metrics;
use crate::resource::codec::{Codec, CodecRegistry};
use crate::routing::{Resolution, RouteTable};

/// Turns requests into action calls and action results into responses.
#[derive(Debug)]
pub struct Dispatcher {
    routes: RouteTable,
    codecs: CodecRegistry,
}

impl Dispatcher {
    /// Create a dispatcher with the default codecs (JSON, text/plain).
    pub fn new(routes: RouteTable) -> Self {
        Self::with_codecs(routes, CodecRegistry::default())
    }

    pub fn with_codecs(routes: RouteTable, codecs: CodecRegistry) -> Self {
        Self { routes, codecs }
    }

    /// Register a codec so bodies of `media_type` are accepted.
    ///
    /// Returns `false` if `media_type` does not parse.
    pub fn register_codec(&mut self, media_type: &str, codec: impl Codec + 'static) -> bool {
        self.codecs.register(media_type, codec)
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn codecs(&self) -> &CodecRegistry {
        &self.codecs
    }

    /// Handle one request end to end.
    pub fn dispatch(&self, request: &Request) -> Response {
        let start = Instant::now();

        let route = match self.routes.resolve(request.method(), request.path()) {
            Resolution::Matched(m) => m,
            Resolution::NoMatch => {
                tracing::debug!(
                    method = %request.method(),
                    path = %request.path(),
                    "No route matched"
                );
                let err = ApiError::not_found(format!(
                    "no route for {} {}",
                    request.method(),
                    request.path()
                ));
                metrics::record_request("none", err.status().as_u16(), start);
                return error_response(&err);
            }
        };
        let action = &route.action;

        tracing::debug!(
            action = action.name(),
            path_args = route.path_args.len(),
            has_body = request.has_body(),
            "Dispatching request"
        );

        let result = self.decode_body(request).and_then(|body| {
            catch_unwind(AssertUnwindSafe(|| action.invoke(request, &route.path_args, body)))
                .unwrap_or_else(|panic| {
                    tracing::error!(
                        action = action.name(),
                        panic = panic_message(panic.as_ref()),
                        "Action panicked"
                    );
                    Err(ApiError::internal("internal server error"))
                })
        });

        let response = match result {
            Ok(reply) => reply_response(reply, action.status()),
            Err(err) => {
                if err.status().is_server_error() {
                    tracing::error!(action = action.name(), error = %err, "Action failed");
                } else {
                    tracing::debug!(
                        action = action.name(),
                        kind = err.kind(),
                        error = %err,
                        "Request rejected"
                    );
                }
                error_response(&err)
            }
        };

        metrics::record_request(action.name(), response.status().as_u16(), start);
        response
    }

    /// Decode the body, if any, into a structured value.
    fn decode_body(&self, request: &Request) -> Result<Option<Value>, ApiError> {
        if !request.has_body() {
            return Ok(None);
        }

        let media_type = request.content_type().ok_or_else(|| {
            match request.header(header::CONTENT_TYPE.as_str()) {
                Some(raw) => {
                    ApiError::unsupported_media_type(format!("unsupported content type '{raw}'"))
                }
                None => {
                    ApiError::unsupported_media_type("request body requires a Content-Type header")
                }
            }
        })?;

        let codec = self.codecs.get(media_type).ok_or_else(|| {
            if media_type.is_recognised() {
                ApiError::unsupported_media_type(format!("no codec registered for {media_type}"))
            } else {
                ApiError::unsupported_media_type(format!("unsupported content type {media_type}"))
            }
        })?;

        codec
            .decode(request.body())
            .map(Some)
            .map_err(|e| ApiError::bad_request(format!("malformed {media_type} body: {e}")))
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::codec::{CodecError, APPLICATION_XML};
    use crate::resource::{Action, Reply};
    use axum::body::to_bytes;
    use axum::http::{Method, StatusCode};

    fn dispatcher() -> Dispatcher {
        let mut routes = RouteTable::new();
        routes
            .get("/items/:id", Action::plain("show", |_, args| {
                Reply::json(&serde_json::json!({"id": args.get("id")}))
            }))
            .unwrap()
            .post("/echo", Action::with_body("echo", |_, _, body| Ok(Reply::Structured(body))))
            .unwrap()
            .post(
                "/created",
                Action::with_body("created", |_, _, _| Ok(Reply::Structured(Value::Null)))
                    .default_status(StatusCode::CREATED),
            )
            .unwrap()
            .get("/boom", Action::plain("boom", |_, _| panic!("kaboom")))
            .unwrap();
        Dispatcher::new(routes)
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post(path: &str, content_type: &str, body: &'static [u8]) -> Request {
        Request::builder(Method::POST, path)
            .header(header::CONTENT_TYPE, content_type)
            .body(body)
            .build()
    }

    #[tokio::test]
    async fn test_no_match_is_not_found() {
        let resp = dispatcher().dispatch(&Request::builder(Method::GET, "/nope").build());
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await["error"]["kind"], "NotFound");
    }

    #[tokio::test]
    async fn test_path_args_passed() {
        let resp = dispatcher().dispatch(&Request::builder(Method::GET, "/items/9").build());
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(body_json(resp).await, serde_json::json!({"id": "9"}));
    }

    #[tokio::test]
    async fn test_json_and_text_bodies() {
        let d = dispatcher();
        let resp = d.dispatch(&post("/echo", "application/json", br#"{"a":1}"#));
        assert_eq!(body_json(resp).await, serde_json::json!({"a": 1}));

        let resp = d.dispatch(&post("/echo", "text/plain; charset=utf-8", b"hello"));
        assert_eq!(body_json(resp).await, serde_json::json!("hello"));
    }

    #[tokio::test]
    async fn test_default_status_applied() {
        let resp = dispatcher().dispatch(&post("/created", "application/json", b"{}"));
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_unsupported_media_types() {
        let d = dispatcher();
        for content_type in ["application/x-www-form-urlencoded", "application/xml", "image/png"] {
            let resp = d.dispatch(&post("/echo", content_type, b"<a/>"));
            assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE, "{content_type}");
        }

        let missing = Request::builder(Method::POST, "/echo").body(&b"x"[..]).build();
        assert_eq!(d.dispatch(&missing).status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_registered_xml_codec() {
        struct TagCodec;
        impl Codec for TagCodec {
            fn decode(&self, body: &[u8]) -> Result<Value, CodecError> {
                let text = std::str::from_utf8(body)?;
                text.strip_prefix('<')
                    .and_then(|t| t.strip_suffix("/>"))
                    .map(|tag| serde_json::json!({"tag": tag}))
                    .ok_or_else(|| CodecError::Other("not a tag".into()))
            }

            fn encode(&self, _value: &Value) -> Result<Vec<u8>, CodecError> {
                Err(CodecError::Other("unsupported".into()))
            }
        }

        let mut d = dispatcher();
        assert!(d.register_codec(APPLICATION_XML, TagCodec));

        let resp = d.dispatch(&post("/echo", "application/xml", b"<item/>"));
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, serde_json::json!({"tag": "item"}));

        let resp = d.dispatch(&post("/echo", "application/xml", b"garbage"));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let resp = dispatcher().dispatch(&post("/echo", "application/json", b"{oops"));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"]["kind"], "BadRequest");
    }

    #[tokio::test]
    async fn test_missing_body_for_body_action() {
        let resp = dispatcher().dispatch(&Request::builder(Method::POST, "/echo").build());
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_panic_becomes_internal_error() {
        let resp = dispatcher().dispatch(&Request::builder(Method::GET, "/boom").build());
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(resp).await;
        assert_eq!(body["error"]["kind"], "InternalError");
        assert!(!body.to_string().contains("kaboom"));
    }
}
