//! Shared utilities for integration and load testing.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use resource_server::controller;
use resource_server::lifecycle::Shutdown;
use resource_server::store::MemoryStore;
use resource_server::{HttpServer, ServerConfig};

/// Fully layered router over a fresh store.
#[allow(dead_code)]
pub fn app(config: ServerConfig) -> Router {
    let dispatcher = controller::dispatcher(Arc::new(MemoryStore::new())).unwrap();
    HttpServer::new(config, dispatcher).router()
}

/// Send one request through `app` and decode the JSON body.
#[allow(dead_code)]
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    content_type: Option<&str>,
    body: impl Into<Body>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    let response = app
        .clone()
        .oneshot(builder.body(body.into()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Start a real server on an ephemeral port. Returns its address and the
/// shutdown handle that stops it.
#[allow(dead_code)]
pub async fn start_server(mut config: ServerConfig) -> (SocketAddr, Shutdown) {
    config.listener.listen_ip = "127.0.0.1".into();
    config.listener.listen_port = 0;

    let listener = resource_server::net::bind(&config.listener).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let dispatcher = controller::dispatcher(Arc::new(MemoryStore::new())).unwrap();
    let server = HttpServer::new(config, dispatcher);
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, shutdown)
}
