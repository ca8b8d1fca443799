//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the dispatcher as its only handler
//! - Wire up middleware (request ID, tracing, limits) and the request timeout
//! - Bind server to listener
//! - Stop accepting and drain on shutdown
//!
//! # Design Decisions
//! - The request timeout is enforced in the handler, so a timed-out request
//!   still gets the structured error body

use axum::{
    body::Body,
    extract::State,
    http::{HeaderName, Request},
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::http::request::{Request as ActionRequest, UuidRequestId, X_REQUEST_ID};
use crate::resource::Dispatcher;
use crate::security::limits::{enforce_limits, RequestLimits};

/// Application state injected into the handler.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub limits: RequestLimits,
    pub request_timeout: Duration,
}

/// HTTP server fronting a [`Dispatcher`].
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig, dispatcher: Dispatcher) -> Self {
        let state = AppState {
            dispatcher: Arc::new(dispatcher),
            limits: RequestLimits::from_config(&config),
            request_timeout: Duration::from_secs(config.timeouts.request_secs),
        };
        let router = Self::build_router(state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        let request_id = HeaderName::from_static(X_REQUEST_ID);
        let limits = state.limits;

        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(middleware::from_fn_with_state(limits, enforce_limits))
            .layer(PropagateRequestIdLayer::new(request_id.clone()))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(X_REQUEST_ID)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }))
            .layer(SetRequestIdLayer::new(request_id, UuidRequestId))
    }

    /// A clone of the fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Single entry point: buffer the request and hand it to the dispatcher.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let handle = async {
        match ActionRequest::from_http(request, state.limits.max_body_size).await {
            Ok(request) => state.dispatcher.dispatch(&request),
            Err(err) => err.into_response(),
        }
    };

    match tokio::time::timeout(state.request_timeout, handle).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(
                timeout_secs = state.request_timeout.as_secs(),
                "Request timed out"
            );
            ApiError::RequestTimeout(format!(
                "request not completed within {}s",
                state.request_timeout.as_secs()
            ))
            .into_response()
        }
    }
}
