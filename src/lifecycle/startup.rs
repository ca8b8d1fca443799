//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the worker runtime sized from configuration
//! - Initialize the store, routes and metrics
//! - Bind the listener and serve until a termination signal
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - All workers share one store, so ids stay unique process-wide

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::ServerConfig;
use crate::controller;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::net::{self, ListenerError};
use crate::observability::metrics;
use crate::routing::PatternError;
use crate::store::MemoryStore;

/// Fatal startup or serving error.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Failed to build runtime: {0}")]
    Runtime(std::io::Error),

    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("Invalid route: {0}")]
    Route(#[from] PatternError),

    #[error("Server error: {0}")]
    Serve(std::io::Error),
}

/// Run the server process to completion.
pub fn run(config: ServerConfig) -> Result<(), StartupError> {
    let workers = config.workers.effective_count();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(workers)
        .thread_name("resource-worker")
        .enable_all()
        .build()
        .map_err(StartupError::Runtime)?;

    tracing::info!(workers, "Worker pool started");
    runtime.block_on(serve(config))
}

/// Serve on the current runtime until SIGINT/SIGTERM.
pub async fn serve(config: ServerConfig) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let dispatcher = controller::dispatcher(Arc::new(MemoryStore::new()))?;
    let listener = net::bind(&config.listener).await?;
    let grace = Duration::from_secs(config.timeouts.shutdown_grace_secs);

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, dispatcher);
    let mut server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    tokio::select! {
        result = &mut server_task => return join_result(result),
        _ = signals::wait_for_termination() => shutdown.trigger(),
    }

    match tokio::time::timeout(grace, server_task).await {
        Ok(result) => join_result(result),
        Err(_) => {
            tracing::warn!(grace_secs = grace.as_secs(), "Shutdown grace period elapsed, exiting");
            Ok(())
        }
    }
}

fn join_result(
    result: Result<Result<(), std::io::Error>, tokio::task::JoinError>,
) -> Result<(), StartupError> {
    match result {
        Ok(inner) => inner.map_err(StartupError::Serve),
        Err(e) => Err(StartupError::Serve(std::io::Error::other(e))),
    }
}
