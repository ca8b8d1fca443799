//! Resource server (v1)
//!
//! Serves the data endpoints through the resource dispatcher.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ net::listener ──▶ http::server ──▶ security::limits
//!                                                            │
//!                                                            ▼
//!                                          resource::dispatcher ──▶ routing
//!                                                            │
//!                                                            ▼
//!                                       controller::data ──▶ store::memory
//!                                                            │
//!     Client Response                                        ▼
//!     ◀────────────── http::response ◀── reply / ApiError ◀──┘
//! ```
//!
//! Configuration comes from an optional TOML file; `--listen-ip`,
//! `--listen-port` and `--workers` override it.

use clap::Parser;
use std::path::PathBuf;

use resource_server::config::loader::{load_config, ConfigError};
use resource_server::config::validation::validate_config;
use resource_server::lifecycle;
use resource_server::observability::logging;
use resource_server::ServerConfig;

#[derive(Parser)]
#[command(name = "resource-server")]
#[command(about = "HTTP data service built on the resource dispatcher", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on.
    #[arg(long)]
    listen_ip: Option<String>,

    /// Port to listen on.
    #[arg(long)]
    listen_port: Option<u16>,

    /// Worker threads (defaults to the CPU count).
    #[arg(short, long)]
    workers: Option<usize>,
}

impl Cli {
    fn load(&self) -> Result<ServerConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => ServerConfig::default(),
        };

        if let Some(ip) = &self.listen_ip {
            config.listener.listen_ip = ip.clone();
        }
        if let Some(port) = self.listen_port {
            config.listener.listen_port = port;
        }
        if let Some(workers) = self.workers {
            config.workers.count = Some(workers);
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.load()?;

    logging::init(&config.observability)?;

    tracing::info!("resource-server v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.bind_address(),
        workers = config.workers.effective_count(),
        request_timeout_secs = config.timeouts.request_secs,
        max_url_len = config.listener.max_url_len,
        "Configuration loaded"
    );

    lifecycle::run(config)?;

    tracing::info!("Shutdown complete");
    Ok(())
}
