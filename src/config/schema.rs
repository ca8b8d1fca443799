//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (address, URL limits).
    pub listener: ListenerConfig,

    /// Worker pool sizing.
    pub workers: WorkerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ServerConfig {
    /// `listen_ip:listen_port` as a bindable string.
    pub fn bind_address(&self) -> String {
        self.listener.bind_address()
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// IP address to listen on.
    pub listen_ip: String,

    /// Port to listen on.
    pub listen_port: u16,

    /// Longest accepted request URL (path + query), in bytes.
    pub max_url_len: usize,
}

impl ListenerConfig {
    pub fn bind_address(&self) -> String {
        if self.listen_ip.contains(':') {
            format!("[{}]:{}", self.listen_ip, self.listen_port)
        } else {
            format!("{}:{}", self.listen_ip, self.listen_port)
        }
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            listen_ip: "0.0.0.0".to_string(),
            listen_port: 10000,
            max_url_len: 1024,
        }
    }
}

/// Worker pool configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Number of worker threads. `None` means one per CPU.
    pub count: Option<usize>,
}

impl WorkerConfig {
    /// Resolved worker count.
    pub fn effective_count(&self) -> usize {
        self.count.unwrap_or_else(num_cpus::get)
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,

    /// How long shutdown waits for in-flight requests, in seconds.
    pub shutdown_grace_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            shutdown_grace_secs: 10,
        }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log line format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:10000");
        assert_eq!(config.listener.max_url_len, 1024);
        assert!(config.workers.effective_count() >= 1);
    }

    #[test]
    fn test_partial_toml() {
        let config: ServerConfig = toml::from_str(
            r#"
            [listener]
            listen_port = 8080

            [workers]
            count = 2

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.listener.listen_ip, "0.0.0.0");
        assert_eq!(config.listener.listen_port, 8080);
        assert_eq!(config.workers.effective_count(), 2);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.timeouts.request_secs, 30);
    }

    #[test]
    fn test_ipv6_bind_address() {
        let listener = ListenerConfig {
            listen_ip: "::1".into(),
            listen_port: 10000,
            ..Default::default()
        };
        assert_eq!(listener.bind_address(), "[::1]:10000");
    }
}
