//! Configuration validation.
//!
//! # Responsibilities
//! - Validate value ranges (timeouts > 0, ports valid)
//! - Validate addresses parse before any socket is bound
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>

use std::net::{IpAddr, SocketAddr};
use thiserror::Error;

use crate::config::schema::ServerConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check a configuration for semantic errors.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.listen_ip.parse::<IpAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.listen_ip",
            format!("'{}' is not an IP address", config.listener.listen_ip),
        ));
    }
    if config.listener.listen_port == 0 {
        errors.push(ValidationError::new("listener.listen_port", "must be non-zero"));
    }
    // Shortest useful URL is "/".
    if config.listener.max_url_len == 0 {
        errors.push(ValidationError::new("listener.max_url_len", "must be positive"));
    }
    if config.workers.count == Some(0) {
        errors.push(ValidationError::new("workers.count", "must be at least 1"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be positive"));
    }
    if config.timeouts.shutdown_grace_secs == 0 {
        errors.push(ValidationError::new("timeouts.shutdown_grace_secs", "must be positive"));
    }
    if config.limits.max_body_size == 0 {
        errors.push(ValidationError::new("limits.max_body_size", "must be positive"));
    }
    if config.observability.log_level.parse::<tracing::Level>().is_err() {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", config.observability.log_level),
        ));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ServerConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ServerConfig::default();
        config.listener.listen_ip = "not-an-ip".into();
        config.listener.listen_port = 0;
        config.workers.count = Some(0);
        config.timeouts.request_secs = 0;
        config.timeouts.shutdown_grace_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "listener.listen_ip",
                "listener.listen_port",
                "workers.count",
                "timeouts.request_secs",
                "timeouts.shutdown_grace_secs"
            ]
        );
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = ServerConfig::default();
        config.observability.metrics_address = "nowhere".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "observability.metrics_address");
    }

    #[test]
    fn test_bad_log_level() {
        let mut config = ServerConfig::default();
        config.observability.log_level = "loud".into();
        assert!(validate_config(&config).is_err());
    }
}
