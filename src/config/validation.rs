//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (non-zero port, parseable upstream authority)
//! - Catch empty paths that would silently disable TLS forever
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use axum::http::uri::Authority;

use crate::config::schema::GatewayConfig;

/// A single semantic violation found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Config field the violation refers to, e.g. "listener.port".
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, collecting every violation.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.port == 0 {
        errors.push(ValidationError {
            field: "listener.port",
            message: "port must be non-zero".to_string(),
        });
    }

    if config.upstream.address.parse::<Authority>().is_err() {
        errors.push(ValidationError {
            field: "upstream.address",
            message: format!("not a valid host:port authority: {:?}", config.upstream.address),
        });
    }

    if config.tls.cert_path.as_os_str().is_empty() {
        errors.push(ValidationError {
            field: "tls.cert_path",
            message: "path must not be empty".to_string(),
        });
    }
    if config.tls.key_path.as_os_str().is_empty() {
        errors.push(ValidationError {
            field: "tls.key_path",
            message: "path must not be empty".to_string(),
        });
    }

    if config.observability.log_level.trim().is_empty() {
        errors.push(ValidationError {
            field: "observability.log_level",
            message: "log level must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
