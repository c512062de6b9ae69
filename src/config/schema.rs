//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

/// Root configuration for the edge gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind host and port).
    pub listener: ListenerConfig,

    /// Serving certificate material paths.
    pub tls: TlsConfig,

    /// Upstream the default proxy capability forwards to.
    pub upstream: UpstreamConfig,

    /// Certificate-manager settings (join token persistence).
    pub certificate: CertificateConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Diagnostics endpoint settings.
    pub diagnostics: DiagnosticsConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Address to bind (e.g., "0.0.0.0").
    pub host: IpAddr,

    /// Port to bind.
    pub port: u16,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 10261,
        }
    }
}

/// Serving certificate paths. Presence of both files at startup selects
/// TLS; otherwise the gateway serves plaintext.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: PathBuf,

    /// Path to private key file (PEM).
    pub key_path: PathBuf,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            cert_path: PathBuf::from("/var/lib/edge-gateway/pki/server.crt"),
            key_path: PathBuf::from("/var/lib/edge-gateway/pki/server.key"),
        }
    }
}

/// Upstream configuration for the default proxy capability.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Upstream authority (e.g., "127.0.0.1:6443").
    pub address: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:6443".to_string(),
        }
    }
}

/// Certificate-manager configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CertificateConfig {
    /// Where the bootstrap join token is persisted on update.
    pub join_token_path: PathBuf,
}

impl Default for CertificateConfig {
    fn default() -> Self {
        Self {
            join_token_path: PathBuf::from("/var/lib/edge-gateway/join-token"),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter directive (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Diagnostics endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Register the /debug diagnostic routes.
    pub enabled: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}
