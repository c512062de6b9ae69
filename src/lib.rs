//! Front-door HTTP listener for an edge-node agent.
//!
//! The gateway decides TLS vs plaintext from on-disk certificate material,
//! registers a fixed, order-sensitive route table (catch-all last), and
//! hands unmatched traffic to an injected reverse-proxy capability.

// Core subsystems
pub mod config;
pub mod server;

// Injected capabilities (default implementations)
pub mod cert;
pub mod diagnostics;
pub mod proxy;
pub mod token;

// Cross-cutting concerns
pub mod observability;

pub use config::GatewayConfig;
pub use server::{GatewayServer, ServeError, TransportMode};
