//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → consumed by the server bootstrap
//! ```
//!
//! # Design Decisions
//! - Config is immutable for the process lifetime; no reload path
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::CertificateConfig;
pub use schema::GatewayConfig;
pub use schema::ListenerConfig;
pub use schema::TlsConfig;
pub use schema::UpstreamConfig;
