//! Gateway server shell.
//!
//! # Data Flow
//! ```text
//! GatewayServer::new (route table built once, capabilities wired)
//!     → bind (transport probed once, socket bound)
//!     → serve (indefinite dispatch loop, TLS or plaintext)
//! ```
//!
//! # Design Decisions
//! - The NotRunning → Running transition is one-way and encoded in the
//!   types: `GatewayServer` → `BoundGateway` → consumed by `serve`
//! - Bind and serve failures are fatal; retry belongs to the process
//!   supervisor, and the exit decision itself belongs to `main`
//! - No graceful-stop path here; termination is process-level

pub mod handlers;
pub mod routes;
pub mod tls;

use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;

use axum::Router;

use crate::cert::CertificateManager;
use crate::config::GatewayConfig;

pub use routes::{
    build_routes, DiagnosticsInstaller, HttpCapability, RouteCapabilities, HEALTH_PATH, TOKEN_PATH,
};
pub use tls::TransportMode;

/// Error type for the server shell. Every variant is fatal.
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// TLS material was present on disk but rejected at load time.
    #[error("failed to load tls material: {0}")]
    TlsMaterial(#[source] std::io::Error),

    #[error("serve loop terminated: {0}")]
    Serve(#[source] std::io::Error),
}

/// The front-door HTTP server of the edge node agent.
///
/// Holds the route table (built once, immutable afterwards) and the
/// injected certificate-manager capability. The capability is wiring only;
/// the shell never invokes it.
pub struct GatewayServer {
    config: GatewayConfig,
    cert_manager: Arc<dyn CertificateManager>,
    routes: Router,
}

impl GatewayServer {
    /// Create a server with its route table built from the injected
    /// capabilities.
    pub fn new(
        config: GatewayConfig,
        cert_manager: Arc<dyn CertificateManager>,
        caps: RouteCapabilities,
    ) -> Self {
        let routes = routes::build_routes(caps);
        Self {
            config,
            cert_manager,
            routes,
        }
    }

    /// The held certificate-manager capability.
    pub fn certificate_manager(&self) -> &Arc<dyn CertificateManager> {
        &self.cert_manager
    }

    /// Probe the transport mode and bind the listener socket.
    ///
    /// The probe runs exactly once, before any connection is accepted, so
    /// the TLS decision cannot race concurrent filesystem changes.
    pub fn bind(self) -> Result<BoundGateway, ServeError> {
        let mode = tls::probe_transport(&self.config.tls.cert_path, &self.config.tls.key_path);

        let addr = SocketAddr::new(self.config.listener.host, self.config.listener.port);
        let listener = TcpListener::bind(addr).map_err(|source| ServeError::Bind { addr, source })?;
        listener
            .set_nonblocking(true)
            .map_err(|source| ServeError::Bind { addr, source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| ServeError::Bind { addr, source })?;

        tracing::info!(address = %local_addr, mode = ?mode, "gateway listener bound");

        Ok(BoundGateway {
            listener,
            local_addr,
            mode,
            config: self.config,
            cert_manager: self.cert_manager,
            routes: self.routes,
        })
    }

    /// Bind and serve until a fatal error.
    pub async fn run(self) -> Result<(), ServeError> {
        self.bind()?.serve().await
    }
}

/// A gateway whose socket is bound and whose transport mode is decided.
pub struct BoundGateway {
    listener: TcpListener,
    local_addr: SocketAddr,
    mode: tls::TransportMode,
    config: GatewayConfig,
    cert_manager: Arc<dyn CertificateManager>,
    routes: Router,
}

impl BoundGateway {
    /// Address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Transport mode chosen at bind time.
    pub fn mode(&self) -> tls::TransportMode {
        self.mode
    }

    /// The held certificate-manager capability.
    pub fn certificate_manager(&self) -> &Arc<dyn CertificateManager> {
        &self.cert_manager
    }

    /// Run the serve loop. Blocks until a fatal error occurs.
    pub async fn serve(self) -> Result<(), ServeError> {
        let app = self.routes.into_make_service();

        match self.mode {
            tls::TransportMode::Tls => {
                let rustls_config = tls::load_rustls_config(
                    &self.config.tls.cert_path,
                    &self.config.tls.key_path,
                )
                .await
                .map_err(ServeError::TlsMaterial)?;

                axum_server::from_tcp_rustls(self.listener, rustls_config)
                    .serve(app)
                    .await
                    .map_err(ServeError::Serve)
            }
            tls::TransportMode::Plaintext => axum_server::from_tcp(self.listener)
                .serve(app)
                .await
                .map_err(ServeError::Serve),
        }
    }
}
