use std::net::IpAddr;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;

use edge_gateway::cert::{CertificateManager, FileCertificateManager};
use edge_gateway::config::loader::{load_config, ConfigError};
use edge_gateway::config::validation::validate_config;
use edge_gateway::config::GatewayConfig;
use edge_gateway::observability::logging;
use edge_gateway::proxy::UpstreamProxy;
use edge_gateway::server::{GatewayServer, RouteCapabilities};
use edge_gateway::{diagnostics, token};

#[derive(Parser)]
#[command(name = "edge-gateway")]
#[command(about = "Front-door HTTP listener for the edge node agent")]
struct Args {
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen host.
    #[arg(long)]
    host: Option<IpAddr>,

    /// Override the listen port.
    #[arg(long)]
    port: Option<u16>,

    /// Override the TLS certificate path.
    #[arg(long)]
    tls_cert: Option<PathBuf>,

    /// Override the TLS key path.
    #[arg(long)]
    tls_key: Option<PathBuf>,

    /// Override the upstream authority (host:port).
    #[arg(long)]
    upstream: Option<String>,
}

/// Merge file config with command-line overrides, then re-validate.
fn resolve_config(args: Args) -> Result<GatewayConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    if let Some(host) = args.host {
        config.listener.host = host;
    }
    if let Some(port) = args.port {
        config.listener.port = port;
    }
    if let Some(cert_path) = args.tls_cert {
        config.tls.cert_path = cert_path;
    }
    if let Some(key_path) = args.tls_key {
        config.tls.key_path = key_path;
    }
    if let Some(upstream) = args.upstream {
        config.upstream.address = upstream;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[tokio::main]
async fn main() {
    let config = match resolve_config(Args::parse()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("edge-gateway: {err}");
            process::exit(2);
        }
    };

    logging::init(&config.observability);

    tracing::info!(
        host = %config.listener.host,
        port = config.listener.port,
        upstream = %config.upstream.address,
        "edge-gateway starting"
    );

    let cert_manager: Arc<dyn CertificateManager> = Arc::new(FileCertificateManager::new(
        config.certificate.join_token_path.clone(),
    ));

    let proxy = match UpstreamProxy::new(&config.upstream) {
        Ok(proxy) => proxy,
        Err(err) => {
            eprintln!("edge-gateway: {err}");
            process::exit(2);
        }
    };

    let caps = RouteCapabilities {
        token_update: token::update_capability(cert_manager.clone()),
        diagnostics: config.diagnostics.enabled.then(diagnostics::installer),
        proxy: proxy.into_capability(),
    };

    let server = GatewayServer::new(config, cert_manager, caps);

    // Fail fast: the agent cannot operate without its control endpoint, so
    // any bind or serve failure terminates the process.
    if let Err(err) = server.run().await {
        tracing::error!(error = %err, "gateway server exited");
        process::exit(1);
    }
}
