//! Default reverse-proxy capability.
//!
//! # Responsibilities
//! - Rewrite scheme/authority to the configured upstream
//! - Stream request and response bodies without buffering
//! - Map transport failures to 502 Bad Gateway
//!
//! The server shell treats this as an opaque capability; deployments can
//! inject any other [`HttpCapability`] in its place.

use std::convert::Infallible;

use axum::body::Body;
use axum::http::uri::{Authority, PathAndQuery, Scheme};
use axum::http::{header, Request, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tower::service_fn;
use tower::util::BoxCloneSyncService;

use crate::config::UpstreamConfig;
use crate::server::HttpCapability;

/// Error type for proxy construction.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("invalid upstream authority {0:?}")]
    InvalidAuthority(String),
}

/// Forwards requests to a single configured upstream.
#[derive(Clone)]
pub struct UpstreamProxy {
    client: Client<HttpConnector, Body>,
    authority: Authority,
}

impl UpstreamProxy {
    pub fn new(config: &UpstreamConfig) -> Result<Self, ProxyError> {
        let authority = config
            .address
            .parse::<Authority>()
            .map_err(|_| ProxyError::InvalidAuthority(config.address.clone()))?;

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        Ok(Self { client, authority })
    }

    /// Wrap the forwarder as an injectable HTTP capability.
    pub fn into_capability(self) -> HttpCapability {
        BoxCloneSyncService::new(service_fn(move |request: Request<Body>| {
            let client = self.client.clone();
            let authority = self.authority.clone();
            async move { Ok::<_, Infallible>(forward(client, authority, request).await) }
        }))
    }
}

async fn forward(
    client: Client<HttpConnector, Body>,
    authority: Authority,
    request: Request<Body>,
) -> Response {
    let (mut parts, body) = request.into_parts();

    let mut uri_parts = std::mem::take(&mut parts.uri).into_parts();
    uri_parts.scheme = Some(Scheme::HTTP);
    uri_parts.authority = Some(authority);
    if uri_parts.path_and_query.is_none() {
        uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }

    parts.uri = match Uri::from_parts(uri_parts) {
        Ok(uri) => uri,
        Err(err) => {
            tracing::error!(error = %err, "failed to build upstream uri");
            return (StatusCode::BAD_GATEWAY, "invalid upstream uri").into_response();
        }
    };

    // the client derives Host from the rewritten authority
    parts.headers.remove(header::HOST);

    tracing::debug!(method = %parts.method, uri = %parts.uri, "forwarding to upstream");

    match client.request(Request::from_parts(parts, body)).await {
        Ok(response) => {
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(err) => {
            tracing::error!(error = %err, "upstream request failed");
            (StatusCode::BAD_GATEWAY, "upstream request failed").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower::ServiceExt;

    #[test]
    fn rejects_bad_authority() {
        let config = UpstreamConfig {
            address: "no spaces allowed".to_string(),
        };
        assert!(matches!(
            UpstreamProxy::new(&config),
            Err(ProxyError::InvalidAuthority(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_upstream_maps_to_bad_gateway() {
        let config = UpstreamConfig {
            // reserved port, nothing listens there
            address: "127.0.0.1:1".to_string(),
        };
        let capability = UpstreamProxy::new(&config).unwrap().into_capability();

        let request = Request::builder()
            .uri("/api/pods")
            .body(Body::empty())
            .unwrap();
        let response = capability.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
