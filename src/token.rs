//! Token-update capability.
//!
//! Decodes the join-token payload posted by the node bootstrapper and
//! hands the token to the certificate manager. The server shell only
//! dispatches to this capability; it owns none of the semantics.

use std::convert::Infallible;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tower::service_fn;
use tower::util::BoxCloneSyncService;

use crate::cert::CertificateManager;
use crate::server::HttpCapability;

/// Join tokens are tiny; anything bigger than this is not a token payload.
const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Debug, Deserialize)]
struct TokenUpdate {
    jointoken: String,
}

/// Build the HTTP capability serving POST/PUT on the token control path.
pub fn update_capability(manager: Arc<dyn CertificateManager>) -> HttpCapability {
    BoxCloneSyncService::new(service_fn(move |request: Request<Body>| {
        let manager = manager.clone();
        async move { Ok::<_, Infallible>(handle_update(manager, request).await) }
    }))
}

async fn handle_update(manager: Arc<dyn CertificateManager>, request: Request<Body>) -> Response {
    let bytes = match to_bytes(request.into_body(), MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(error = %err, "failed to read token payload");
            return (StatusCode::BAD_REQUEST, "failed to read token payload").into_response();
        }
    };

    let update: TokenUpdate = match serde_json::from_slice(&bytes) {
        Ok(update) => update,
        Err(err) => {
            tracing::warn!(error = %err, "malformed token payload");
            return (StatusCode::BAD_REQUEST, "malformed token payload").into_response();
        }
    };

    if update.jointoken.is_empty() {
        return (StatusCode::BAD_REQUEST, "empty join token").into_response();
    }

    let result =
        tokio::task::spawn_blocking(move || manager.update_join_token(&update.jointoken)).await;

    match result {
        Ok(Ok(())) => StatusCode::OK.into_response(),
        Ok(Err(err)) => {
            tracing::error!(error = %err, "join token update failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "join token update failed").into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "join token update task failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "join token update failed").into_response()
        }
    }
}
