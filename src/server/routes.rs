//! Route table construction.
//!
//! # Responsibilities
//! - Register the fixed control endpoints (token update, health check)
//! - Offer diagnostic collaborators a registration surface
//! - Install the catch-all proxy dispatch
//!
//! # Design Decisions
//! - Registration order is part of the contract: the catch-all is installed
//!   strictly last so it can never shadow a control or diagnostic route
//! - Control-path matching is exact; `/v1/tokens` belongs to the proxy
//! - A disallowed method on a control path is answered with 405 by the
//!   method router, never forwarded upstream
//! - The built table is immutable and shared read-only by the serve loop

use std::convert::Infallible;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::routing::{any_service, get, post_service};
use axum::Router;
use tower::util::BoxCloneSyncService;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::server::handlers;

/// Control path for bootstrap join-token updates.
pub const TOKEN_PATH: &str = "/v1/token";

/// Control path for the liveness probe.
pub const HEALTH_PATH: &str = "/v1/healthz";

/// An injected HTTP capability: accepts a request, produces a response.
///
/// The gateway imposes nothing on the capability's internals beyond the
/// service contract.
pub type HttpCapability = BoxCloneSyncService<Request<Body>, Response, Infallible>;

/// Registration hook for an external diagnostics collaborator.
///
/// Invoked with the partially built route table, before the catch-all is
/// installed; whatever it registers stays reachable.
pub type DiagnosticsInstaller = Box<dyn FnOnce(Router) -> Router + Send>;

/// The externally supplied capabilities wired into the route table.
pub struct RouteCapabilities {
    /// Handles POST/PUT on the token control path.
    pub token_update: HttpCapability,

    /// Optional diagnostics registration hook.
    pub diagnostics: Option<DiagnosticsInstaller>,

    /// Receives every request no other entry matched.
    pub proxy: HttpCapability,
}

/// Build the ordered route table.
///
/// Entries are registered in a fixed order: token update, health check,
/// diagnostics, then the catch-all. The catch-all must stay last.
pub fn build_routes(caps: RouteCapabilities) -> Router {
    let router = Router::new()
        .route(
            TOKEN_PATH,
            post_service(caps.token_update.clone()).put_service(caps.token_update),
        )
        .route(HEALTH_PATH, get(handlers::healthz));

    let router = match caps.diagnostics {
        Some(install) => install(router),
        None => router,
    };

    // catch-all goes last; anything registered after it would be unreachable
    router
        .route("/{*path}", any_service(caps.proxy.clone()))
        .route("/", any_service(caps.proxy))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::{Method, StatusCode};
    use axum::response::IntoResponse;
    use tower::{service_fn, ServiceExt};

    fn tagged(tag: &'static str) -> HttpCapability {
        BoxCloneSyncService::new(service_fn(move |_req: Request<Body>| async move {
            Ok::<_, Infallible>((StatusCode::OK, tag).into_response())
        }))
    }

    fn table(diagnostics: Option<DiagnosticsInstaller>) -> Router {
        build_routes(RouteCapabilities {
            token_update: tagged("token"),
            diagnostics,
            proxy: tagged("proxy"),
        })
    }

    async fn dispatch(router: Router, method: Method, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn health_check_returns_ok() {
        let (status, body) = dispatch(table(None), Method::GET, HEALTH_PATH).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn token_path_dispatches_to_capability() {
        for method in [Method::POST, Method::PUT] {
            let (status, body) = dispatch(table(None), method, TOKEN_PATH).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, "token");
        }
    }

    #[tokio::test]
    async fn token_method_mismatch_is_rejected_not_proxied() {
        let (status, body) = dispatch(table(None), Method::GET, TOKEN_PATH).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_ne!(body, "proxy");
    }

    #[tokio::test]
    async fn control_path_matching_is_exact() {
        let (status, body) = dispatch(table(None), Method::GET, "/v1/tokens").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "proxy");

        let (_, body) = dispatch(table(None), Method::GET, "/v1/healthz/live").await;
        assert_eq!(body, "proxy");
    }

    #[tokio::test]
    async fn unmatched_paths_fall_through_to_proxy() {
        for path in ["/", "/api/pods", "/v2/token"] {
            let (status, body) = dispatch(table(None), Method::DELETE, path).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, "proxy");
        }
    }

    #[tokio::test]
    async fn diagnostic_routes_are_not_shadowed_by_catch_all() {
        let installer: DiagnosticsInstaller = Box::new(|router| {
            router.route("/debug/ping", get(|| async { "pong" }))
        });

        let (status, body) = dispatch(table(Some(installer)), Method::GET, "/debug/ping").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "pong");
    }

    #[tokio::test]
    async fn rebuilding_yields_an_equivalent_table() {
        let probes = [
            (Method::GET, HEALTH_PATH),
            (Method::POST, TOKEN_PATH),
            (Method::GET, TOKEN_PATH),
            (Method::GET, "/v1/tokens"),
            (Method::PATCH, "/anything/else"),
        ];

        for (method, path) in probes {
            let first = dispatch(table(None), method.clone(), path).await;
            let second = dispatch(table(None), method, path).await;
            assert_eq!(first, second);
        }
    }

    #[tokio::test]
    async fn responses_carry_a_request_id() {
        let request = Request::builder()
            .uri(HEALTH_PATH)
            .body(Body::empty())
            .unwrap();
        let response = table(None).oneshot(request).await.unwrap();
        assert!(response.headers().contains_key("x-request-id"));
    }
}
