//! Diagnostics registration.
//!
//! Default implementation of the diagnostics collaborator: registers its
//! routes on the table it is given, before the catch-all is installed.

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::server::DiagnosticsInstaller;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
}

/// Installer registering the `/debug` diagnostic routes.
pub fn installer() -> DiagnosticsInstaller {
    Box::new(|router: Router| router.route("/debug/status", get(get_status)))
}

async fn get_status() -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn status_reports_crate_version() {
        let router = installer()(Router::new());
        let response = router
            .oneshot(Request::builder().uri("/debug/status").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        let status: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(status["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(status["status"], "operational");
    }
}
