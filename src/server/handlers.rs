//! Built-in control handlers.

/// Liveness probe: always healthy once reachable.
///
/// Deliberately free of any dependency on the proxy, certificate manager,
/// or upstream connectivity. Orchestration probes rely on this staying a
/// cheap, fixed response.
pub async fn healthz() -> &'static str {
    "OK"
}
