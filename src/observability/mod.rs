//! Observability subsystem.
//!
//! Structured logging only; deeper diagnostics are registered on the route
//! table by the diagnostics installer, not here.

pub mod logging;
