//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: storage wiring and per-request service construction
//! - `routes/`: HTTP routes + handlers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};

pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router over the given services.
pub fn build_app(services: AppServices) -> Router {
    let services = Arc::new(services);
    tracing::info!(mode = services.mode(), "building router");

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(Extension(services))
}
