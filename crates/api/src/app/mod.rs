//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: backend adapters (hosted or in-memory)
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request/response DTOs and input validation
//! - `errors.rs`: the error boundary every handler funnels into
//! - `cookies.rs`: session cookie parsing and formatting

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::middleware;

pub mod cookies;
pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router from configuration (used by `main.rs`).
pub fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let services = services::build_services(config)?;
    Ok(router(services))
}

/// Router over an explicit set of services (tests inject in-memory ones).
pub fn router(services: services::AppServices) -> Router {
    let services = Arc::new(services);

    let session_routes = routes::router()
        .layer(Extension(services.clone()))
        .layer(axum::middleware::from_fn_with_state(
            services,
            middleware::session_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(session_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(errors::panic_response)),
        )
}
