//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: repository/service wiring and the optional database pool
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: query/response DTOs and pagination parsing
//! - `errors.rs`: the response envelope and error mapping

use std::sync::Arc;
use std::time::Duration;

use axum::{Extension, Router, routing::get};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
///
/// Middleware order, outermost first: request id, access log, panic
/// recovery, request deadline, 405 envelope rewrite.
pub fn build_app(services: services::AppServices, request_timeout: Duration) -> Router {
    let services = Arc::new(services);

    Router::new()
        .route("/", get(routes::system::index))
        .route("/health", get(routes::system::health))
        .route("/ready", get(routes::system::ready))
        .merge(routes::docs::router())
        .nest("/items", routes::items::router())
        .fallback(routes::system::not_found)
        .layer(Extension(services))
        .layer(axum::middleware::from_fn(middleware::method_not_allowed))
        .layer(axum::middleware::from_fn_with_state(
            request_timeout,
            middleware::request_deadline,
        ))
        .layer(axum::middleware::from_fn(middleware::catch_panic))
        .layer(axum::middleware::from_fn(middleware::access_log))
        .layer(axum::middleware::from_fn(middleware::request_id))
}
