use std::sync::Arc;
use std::time::Duration;

use axum::{extract::Extension, http::StatusCode, response::Response};
use serde_json::json;

use crate::app::errors::{json_error, json_ok};
use crate::app::services::AppServices;
use crate::context::RequestContext;

/// Upper bound on the readiness database ping.
const READY_PING_TIMEOUT: Duration = Duration::from_secs(2);

pub async fn index(Extension(ctx): Extension<RequestContext>) -> Response {
    json_ok(
        &ctx,
        StatusCode::OK,
        json!({
            "name": env!("CARGO_PKG_NAME"),
            "status": "ok",
            "docs": "/docs/",
            "health": "/health",
            "ready": "/ready",
            "openapi": "/openapi.yaml",
        }),
    )
}

/// Liveness. Never touches the database.
pub async fn health(Extension(ctx): Extension<RequestContext>) -> Response {
    json_ok(&ctx, StatusCode::OK, json!({ "status": "ok" }))
}

/// Readiness: the database must answer a ping within [`READY_PING_TIMEOUT`].
pub async fn ready(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
) -> Response {
    let Some(pool) = services.db.as_ref() else {
        return json_error(
            &ctx,
            StatusCode::SERVICE_UNAVAILABLE,
            "not_ready",
            "database pool not configured",
        );
    };

    match tokio::time::timeout(READY_PING_TIMEOUT, catalog_infra::db::ping(pool)).await {
        Ok(Ok(())) => json_ok(&ctx, StatusCode::OK, json!({ "status": "ready" })),
        Ok(Err(e)) => {
            tracing::warn!(request_id = ctx.request_id(), error = %e, "readiness ping failed");
            not_reachable(&ctx)
        }
        Err(_) => {
            tracing::warn!(request_id = ctx.request_id(), "readiness ping timed out");
            not_reachable(&ctx)
        }
    }
}

pub async fn not_found(Extension(ctx): Extension<RequestContext>) -> Response {
    json_error(&ctx, StatusCode::NOT_FOUND, "not_found", "resource not found")
}

fn not_reachable(ctx: &RequestContext) -> Response {
    json_error(
        ctx,
        StatusCode::SERVICE_UNAVAILABLE,
        "not_ready",
        "database is not reachable",
    )
}
