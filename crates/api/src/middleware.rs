use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{HeaderName, HeaderValue, Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use futures::FutureExt;

use crate::app::errors::{internal_error, json_error};
use crate::context::RequestContext;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Longest client-supplied request id that is echoed back as-is.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Reuse the caller's `X-Request-Id` when it is sane, otherwise mint one.
/// The id is stored as a [`RequestContext`] extension and echoed on the
/// response.
pub async fn request_id(mut req: Request<Body>, next: Next) -> Response {
    let ctx = req
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|id| is_acceptable_request_id(id))
        .map(RequestContext::new)
        .unwrap_or_else(RequestContext::generate);

    req.extensions_mut().insert(ctx.clone());
    let mut response = next.run(req).await;

    if let Ok(value) = HeaderValue::from_str(ctx.request_id()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

fn is_acceptable_request_id(id: &str) -> bool {
    !id.is_empty() && id.len() <= MAX_REQUEST_ID_LEN && id.bytes().all(|b| b.is_ascii_graphic())
}

/// One line per request: method, path, status, latency and request id.
pub async fn access_log(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let request_id = request_context(&req).request_id().to_owned();
    let started = Instant::now();

    let response = next.run(req).await;

    tracing::info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        request_id = %request_id,
        "request completed"
    );
    response
}

/// Turn a panic anywhere below this layer into a 500 envelope, so the client
/// still gets an answer and the access log still sees the request.
pub async fn catch_panic(req: Request<Body>, next: Next) -> Response {
    let ctx = request_context(&req);

    match AssertUnwindSafe(next.run(req)).catch_unwind().await {
        Ok(response) => response,
        Err(payload) => {
            tracing::error!(
                request_id = ctx.request_id(),
                panic = panic_message(payload.as_ref()),
                "handler panicked"
            );
            internal_error(&ctx)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

/// Abort the handler (and whatever storage call it is awaiting) once the
/// request deadline passes, answering 504.
pub async fn request_deadline(
    State(timeout): State<Duration>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let ctx = request_context(&req);

    match tokio::time::timeout(timeout, next.run(req)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(request_id = ctx.request_id(), ?timeout, "request deadline exceeded");
            json_error(
                &ctx,
                StatusCode::GATEWAY_TIMEOUT,
                "timeout",
                "request timed out",
            )
        }
    }
}

/// The router answers an unsupported method with a bare 405; give it the
/// standard envelope, keeping the `Allow` header.
pub async fn method_not_allowed(req: Request<Body>, next: Next) -> Response {
    let ctx = request_context(&req);
    let response = next.run(req).await;
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }

    let mut rewritten = json_error(
        &ctx,
        StatusCode::METHOD_NOT_ALLOWED,
        "method_not_allowed",
        "method not allowed",
    );
    if let Some(allow) = response.headers().get(header::ALLOW) {
        rewritten.headers_mut().insert(header::ALLOW, allow.clone());
    }
    rewritten
}

fn request_context(req: &Request<Body>) -> RequestContext {
    req.extensions()
        .get::<RequestContext>()
        .cloned()
        .unwrap_or_else(RequestContext::generate)
}
