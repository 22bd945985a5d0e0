//! Response envelope and error mapping.
//!
//! Every JSON response has the same shape:
//!
//! ```json
//! { "data": ..., "error": { "code": "...", "message": "..." },
//!   "meta": { "request_id": "...", "time_utc": "..." } }
//! ```
//!
//! `data` and `error` are mutually exclusive; `meta` is always present.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use catalog_core::DomainError;
use catalog_items::CatalogError;

use crate::context::RequestContext;

#[derive(Debug, Serialize)]
struct Envelope<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorBody>,
    meta: Meta,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

#[derive(Debug, Serialize)]
struct Meta {
    request_id: String,
    time_utc: String,
}

impl Meta {
    fn for_request(ctx: &RequestContext) -> Self {
        Self {
            request_id: ctx.request_id().to_string(),
            time_utc: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// Success envelope carrying `data`.
pub fn json_ok<T: Serialize>(ctx: &RequestContext, status: StatusCode, data: T) -> Response {
    let envelope = Envelope {
        data: Some(data),
        error: None,
        meta: Meta::for_request(ctx),
    };
    (status, Json(envelope)).into_response()
}

/// Error envelope with a stable machine-readable `code`.
pub fn json_error(
    ctx: &RequestContext,
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> Response {
    let envelope: Envelope<()> = Envelope {
        data: None,
        error: Some(ErrorBody {
            code,
            message: message.into(),
        }),
        meta: Meta::for_request(ctx),
    };
    (status, Json(envelope)).into_response()
}

/// Map a catalog failure to its HTTP response.
///
/// Storage failures are logged with their full chain; the client only ever
/// sees a generic message.
pub fn catalog_error_to_response(ctx: &RequestContext, err: CatalogError) -> Response {
    match err {
        CatalogError::Domain(e) => {
            let code = e.code();
            let (status, message) = match e {
                DomainError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
                DomainError::DuplicateName => {
                    (StatusCode::CONFLICT, "item name already exists".to_string())
                }
                DomainError::NotFound => (StatusCode::NOT_FOUND, "item not found".to_string()),
            };
            json_error(ctx, status, code, message)
        }
        CatalogError::Storage(e) => {
            tracing::error!(request_id = ctx.request_id(), error = ?e, "storage failure");
            internal_error(ctx)
        }
    }
}

/// Generic 500. Whatever went wrong stays in the logs.
pub fn internal_error(ctx: &RequestContext) -> Response {
    json_error(
        ctx,
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "unexpected error",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn ctx() -> RequestContext {
        RequestContext::new("req-1")
    }

    #[tokio::test]
    async fn ok_envelope_has_data_and_meta_only() {
        let response = json_ok(&ctx(), StatusCode::CREATED, serde_json::json!({ "x": 1 }));
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        assert_eq!(body["data"]["x"], 1);
        assert!(body.get("error").is_none());
        assert_eq!(body["meta"]["request_id"], "req-1");
        assert!(body["meta"]["time_utc"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn domain_errors_map_to_status_and_code() {
        let cases = [
            (
                CatalogError::from(DomainError::invalid_input("bad price")),
                StatusCode::BAD_REQUEST,
                "invalid_input",
                "bad price",
            ),
            (
                DomainError::DuplicateName.into(),
                StatusCode::CONFLICT,
                "conflict",
                "item name already exists",
            ),
            (
                DomainError::NotFound.into(),
                StatusCode::NOT_FOUND,
                "not_found",
                "item not found",
            ),
        ];

        for (err, status, code, message) in cases {
            let response = catalog_error_to_response(&ctx(), err);
            assert_eq!(response.status(), status);
            let body = body_json(response).await;
            assert_eq!(body["error"]["code"], code);
            assert_eq!(body["error"]["message"], message);
            assert!(body.get("data").is_none());
        }
    }

    #[tokio::test]
    async fn storage_detail_is_not_leaked() {
        let err = CatalogError::storage(anyhow::anyhow!("connection refused to 10.0.0.5"));
        let response = catalog_error_to_response(&ctx(), err);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "internal_error");
        assert_eq!(body["error"]["message"], "unexpected error");
        assert!(!body.to_string().contains("10.0.0.5"));
    }
}
