use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::{Extension, Path, Query, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use catalog_core::{DomainError, ItemId};
use catalog_items::{CreateItemInput, resolve_update};

use crate::app::dto::{ItemListResponse, ListItemsQuery, Pagination};
use crate::app::errors::{catalog_error_to_response, json_error, json_ok};
use crate::app::services::AppServices;
use crate::context::RequestContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_item).get(list_items))
        .route("/:id", get(get_item).patch(update_item).delete(delete_item))
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    body: Bytes,
) -> Response {
    let input: CreateItemInput = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => return invalid_json(&ctx, e),
    };

    match services.catalog.create(input).await {
        Ok(item) => json_ok(&ctx, StatusCode::CREATED, item),
        Err(e) => catalog_error_to_response(&ctx, e),
    }
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    query: Result<Query<ListItemsQuery>, QueryRejection>,
) -> Response {
    let Ok(Query(query)) = query else {
        return json_error(
            &ctx,
            StatusCode::BAD_REQUEST,
            "invalid_pagination",
            "malformed query string",
        );
    };
    let pagination = match Pagination::parse(query.page.as_deref(), query.limit.as_deref()) {
        Ok(v) => v,
        Err(msg) => return json_error(&ctx, StatusCode::BAD_REQUEST, "invalid_pagination", msg),
    };

    let search = query.query.unwrap_or_default();
    match services
        .catalog
        .list(pagination.page, pagination.limit, &search)
        .await
    {
        Ok(page) => json_ok(&ctx, StatusCode::OK, ItemListResponse::new(page, pagination)),
        Err(e) => catalog_error_to_response(&ctx, e),
    }
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&ctx, &id) {
        Ok(v) => v,
        Err(response) => return response,
    };

    match services.catalog.get(id).await {
        Ok(item) => json_ok(&ctx, StatusCode::OK, item),
        Err(e) => catalog_error_to_response(&ctx, e),
    }
}

/// `PATCH /items/:id`. Only the keys present in the body are touched;
/// `"description": null` clears the description.
pub async fn update_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    body: Bytes,
) -> Response {
    let id = match parse_id(&ctx, &id) {
        Ok(v) => v,
        Err(response) => return response,
    };

    let payload: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => return invalid_json(&ctx, e),
    };
    let input = match resolve_update(payload) {
        Ok(v) => v,
        Err(DomainError::InvalidInput(msg)) => {
            return json_error(&ctx, StatusCode::BAD_REQUEST, "invalid_json", msg);
        }
        Err(e) => return catalog_error_to_response(&ctx, e.into()),
    };

    match services.catalog.update(id, input).await {
        Ok(item) => json_ok(&ctx, StatusCode::OK, item),
        Err(e) => catalog_error_to_response(&ctx, e),
    }
}

pub async fn delete_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&ctx, &id) {
        Ok(v) => v,
        Err(response) => return response,
    };

    match services.catalog.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => catalog_error_to_response(&ctx, e),
    }
}

fn parse_id(ctx: &RequestContext, raw: &str) -> Result<ItemId, Response> {
    raw.parse().map_err(|_| {
        json_error(
            ctx,
            StatusCode::BAD_REQUEST,
            "invalid_id",
            "id must be a valid UUID",
        )
    })
}

fn invalid_json(ctx: &RequestContext, err: serde_json::Error) -> Response {
    json_error(
        ctx,
        StatusCode::BAD_REQUEST,
        "invalid_json",
        format!("invalid JSON body: {err}"),
    )
}
