//! Embedded API documentation: Swagger UI plus the OpenAPI document.

use axum::{
    Router,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};

pub const OPENAPI_YAML: &str = include_str!("../../../assets/openapi.yaml");
pub const SWAGGER_HTML: &str = include_str!("../../../assets/swagger.html");

pub fn router() -> Router {
    Router::new()
        .route("/docs", get(redirect_to_docs))
        .route("/docs/", get(swagger_ui))
        .route("/docs/openapi.yaml", get(openapi))
        .route("/openapi.yaml", get(openapi))
}

pub async fn redirect_to_docs() -> Response {
    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, "/docs/")]).into_response()
}

pub async fn swagger_ui() -> Html<&'static str> {
    Html(SWAGGER_HTML)
}

pub async fn openapi() -> Response {
    (
        [(header::CONTENT_TYPE, "application/yaml; charset=utf-8")],
        OPENAPI_YAML,
    )
        .into_response()
}
