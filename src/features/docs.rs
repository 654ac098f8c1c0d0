//! Machine-readable API description, generated from the handler annotations.

use crate::features::endpoint_not_found;
use crate::features::health::{self, HealthStatus};
use crate::features::users::{
    self,
    model::{ErrorBody, JsonUser, UserPayload},
};
use axum::{Json, Router, routing::get};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "EcoCompanion API",
        version = "1.0.0",
        description = "API documentation for EcoCompanion backend"
    ),
    servers((url = "http://localhost:3000", description = "Development server")),
    paths(
        users::list_users_handler,
        users::get_user_handler,
        users::create_user_handler,
        users::update_user_handler,
        users::delete_user_handler,
        health::health_handler,
    ),
    components(schemas(JsonUser, UserPayload, ErrorBody, HealthStatus)),
    tags(
        (name = "Users", description = "User management endpoints"),
        (name = "Health", description = "Service health")
    )
)]
pub struct ApiDoc;

pub fn docs_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route(
        "/api-docs/openapi.json",
        get(openapi_handler).fallback(endpoint_not_found),
    )
}

async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
