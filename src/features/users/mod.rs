pub mod model;

use crate::error::ApiError;
use crate::extractors::{Payload, UserId};
use crate::features::endpoint_not_found;
use crate::AppState;
use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use model::{ErrorBody, JsonUser, UserPayload};

// mounted under /api/users
pub fn users_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_users_handler)
                .post(create_user_handler)
                .fallback(endpoint_not_found),
        )
        .route(
            "/{id}",
            get(get_user_handler)
                .put(update_user_handler)
                .delete(delete_user_handler)
                .fallback(endpoint_not_found),
        )
}

/// Get all users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "List of all users", body = Vec<JsonUser>),
        (status = 500, description = "Server error", body = ErrorBody),
    )
)]
pub async fn list_users_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<JsonUser>>, ApiError> {
    let users = state
        .users
        .list_users()
        .await
        .map_err(|e| ApiError::store("Failed to retrieve users", e))?;

    Ok(Json(users.into_iter().map(JsonUser::from).collect()))
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = JsonUser),
        (status = 400, description = "Invalid user ID", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody),
        (status = 500, description = "Server error", body = ErrorBody),
    )
)]
pub async fn get_user_handler(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> Result<Json<JsonUser>, ApiError> {
    let user = state
        .users
        .get_user(id)
        .await
        .map_err(|e| ApiError::store("Failed to retrieve user", e))?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(user.into()))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = UserPayload,
    responses(
        (status = 201, description = "User created", body = JsonUser),
        (status = 400, description = "Name is required, or email already exists", body = ErrorBody),
        (status = 500, description = "Server error", body = ErrorBody),
    )
)]
pub async fn create_user_handler(
    State(state): State<AppState>,
    Payload(payload): Payload<UserPayload>,
) -> Result<(StatusCode, Json<JsonUser>), ApiError> {
    // validation happens before the store is touched
    let new_user = payload.into_new_user()?;

    let user = state
        .users
        .create_user(&new_user)
        .await
        .map_err(|e| ApiError::store("Failed to create user", e))?;

    tracing::info!(id = user.id, "user created");
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Replace a user's name
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UserPayload,
    responses(
        (status = 200, description = "User updated", body = JsonUser),
        (status = 400, description = "Invalid user ID or name", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody),
        (status = 500, description = "Server error", body = ErrorBody),
    )
)]
pub async fn update_user_handler(
    State(state): State<AppState>,
    UserId(id): UserId,
    Payload(payload): Payload<UserPayload>,
) -> Result<Json<JsonUser>, ApiError> {
    let name = payload.valid_name()?;

    let user = state
        .users
        .update_user(id, name)
        .await
        .map_err(|e| ApiError::store("Failed to update user", e))?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(user.into()))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Invalid user ID", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody),
        (status = 500, description = "Server error", body = ErrorBody),
    )
)]
pub async fn delete_user_handler(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .users
        .delete_user(id)
        .await
        .map_err(|e| ApiError::store("Failed to delete user", e))?;

    if !deleted {
        return Err(ApiError::NotFound);
    }

    tracing::info!(id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
