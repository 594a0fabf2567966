//! User management handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use taskstack_store::{NewPrincipal, PrincipalUpdate, Role};

use crate::dto::{CreateUserRequest, UpdateUserRequest, UserResponse};
use crate::error::{ApiError, ApiResult};
use crate::extractors::{Identity, ValidatedJson};
use crate::state::AppState;

fn user_not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("User not found with id: {id}"))
}

/// List all users
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users", body = [UserResponse]),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state.users.list_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Fetch a single user
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "The user", body = UserResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .users
        .find_user_by_id(id)
        .await?
        .ok_or_else(|| user_not_found(id))?;

    Ok(Json(user.into()))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Not authenticated"),
        (status = 409, description = "Username or email already exists")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let password_hash = state.auth.password.hash(&request.password)?;

    let user = state
        .users
        .save(NewPrincipal {
            username: request.username,
            email: request.email,
            password_hash,
            role: Role::User,
        })
        .await?;

    tracing::info!(user_id = %user.id, by = %identity.username, "User created");
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Update a user's profile fields
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Username or email already exists")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .users
        .update_user(
            id,
            PrincipalUpdate {
                username: request.username,
                email: request.email,
            },
        )
        .await?;

    Ok(Json(user.into()))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.users.delete_user(id).await?;
    tracing::info!(user_id = %id, by = %identity.username, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
