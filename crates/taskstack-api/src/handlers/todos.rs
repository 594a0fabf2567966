//! Todo handlers

use axum::{
    extract::{OriginalUri, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use taskstack_store::{NewTodo, TodoUpdate};

use crate::dto::{
    CreateTodoRequest, PaginatedResponse, PaginatedTodoResponse, TodoResponse, UpdateTodoRequest,
};
use crate::error::{ApiError, ApiResult};
use crate::extractors::{Identity, Pagination, ValidatedJson};
use crate::state::AppState;

fn todo_not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("Todo not found with id: {id}"))
}

/// List todos, paginated
#[utoipa::path(
    get,
    path = "/todos",
    tag = "Todos",
    params(
        ("page" = Option<u64>, Query, description = "Page number, 1-indexed"),
        ("per_page" = Option<u64>, Query, description = "Items per page, capped at 100")
    ),
    responses(
        (status = 200, description = "One page of todos", body = PaginatedTodoResponse),
        (status = 400, description = "Invalid pagination parameters"),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_todos(
    State(state): State<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
    Pagination(params): Pagination,
) -> ApiResult<Json<PaginatedResponse<TodoResponse>>> {
    let (records, total) = state
        .todos
        .list_todos(params.offset() as usize, params.limit() as usize)
        .await?;

    let content = records.into_iter().map(TodoResponse::from).collect();
    Ok(Json(PaginatedResponse::new(
        content,
        total as u64,
        params.page,
        params.limit(),
        uri.path(),
    )))
}

/// Fetch a single todo
#[utoipa::path(
    get,
    path = "/todos/{id}",
    tag = "Todos",
    params(("id" = Uuid, Path, description = "Todo id")),
    responses(
        (status = 200, description = "The todo", body = TodoResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Todo not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TodoResponse>> {
    let todo = state
        .todos
        .find_todo_by_id(id)
        .await?
        .ok_or_else(|| todo_not_found(id))?;

    Ok(Json(todo.into()))
}

/// Create a todo
#[utoipa::path(
    post,
    path = "/todos",
    tag = "Todos",
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "Todo created", body = TodoResponse),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Owning user not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_todo(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    ValidatedJson(request): ValidatedJson<CreateTodoRequest>,
) -> ApiResult<(StatusCode, Json<TodoResponse>)> {
    let todo = state
        .todos
        .create_todo(NewTodo {
            title: request.title,
            description: request.description,
            user_id: request.user_id,
        })
        .await?;

    tracing::info!(todo_id = %todo.id, by = %identity.username, "Todo created");
    Ok((StatusCode::CREATED, Json(todo.into())))
}

/// Update a todo
#[utoipa::path(
    put,
    path = "/todos/{id}",
    tag = "Todos",
    params(("id" = Uuid, Path, description = "Todo id")),
    request_body = UpdateTodoRequest,
    responses(
        (status = 200, description = "Todo updated", body = TodoResponse),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Todo not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateTodoRequest>,
) -> ApiResult<Json<TodoResponse>> {
    let todo = state
        .todos
        .update_todo(
            id,
            TodoUpdate {
                title: request.title,
                description: request.description,
                completed: request.completed,
            },
        )
        .await?;

    Ok(Json(todo.into()))
}

/// Delete a todo
#[utoipa::path(
    delete,
    path = "/todos/{id}",
    tag = "Todos",
    params(("id" = Uuid, Path, description = "Todo id")),
    responses(
        (status = 204, description = "Todo deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Todo not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_todo(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.todos.delete_todo(id).await?;
    tracing::info!(todo_id = %id, by = %identity.username, "Todo deleted");
    Ok(StatusCode::NO_CONTENT)
}
