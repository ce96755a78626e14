//! Todo HTTP handlers and DTOs.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::auth::handlers::MessageResponse;
use crate::db::Todo;
use crate::error::AppError;
use crate::pagination::{PageParams, Paginated};
use crate::todos::TodoUpdate;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTodoRequest {
    #[validate(length(min = 3, max = 100))]
    pub title: String,
    #[validate(length(min = 1, max = 255))]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

/// Partial update; absent or empty fields keep the stored values, so only
/// upper bounds are validated here.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTodoRequest {
    #[validate(length(max = 100))]
    pub title: Option<String>,
    #[validate(length(max = 255))]
    pub description: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct TodoResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<String>,
}

impl From<Todo> for TodoResponse {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id,
            title: todo.title,
            description: todo.description,
            completed: todo.completed,
            created_at: todo.created_at.to_rfc3339(),
            updated_at: todo.updated_at.to_rfc3339(),
            deleted_at: todo.deleted_at.map(|d| d.to_rfc3339()),
        }
    }
}

fn to_page(page: Paginated<Todo>) -> Paginated<TodoResponse> {
    Paginated {
        page: page.page,
        limit: page.limit,
        total_rows: page.total_rows,
        total_pages: page.total_pages,
        data: page.data.into_iter().map(Into::into).collect(),
    }
}

/// POST /api/todos
pub async fn create_todo(
    State(state): State<AppState>,
    Json(body): Json<CreateTodoRequest>,
) -> Result<(StatusCode, Json<TodoResponse>), AppError> {
    body.validate().map_err(AppError::from_validation)?;

    let todo = state
        .todo_service
        .create(&body.title, &body.description, body.completed)
        .await?;
    Ok((StatusCode::CREATED, Json(todo.into())))
}

/// GET /api/todos/:id
pub async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TodoResponse>, AppError> {
    let todo = state.todo_service.get(id).await?;
    Ok(Json(todo.into()))
}

/// GET /api/todos?page=&limit=
pub async fn list_todos(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Paginated<TodoResponse>>, AppError> {
    let params = PageParams::new(query.page, query.limit);
    let page = state.todo_service.list(params).await?;
    Ok(Json(to_page(page)))
}

/// GET /api/todos/all?page=&limit= — includes soft-deleted rows.
pub async fn list_todos_with_deleted(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Paginated<TodoResponse>>, AppError> {
    let params = PageParams::new(query.page, query.limit);
    let page = state.todo_service.list_with_deleted(params).await?;
    Ok(Json(to_page(page)))
}

/// PUT /api/todos/:id — partial merge.
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateTodoRequest>,
) -> Result<Json<TodoResponse>, AppError> {
    body.validate().map_err(AppError::from_validation)?;

    let update = TodoUpdate {
        title: body.title,
        description: body.description,
        completed: body.completed,
    };
    let todo = state.todo_service.update(id, update).await?;
    Ok(Json(todo.into()))
}

/// DELETE /api/todos/:id — soft delete.
pub async fn soft_delete_todo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    state.todo_service.soft_delete(id).await?;
    Ok(MessageResponse::new("Todo deleted successfully"))
}

/// PATCH /api/todos/:id/restore
pub async fn restore_todo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    state.todo_service.restore(id).await?;
    Ok(MessageResponse::new("Todo restored successfully"))
}

/// DELETE /api/todos/:id/hard — physical removal.
pub async fn hard_delete_todo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    state.todo_service.hard_delete(id).await?;
    Ok(MessageResponse::new("Todo permanently deleted"))
}
