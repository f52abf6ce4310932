use axum::{
    extract::{Path, State},
    Extension, Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    models::TodoModel,
    service::TodoService,
    types::{CreateTodoRequest, TodoListResponse, UpdateTodoRequest},
};
use crate::auth::AuthSession;
use crate::shared::{AppError, AppState};

/// HTTP handler for listing the caller's todos
///
/// GET /todos (auth required)
#[instrument(name = "list_todos", skip(state, session))]
pub async fn list_todos(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
) -> Result<Json<TodoListResponse>, AppError> {
    let service = TodoService::new(Arc::clone(&state.todo_repository));
    let todos = service.list_todos(&session.user.id).await?;

    info!(owner_id = %session.user.id, count = todos.len(), "Todos listed");
    Ok(Json(TodoListResponse { todos }))
}

/// HTTP handler for fetching one owned todo
///
/// GET /todos/:id (auth required)
#[instrument(name = "get_todo", skip(state, session))]
pub async fn get_todo(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    Path(id): Path<String>,
) -> Result<Json<TodoModel>, AppError> {
    let service = TodoService::new(Arc::clone(&state.todo_repository));
    let todo = service.get_todo(&session.user.id, &id).await?;

    Ok(Json(todo))
}

/// HTTP handler for creating a todo
///
/// POST /todos (auth required)
#[instrument(name = "create_todo", skip(state, session, request))]
pub async fn create_todo(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    Json(request): Json<CreateTodoRequest>,
) -> Result<Json<TodoModel>, AppError> {
    let service = TodoService::new(Arc::clone(&state.todo_repository));
    let todo = service.create_todo(&session.user.id, request).await?;

    info!(todo_id = %todo.id, "Todo created successfully");
    Ok(Json(todo))
}

/// HTTP handler for updating a todo
///
/// PATCH /todos/:id (auth required)
#[instrument(name = "update_todo", skip(state, session, request))]
pub async fn update_todo(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    Path(id): Path<String>,
    Json(request): Json<UpdateTodoRequest>,
) -> Result<Json<TodoModel>, AppError> {
    let service = TodoService::new(Arc::clone(&state.todo_repository));
    let todo = service.update_todo(&session.user.id, &id, request).await?;

    info!(todo_id = %todo.id, "Todo updated successfully");
    Ok(Json(todo))
}

/// HTTP handler for deleting a todo
///
/// DELETE /todos/:id (auth required)
#[instrument(name = "delete_todo", skip(state, session))]
pub async fn delete_todo(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    Path(id): Path<String>,
) -> Result<Json<TodoModel>, AppError> {
    let service = TodoService::new(Arc::clone(&state.todo_repository));
    let todo = service.delete_todo(&session.user.id, &id).await?;

    info!(todo_id = %todo.id, "Todo deleted successfully");
    Ok(Json(todo))
}
