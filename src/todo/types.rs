use serde::{Deserialize, Serialize};

use super::models::TodoModel;

/// Request body for POST /todos
#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Request body for PATCH /todos/:id
///
/// Only these three fields are considered; a client-supplied completedAt is
/// ignored and re-derived from `completed`.
#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

/// Response body for GET /todos
#[derive(Debug, Serialize, Deserialize)]
pub struct TodoListResponse {
    pub todos: Vec<TodoModel>,
}
