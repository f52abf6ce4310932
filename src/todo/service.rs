use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::{
    models::TodoModel,
    repository::{TodoChanges, TodoRepository},
    types::{CreateTodoRequest, UpdateTodoRequest},
};
use crate::shared::AppError;

/// Service for handling todo business logic. Every operation is scoped to the
/// authenticated owner's id passed in by the handler.
pub struct TodoService {
    repository: Arc<dyn TodoRepository + Send + Sync>,
}

impl TodoService {
    pub fn new(repository: Arc<dyn TodoRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    /// Creates a todo owned by the caller. The title is required and trimmed;
    /// the description is trimmed when present.
    #[instrument(skip(self, request))]
    pub async fn create_todo(
        &self,
        owner_id: &str,
        request: CreateTodoRequest,
    ) -> Result<TodoModel, AppError> {
        let title = request
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Validation("Failed to save the todo.".to_string()))?;

        let description = request
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        let todo = TodoModel::new(title, description, owner_id.to_string());
        self.repository.create_todo(&todo).await?;

        info!(todo_id = %todo.id, owner_id = %owner_id, "Todo created");
        Ok(todo)
    }

    /// Lists every todo owned by the caller
    #[instrument(skip(self))]
    pub async fn list_todos(&self, owner_id: &str) -> Result<Vec<TodoModel>, AppError> {
        debug!(owner_id = %owner_id, "Listing todos");
        self.repository.list_for_owner(owner_id).await
    }

    /// Fetches a single owned todo by id
    #[instrument(skip(self))]
    pub async fn get_todo(&self, owner_id: &str, todo_id: &str) -> Result<TodoModel, AppError> {
        validate_id(todo_id)?;

        self.repository
            .find_for_owner(todo_id, owner_id)
            .await?
            .ok_or_else(|| AppError::NotFound("No matching todo found!".to_string()))
    }

    /// Updates an owned todo. `completed` and `completed_at` are re-derived
    /// from the payload's completed flag: true stamps now, anything else
    /// forces the pair back to open. A client-sent completedAt is never
    /// trusted.
    #[instrument(skip(self, request))]
    pub async fn update_todo(
        &self,
        owner_id: &str,
        todo_id: &str,
        request: UpdateTodoRequest,
    ) -> Result<TodoModel, AppError> {
        validate_id(todo_id)?;

        let completed = request.completed == Some(true);
        let changes = TodoChanges {
            title: request.title.map(|t| t.trim().to_string()),
            description: request.description.map(|d| d.trim().to_string()),
            completed,
            completed_at: completed.then(Utc::now),
        };

        let updated = self
            .repository
            .update_for_owner(todo_id, owner_id, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound("No matching todo found!".to_string()))?;

        info!(todo_id = %todo_id, completed = updated.completed, "Todo updated");
        Ok(updated)
    }

    /// Deletes an owned todo and returns the removed document
    #[instrument(skip(self))]
    pub async fn delete_todo(&self, owner_id: &str, todo_id: &str) -> Result<TodoModel, AppError> {
        validate_id(todo_id)?;

        let deleted = self
            .repository
            .delete_for_owner(todo_id, owner_id)
            .await?
            .ok_or_else(|| AppError::NotFound("No matching todo found!".to_string()))?;

        info!(todo_id = %todo_id, owner_id = %owner_id, "Todo deleted");
        Ok(deleted)
    }
}

fn validate_id(todo_id: &str) -> Result<(), AppError> {
    Uuid::parse_str(todo_id).map_err(|_| AppError::InvalidId)?;
    Ok(())
}
