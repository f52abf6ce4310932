use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::TodoModel;
use crate::shared::AppError;

/// Field set applied by an update. `title`/`description` are merged when
/// present; `completed`/`completed_at` are always written as a pair so the
/// completion invariant cannot drift.
#[derive(Debug, Clone)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Trait for todo repository operations. Every query is scoped by the owning
/// user's id; there is no unscoped access path.
#[async_trait]
pub trait TodoRepository {
    async fn create_todo(&self, todo: &TodoModel) -> Result<(), AppError>;
    async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<TodoModel>, AppError>;
    async fn find_for_owner(
        &self,
        todo_id: &str,
        owner_id: &str,
    ) -> Result<Option<TodoModel>, AppError>;
    /// Applies changes and returns the updated document, or None when no
    /// owned todo matches.
    async fn update_for_owner(
        &self,
        todo_id: &str,
        owner_id: &str,
        changes: &TodoChanges,
    ) -> Result<Option<TodoModel>, AppError>;
    /// Deletes and returns the removed document, or None when no owned todo
    /// matches.
    async fn delete_for_owner(
        &self,
        todo_id: &str,
        owner_id: &str,
    ) -> Result<Option<TodoModel>, AppError>;
}

/// In-memory implementation of TodoRepository for development and testing
pub struct InMemoryTodoRepository {
    todos: Mutex<HashMap<String, TodoModel>>,
}

impl Default for InMemoryTodoRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTodoRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            todos: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the current number of todos in the repository
    pub fn todo_count(&self) -> usize {
        self.todos.lock().unwrap().len()
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    #[instrument(skip(self, todo))]
    async fn create_todo(&self, todo: &TodoModel) -> Result<(), AppError> {
        debug!(todo_id = %todo.id, owner_id = %todo.created_by, "Creating todo in memory");

        let mut todos = self.todos.lock().unwrap();
        todos.insert(todo.id.clone(), todo.clone());

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<TodoModel>, AppError> {
        let todos = self.todos.lock().unwrap();
        Ok(todos
            .values()
            .filter(|t| t.created_by == owner_id)
            .cloned()
            .collect())
    }

    #[instrument(skip(self))]
    async fn find_for_owner(
        &self,
        todo_id: &str,
        owner_id: &str,
    ) -> Result<Option<TodoModel>, AppError> {
        let todos = self.todos.lock().unwrap();
        Ok(todos
            .get(todo_id)
            .filter(|t| t.created_by == owner_id)
            .cloned())
    }

    #[instrument(skip(self, changes))]
    async fn update_for_owner(
        &self,
        todo_id: &str,
        owner_id: &str,
        changes: &TodoChanges,
    ) -> Result<Option<TodoModel>, AppError> {
        debug!(todo_id = %todo_id, owner_id = %owner_id, "Updating todo in memory");

        let mut todos = self.todos.lock().unwrap();
        let Some(todo) = todos.get_mut(todo_id).filter(|t| t.created_by == owner_id) else {
            return Ok(None);
        };

        if let Some(title) = &changes.title {
            todo.title = title.clone();
        }
        if let Some(description) = &changes.description {
            todo.description = Some(description.clone());
        }
        todo.completed = changes.completed;
        todo.completed_at = changes.completed_at;

        Ok(Some(todo.clone()))
    }

    #[instrument(skip(self))]
    async fn delete_for_owner(
        &self,
        todo_id: &str,
        owner_id: &str,
    ) -> Result<Option<TodoModel>, AppError> {
        debug!(todo_id = %todo_id, owner_id = %owner_id, "Deleting todo from memory");

        let mut todos = self.todos.lock().unwrap();
        if todos
            .get(todo_id)
            .map(|t| t.created_by != owner_id)
            .unwrap_or(true)
        {
            return Ok(None);
        }
        Ok(todos.remove(todo_id))
    }
}

/// PostgreSQL implementation of todo repository
pub struct PostgresTodoRepository {
    pool: PgPool,
}

impl PostgresTodoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_todo(row: sqlx::postgres::PgRow) -> TodoModel {
    TodoModel {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        completed: row.get("completed"),
        completed_at: row.get("completed_at"),
        created_by: row.get("created_by"),
    }
}

const TODO_COLUMNS: &str = "id, title, description, completed, completed_at, created_by";

#[async_trait]
impl TodoRepository for PostgresTodoRepository {
    #[instrument(skip(self, todo))]
    async fn create_todo(&self, todo: &TodoModel) -> Result<(), AppError> {
        debug!(todo_id = %todo.id, owner_id = %todo.created_by, "Creating todo in database");

        sqlx::query(
            "INSERT INTO todos (id, title, description, completed, completed_at, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&todo.id)
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.completed)
        .bind(todo.completed_at)
        .bind(&todo.created_by)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create todo in database");
            AppError::Database(e.to_string())
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<TodoModel>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM todos WHERE created_by = $1",
            TODO_COLUMNS
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, owner_id = %owner_id, "Failed to list todos from database");
            AppError::Database(e.to_string())
        })?;

        Ok(rows.into_iter().map(row_to_todo).collect())
    }

    #[instrument(skip(self))]
    async fn find_for_owner(
        &self,
        todo_id: &str,
        owner_id: &str,
    ) -> Result<Option<TodoModel>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM todos WHERE id = $1 AND created_by = $2",
            TODO_COLUMNS
        ))
        .bind(todo_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, todo_id = %todo_id, "Failed to fetch todo from database");
            AppError::Database(e.to_string())
        })?;

        Ok(row.map(row_to_todo))
    }

    #[instrument(skip(self, changes))]
    async fn update_for_owner(
        &self,
        todo_id: &str,
        owner_id: &str,
        changes: &TodoChanges,
    ) -> Result<Option<TodoModel>, AppError> {
        debug!(todo_id = %todo_id, owner_id = %owner_id, "Updating todo in database");

        let row = sqlx::query(&format!(
            "UPDATE todos SET title = COALESCE($3, title), \
             description = COALESCE($4, description), \
             completed = $5, completed_at = $6 \
             WHERE id = $1 AND created_by = $2 RETURNING {}",
            TODO_COLUMNS
        ))
        .bind(todo_id)
        .bind(owner_id)
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(changes.completed)
        .bind(changes.completed_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, todo_id = %todo_id, "Failed to update todo in database");
            AppError::Database(e.to_string())
        })?;

        Ok(row.map(row_to_todo))
    }

    #[instrument(skip(self))]
    async fn delete_for_owner(
        &self,
        todo_id: &str,
        owner_id: &str,
    ) -> Result<Option<TodoModel>, AppError> {
        debug!(todo_id = %todo_id, owner_id = %owner_id, "Deleting todo from database");

        let row = sqlx::query(&format!(
            "DELETE FROM todos WHERE id = $1 AND created_by = $2 RETURNING {}",
            TODO_COLUMNS
        ))
        .bind(todo_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, todo_id = %todo_id, "Failed to delete todo from database");
            AppError::Database(e.to_string())
        })?;

        Ok(row.map(row_to_todo))
    }
}
