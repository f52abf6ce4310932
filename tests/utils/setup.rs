use std::sync::Arc;

use axum::Router;
use todoapp::{
    auth::token::TokenConfig,
    build_router,
    shared::AppState,
    todo::repository::InMemoryTodoRepository,
    user::repository::InMemoryUserRepository,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

/// Full application router over in-memory repositories, with the concrete
/// repository handles kept around so tests can assert on store contents.
pub struct TestSetup {
    pub app: Router,
    pub user_repository: Arc<InMemoryUserRepository>,
    pub todo_repository: Arc<InMemoryTodoRepository>,
}

impl TestSetup {
    pub fn new() -> Self {
        let user_repository = Arc::new(InMemoryUserRepository::new());
        let todo_repository = Arc::new(InMemoryTodoRepository::new());
        let state = AppState::new(
            user_repository.clone(),
            todo_repository.clone(),
            TokenConfig::new(),
        );

        TestSetup {
            app: build_router(state),
            user_repository,
            todo_repository,
        }
    }
}

impl Default for TestSetup {
    fn default() -> Self {
        Self::new()
    }
}
