// Library crate for the todo backend
// This file exposes the public API for integration tests

pub mod auth;
pub mod shared;
pub mod todo;
pub mod user;

// Re-export commonly used types for easier access in tests
pub use shared::{AppError, AppState};

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Assembles the full application router over the given state.
/// Shared by main and the integration tests so both exercise the same
/// routes and middleware stack.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/todos", get(todo::list_todos).post(todo::create_todo))
        .route(
            "/todos/:id",
            get(todo::get_todo)
                .patch(todo::update_todo)
                .delete(todo::delete_todo),
        )
        .route("/users/me", get(user::me))
        .route("/users/me/token", delete(user::revoke_token))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::token_auth,
        ));

    Router::new()
        .route("/users", post(user::signup))
        .route("/users/login", post(user::login))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
