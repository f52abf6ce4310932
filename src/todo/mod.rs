// Public API - what other modules can use
pub use handlers::{create_todo, delete_todo, get_todo, list_todos, update_todo};
pub use types::TodoListResponse;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
mod types;
