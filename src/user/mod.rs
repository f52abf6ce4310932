// Public API - what other modules can use
pub use handlers::{login, me, revoke_token, signup};
pub use types::UserResponse;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
mod types;
