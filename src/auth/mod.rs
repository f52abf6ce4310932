// Public API - what other modules can use
pub use middleware::token_auth;
pub use types::{AuthClaims, AuthSession, ACCESS_AUTH};

// Internal modules
mod middleware;
pub mod password;
pub mod token;
mod types;
