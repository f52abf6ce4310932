use serde::{Deserialize, Serialize};

use crate::user::models::UserModel;

/// Access level granted to session tokens issued by signup/login.
pub const ACCESS_AUTH: &str = "auth";

/// Signed claim embedded in a session token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthClaims {
    /// Owning user's id
    pub sub: String,
    /// Access level label, always "auth" for tokens we issue
    pub access: String,
}

/// Authenticated requester, inserted into request extensions by the
/// auth middleware and extracted by protected handlers.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: UserModel,
    pub token: String,
}
