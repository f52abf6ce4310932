use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One active session on a user: the access level label plus the exact
/// signed token string presented back by the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionToken {
    pub access: String,
    pub token: String,
}

/// Database model for user accounts
///
/// `password_hash` holds an argon2 PHC string from the moment the model is
/// constructed; plaintext never reaches a repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserModel {
    pub id: String, // UUID v4 as string
    pub name: String,
    pub location: String,
    pub email: String,
    pub contactno: String,
    pub password_hash: String,
    pub tokens: Vec<SessionToken>, // one entry per active session
}

impl UserModel {
    /// Creates a new user model with a generated id and an empty session list.
    /// A missing location defaults to "Unknown".
    pub fn new(
        name: String,
        location: Option<String>,
        email: String,
        contactno: String,
        password_hash: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            location: location.unwrap_or_else(|| "Unknown".to_string()),
            email,
            contactno,
            password_hash,
            tokens: Vec::new(),
        }
    }

    /// Whether the token list holds this exact token string at this access level
    pub fn holds_token(&self, token: &str, access: &str) -> bool {
        self.tokens
            .iter()
            .any(|entry| entry.token == token && entry.access == access)
    }
}
