use serde::{Deserialize, Serialize};

use super::models::UserModel;

/// Request body for POST /users
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub contactno: Option<String>,
    pub password: Option<String>,
}

/// Request body for POST /users/login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Public projection of a user - everything user-facing endpoints return.
/// The password hash and token list never leave the service.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct UserResponse {
    pub name: String,
    pub email: String,
    pub location: String,
    pub contactno: String,
}

impl From<&UserModel> for UserResponse {
    fn from(user: &UserModel) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            location: user.location.clone(),
            contactno: user.contactno.clone(),
        }
    }
}
