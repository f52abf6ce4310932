use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::{debug, info, instrument, warn};

use super::{
    models::{SessionToken, UserModel},
    repository::UserRepository,
    types::SignupRequest,
};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::TokenConfig;
use crate::auth::ACCESS_AUTH;
use crate::shared::AppError;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Service for handling user account business logic:
/// signup, credential verification, and the session token lifecycle.
pub struct UserService {
    repository: Arc<dyn UserRepository + Send + Sync>,
    token_config: TokenConfig,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository + Send + Sync>, token_config: TokenConfig) -> Self {
        Self {
            repository,
            token_config,
        }
    }

    /// Creates a user account and opens its first session.
    /// Returns the stored user together with the issued token.
    #[instrument(skip(self, request))]
    pub async fn signup(&self, request: SignupRequest) -> Result<(UserModel, String), AppError> {
        let name = required_trimmed(request.name, "name")?;
        let email = required_trimmed(request.email, "email")?;
        let contactno = required_trimmed(request.contactno, "contactno")?;
        let password = request
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::Validation("password is required.".to_string()))?;

        if !EMAIL_RE.is_match(&email) {
            warn!(email = %email, "Invalid email address on signup");
            return Err(AppError::Validation(format!(
                "{} is not a valid email address.",
                email
            )));
        }

        let password_hash = hash_password(&password)?;
        let location = request
            .location
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        let user = UserModel::new(name, location, email, contactno, password_hash);

        self.repository.create_user(&user).await?;
        info!(user_id = %user.id, "User created");

        let token = self.issue_token(&user.id).await?;
        Ok((user, token))
    }

    /// Verifies email/plaintext-password credentials and opens a new session.
    /// All failure modes collapse to the same opaque login error.
    #[instrument(skip(self, email, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<(UserModel, String), AppError> {
        let user = self.find_user_by_credentials(email, password).await?;
        let token = self.issue_token(&user.id).await?;
        info!(user_id = %user.id, "User logged in");
        Ok((user, token))
    }

    /// Looks up a user by exact email and compares the plaintext against the
    /// stored hash. Unknown email and wrong password are indistinguishable.
    #[instrument(skip(self, email, password))]
    pub async fn find_user_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserModel, AppError> {
        let user = self.repository.find_by_email(email).await?.ok_or_else(|| {
            debug!("No user with this email");
            AppError::LoginFailed
        })?;

        if !verify_password(password, &user.password_hash) {
            debug!(user_id = %user.id, "Password mismatch");
            return Err(AppError::LoginFailed);
        }

        Ok(user)
    }

    /// Signs a claim for the user, appends it to the user's token list, and
    /// returns the token string. Sessions accumulate; issuing a second token
    /// does not displace the first.
    #[instrument(skip(self))]
    pub async fn issue_token(&self, user_id: &str) -> Result<String, AppError> {
        let token = self
            .token_config
            .sign(user_id)
            .map_err(|e| AppError::Database(format!("Failed to sign token: {}", e)))?;

        self.repository
            .add_token(
                user_id,
                &SessionToken {
                    access: ACCESS_AUTH.to_string(),
                    token: token.clone(),
                },
            )
            .await?;

        debug!(user_id = %user_id, "Session token issued");
        Ok(token)
    }

    /// Removes every token-list entry matching this token string.
    /// Revoking an absent token is a no-op success.
    #[instrument(skip(self, token))]
    pub async fn revoke_token(&self, user_id: &str, token: &str) -> Result<(), AppError> {
        self.repository.remove_token(user_id, token).await?;
        info!(user_id = %user_id, "Session token revoked");
        Ok(())
    }
}

fn required_trimmed(value: Option<String>, field: &str) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{} is required.", field)))
}
