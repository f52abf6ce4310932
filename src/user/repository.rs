use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::models::{SessionToken, UserModel};
use crate::shared::AppError;

/// Trait for user repository operations
#[async_trait]
pub trait UserRepository {
    async fn create_user(&self, user: &UserModel) -> Result<(), AppError>;
    async fn find_by_id(&self, user_id: &str) -> Result<Option<UserModel>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError>;
    /// Finds the user whose id matches AND whose token list holds this exact
    /// token string at this access level.
    async fn find_by_token(
        &self,
        user_id: &str,
        token: &str,
        access: &str,
    ) -> Result<Option<UserModel>, AppError>;
    async fn add_token(&self, user_id: &str, entry: &SessionToken) -> Result<(), AppError>;
    /// Removes every token-list entry matching the token string. Removing an
    /// absent token is a no-op success.
    async fn remove_token(&self, user_id: &str, token: &str) -> Result<(), AppError>;
}

/// In-memory implementation of UserRepository for development and testing
///
/// Data is stored in memory and lost when the application restarts. The
/// per-document atomicity the handlers rely on comes from the Mutex.
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<String, UserModel>>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the current number of users in the repository
    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    /// Returns a snapshot of a stored user by id (useful for assertions)
    pub fn get_user(&self, user_id: &str) -> Option<UserModel> {
        self.users.lock().unwrap().get(user_id).cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self, user))]
    async fn create_user(&self, user: &UserModel) -> Result<(), AppError> {
        debug!(user_id = %user.id, email = %user.email, "Creating user in memory");

        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email == user.email) {
            warn!(email = %user.email, "Email already taken");
            return Err(AppError::Database("Email already exists".to_string()));
        }
        users.insert(user.id.clone(), user.clone());

        debug!(user_id = %user.id, "User created successfully in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, user_id: &str) -> Result<Option<UserModel>, AppError> {
        let users = self.users.lock().unwrap();
        Ok(users.get(user_id).cloned())
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError> {
        let users = self.users.lock().unwrap();
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    #[instrument(skip(self, token))]
    async fn find_by_token(
        &self,
        user_id: &str,
        token: &str,
        access: &str,
    ) -> Result<Option<UserModel>, AppError> {
        let users = self.users.lock().unwrap();
        Ok(users
            .get(user_id)
            .filter(|u| u.holds_token(token, access))
            .cloned())
    }

    #[instrument(skip(self, entry))]
    async fn add_token(&self, user_id: &str, entry: &SessionToken) -> Result<(), AppError> {
        debug!(user_id = %user_id, access = %entry.access, "Appending session token in memory");

        let mut users = self.users.lock().unwrap();
        let user = users.get_mut(user_id).ok_or_else(|| {
            warn!(user_id = %user_id, "User not found for token append");
            AppError::NotFound("User not found".to_string())
        })?;
        user.tokens.push(entry.clone());

        Ok(())
    }

    #[instrument(skip(self, token))]
    async fn remove_token(&self, user_id: &str, token: &str) -> Result<(), AppError> {
        debug!(user_id = %user_id, "Removing session token in memory");

        let mut users = self.users.lock().unwrap();
        let user = users.get_mut(user_id).ok_or_else(|| {
            warn!(user_id = %user_id, "User not found for token removal");
            AppError::NotFound("User not found".to_string())
        })?;
        user.tokens.retain(|entry| entry.token != token);

        Ok(())
    }
}

/// PostgreSQL implementation of user repository
///
/// Users live in a `users` table and session tokens in a `user_tokens`
/// table keyed by user id.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_tokens(&self, user_id: &str) -> Result<Vec<SessionToken>, AppError> {
        let rows = sqlx::query("SELECT access, token FROM user_tokens WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, user_id = %user_id, "Failed to load user tokens");
                AppError::Database(e.to_string())
            })?;

        Ok(rows
            .into_iter()
            .map(|row| SessionToken {
                access: row.get("access"),
                token: row.get("token"),
            })
            .collect())
    }

    async fn hydrate(&self, row: sqlx::postgres::PgRow) -> Result<UserModel, AppError> {
        let id: String = row.get("id");
        let tokens = self.load_tokens(&id).await?;
        Ok(UserModel {
            id,
            name: row.get("name"),
            location: row.get("location"),
            email: row.get("email"),
            contactno: row.get("contactno"),
            password_hash: row.get("password_hash"),
            tokens,
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[instrument(skip(self, user))]
    async fn create_user(&self, user: &UserModel) -> Result<(), AppError> {
        debug!(user_id = %user.id, email = %user.email, "Creating user in database");

        sqlx::query(
            "INSERT INTO users (id, name, location, email, contactno, password_hash) VALUES ($1, $2, $3, $4, $5, $6)"
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.location)
        .bind(&user.email)
        .bind(&user.contactno)
        .bind(&user.password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create user in database");
            AppError::Database(e.to_string())
        })?;

        debug!(user_id = %user.id, "User created successfully in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, user_id: &str) -> Result<Option<UserModel>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, location, email, contactno, password_hash FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, user_id = %user_id, "Failed to fetch user from database");
            AppError::Database(e.to_string())
        })?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, location, email, contactno, password_hash FROM users WHERE email = $1"
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to fetch user by email from database");
            AppError::Database(e.to_string())
        })?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, token))]
    async fn find_by_token(
        &self,
        user_id: &str,
        token: &str,
        access: &str,
    ) -> Result<Option<UserModel>, AppError> {
        let row = sqlx::query(
            "SELECT u.id, u.name, u.location, u.email, u.contactno, u.password_hash \
             FROM users u JOIN user_tokens t ON t.user_id = u.id \
             WHERE u.id = $1 AND t.token = $2 AND t.access = $3",
        )
        .bind(user_id)
        .bind(token)
        .bind(access)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, user_id = %user_id, "Failed to fetch user by token from database");
            AppError::Database(e.to_string())
        })?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, entry))]
    async fn add_token(&self, user_id: &str, entry: &SessionToken) -> Result<(), AppError> {
        debug!(user_id = %user_id, access = %entry.access, "Appending session token in database");

        sqlx::query("INSERT INTO user_tokens (user_id, access, token) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(&entry.access)
            .bind(&entry.token)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, user_id = %user_id, "Failed to append session token");
                AppError::Database(e.to_string())
            })?;

        Ok(())
    }

    #[instrument(skip(self, token))]
    async fn remove_token(&self, user_id: &str, token: &str) -> Result<(), AppError> {
        debug!(user_id = %user_id, "Removing session token from database");

        // No rows_affected check: removing an absent token is a no-op success
        sqlx::query("DELETE FROM user_tokens WHERE user_id = $1 AND token = $2")
            .bind(user_id)
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, user_id = %user_id, "Failed to remove session token");
                AppError::Database(e.to_string())
            })?;

        Ok(())
    }
}
