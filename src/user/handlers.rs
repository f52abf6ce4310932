use axum::{
    extract::State,
    http::StatusCode,
    response::AppendHeaders,
    Extension, Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    service::UserService,
    types::{LoginRequest, SignupRequest, UserResponse},
};
use crate::auth::AuthSession;
use crate::shared::{AppError, AppState};

/// HTTP handler for creating a user account
///
/// POST /users
/// Returns the public user and the session token in the x-auth header
#[instrument(name = "signup", skip(state, request))]
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(AppendHeaders<[(&'static str, String); 1]>, Json<UserResponse>), AppError> {
    info!("Creating new user account");

    let service = UserService::new(
        Arc::clone(&state.user_repository),
        state.token_config.clone(),
    );
    let (user, token) = service.signup(request).await?;

    info!(user_id = %user.id, "User signup completed");

    Ok((
        AppendHeaders([("x-auth", token)]),
        Json(UserResponse::from(&user)),
    ))
}

/// HTTP handler for logging in with email/password credentials
///
/// POST /users/login
/// Returns the public user and a fresh session token in the x-auth header
#[instrument(name = "login", skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<(AppendHeaders<[(&'static str, String); 1]>, Json<UserResponse>), AppError> {
    info!("Logging in user");

    let email = request.email.unwrap_or_default();
    let password = request.password.unwrap_or_default();

    let service = UserService::new(
        Arc::clone(&state.user_repository),
        state.token_config.clone(),
    );
    let (user, token) = service.login(&email, &password).await?;

    info!(user_id = %user.id, "User login completed");

    Ok((
        AppendHeaders([("x-auth", token)]),
        Json(UserResponse::from(&user)),
    ))
}

/// HTTP handler for fetching the caller's own profile
///
/// GET /users/me (auth required)
/// Echoes the presented token back in the x-auth header
#[instrument(name = "me", skip(session))]
pub async fn me(
    Extension(session): Extension<AuthSession>,
) -> Result<(AppendHeaders<[(&'static str, String); 1]>, Json<UserResponse>), AppError> {
    Ok((
        AppendHeaders([("x-auth", session.token)]),
        Json(UserResponse::from(&session.user)),
    ))
}

/// HTTP handler for revoking the presented session token
///
/// DELETE /users/me/token (auth required)
#[instrument(name = "revoke_token", skip(state, session))]
pub async fn revoke_token(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
) -> Result<StatusCode, AppError> {
    info!(user_id = %session.user.id, "Revoking session token");

    let service = UserService::new(
        Arc::clone(&state.user_repository),
        state.token_config.clone(),
    );
    service
        .revoke_token(&session.user.id, &session.token)
        .await
        .map_err(|_| AppError::Validation("Failed to revoke token.".to_string()))?;

    Ok(StatusCode::OK)
}
