use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{debug, instrument, warn};

use super::types::{AuthSession, ACCESS_AUTH};
use crate::shared::{AppError, AppState};

/// Session authentication middleware - validates the x-auth header token and
/// adds an AuthSession to the request.
/// Usage: .layer(middleware::from_fn_with_state(app_state.clone(), auth::token_auth))
/// Handlers can then extract Extension(session): Extension<AuthSession>.
///
/// Every failure mode collapses to the same opaque 401 so callers cannot
/// distinguish a bad signature from a revoked or foreign token.
#[instrument(skip(state, req, next))]
pub async fn token_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    debug!(uri = %req.uri(), "Authenticating request");

    let token = req
        .headers()
        .get("x-auth")
        .and_then(|header| header.to_str().ok())
        .map(|token| token.to_string())
        .ok_or_else(|| {
            warn!("Missing x-auth header in request");
            AppError::Unauthorized
        })?;

    // Signature and claim shape first; store membership second.
    let claims = state.token_config.verify(&token).map_err(|e| {
        warn!(error = %e, "Token verification failed");
        AppError::Unauthorized
    })?;

    if claims.access != ACCESS_AUTH {
        warn!(access = %claims.access, "Token carries wrong access level");
        return Err(AppError::Unauthorized);
    }

    // A signature-valid token is still rejected unless the user's token list
    // holds this exact string - this is where revoked tokens die.
    let user = state
        .user_repository
        .find_by_token(&claims.sub, &token, ACCESS_AUTH)
        .await?
        .ok_or_else(|| {
            warn!(user_id = %claims.sub, "No user holds this token");
            AppError::Unauthorized
        })?;

    debug!(user_id = %user.id, "Authentication successful");

    req.extensions_mut().insert(AuthSession {
        user,
        token,
    });

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        middleware,
        routing::get,
        Extension, Router,
    };
    use tower::ServiceExt;

    use super::*;
    use crate::auth::types::AuthSession;
    use crate::shared::test_utils::test_state;
    use crate::user::models::{SessionToken, UserModel};
    use crate::user::repository::UserRepository;

    async fn echo_user(Extension(session): Extension<AuthSession>) -> String {
        session.user.id
    }

    fn protected_app(state: AppState) -> Router {
        Router::new()
            .route("/me", get(echo_user))
            .layer(middleware::from_fn_with_state(state.clone(), token_auth))
            .with_state(state)
    }

    fn request_with_token(token: &str) -> Request<Body> {
        Request::builder()
            .uri("/me")
            .header("x-auth", token)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_token_passes_through() {
        let test = test_state();
        let user = UserModel::new(
            "alice".to_string(),
            None,
            "alice@example.com".to_string(),
            "5551234".to_string(),
            "hash".to_string(),
        );
        let token = test.state.token_config.sign(&user.id).unwrap();
        test.user_repository.create_user(&user).await.unwrap();
        test.user_repository
            .add_token(
                &user.id,
                &SessionToken {
                    access: ACCESS_AUTH.to_string(),
                    token: token.clone(),
                },
            )
            .await
            .unwrap();

        let app = protected_app(test.state);
        let response = app.oneshot(request_with_token(&token)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], user.id.as_bytes());
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let test = test_state();
        let app = protected_app(test.state);

        let request = Request::builder().uri("/me").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_signature_valid_but_unlisted_token_is_unauthorized() {
        let test = test_state();
        let user = UserModel::new(
            "alice".to_string(),
            None,
            "alice@example.com".to_string(),
            "5551234".to_string(),
            "hash".to_string(),
        );
        test.user_repository.create_user(&user).await.unwrap();

        // Signed with our secret but never appended to the user's token list
        let token = test.state.token_config.sign(&user.id).unwrap();

        let app = protected_app(test.state);
        let response = app.oneshot(request_with_token(&token)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_garbage_token_is_unauthorized() {
        let test = test_state();
        let app = protected_app(test.state);

        let response = app
            .oneshot(request_with_token("not-a-real-token"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
