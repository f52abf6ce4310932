use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use tracing::{debug, instrument};

use super::types::{AuthClaims, ACCESS_AUTH};

/// Outcome of token verification, distinguished explicitly rather than
/// collapsed into a single rejection.
#[derive(Error, Debug, PartialEq)]
pub enum TokenError {
    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token is malformed")]
    Malformed,

    #[error("token has expired")]
    Expired,
}

/// Configuration for signing and verifying session tokens
#[derive(Clone)]
pub struct TokenConfig {
    secret: String,
}

impl TokenConfig {
    pub fn new() -> Self {
        Self {
            secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "your-secret-key-change-in-production".to_string()),
        }
    }

    /// Signs a claim carrying the user's id and the "auth" access level.
    /// Tokens carry no expiry claim; revocation happens through the user's
    /// token list, not through time.
    #[instrument(skip(self, user_id))]
    pub fn sign(&self, user_id: &str) -> Result<String, TokenError> {
        let claims = AuthClaims {
            sub: user_id.to_string(),
            access: ACCESS_AUTH.to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
        .map_err(|e| {
            debug!(error = %e, "Failed to encode session token");
            TokenError::Malformed
        })
    }

    /// Verifies a token's signature and decodes its claim.
    ///
    /// Tokens we issue never expire, so `Expired` only fires for tokens
    /// carrying a foreign `exp` claim that has passed.
    #[instrument(skip(self, token))]
    pub fn verify(&self, token: &str) -> Result<AuthClaims, TokenError> {
        let mut validation = Validation::default();
        validation.validate_exp = false;
        validation.set_required_spec_claims::<&str>(&[]);

        decode::<AuthClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| {
            debug!(error = %e, "Failed to decode session token");
            match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            }
        })
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self::new()
    }
}
