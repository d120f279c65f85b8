//! Bearer-token authentication: JWT issuance, verification, and the axum
//! middleware guarding protected routes.
//!
//! Tokens are stateless HS256 JWTs with a fixed TTL. There is no refresh or
//! revocation: a token stays valid until it expires, even if the password
//! changes.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use trove_core::{Error, PublicUser, Result};

use crate::{ApiError, AppState};

/// Token lifetime when TOKEN_TTL_DAYS is not set.
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 7;

/// JWT claims: the authenticated identity plus standard timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: Uuid,
    pub email: String,
    /// Issued-at (unix seconds).
    pub iat: i64,
    /// Expiry (unix seconds).
    pub exp: i64,
}

/// The verified principal attached to each authenticated request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

/// Signs and verifies bearer tokens with a shared server secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::days(ttl_days),
        }
    }

    /// Issue a signed token carrying the user's id and email.
    pub fn issue(&self, user: &PublicUser) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| Error::Internal(format!("token signing failed: {}", e)))
    }

    /// Stateless signature + expiry check.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| Error::Forbidden("Invalid or expired token".to_string()))
    }
}

/// Middleware for protected routes. Distinguishes a missing token (401) from
/// one that fails verification (403); on success inserts [`AuthUser`] into
/// request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> std::result::Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::Unauthorized("Access token required".to_string()))?;

    let claims = state.tokens.verify(token).map_err(|e| {
        warn!(error = %e, "Token verification failed");
        ApiError::Forbidden("Invalid or expired token".to_string())
    })?;

    req.extensions_mut().insert(AuthUser {
        id: claims.sub,
        email: claims.email,
    });
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> PublicUser {
        PublicUser {
            id: Uuid::now_v7(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    #[test]
    fn test_issue_verify_round_trip() {
        let tokens = TokenService::new("test-secret", DEFAULT_TOKEN_TTL_DAYS);
        let user = user();

        let token = tokens.issue(&user).unwrap();
        let claims = tokens.verify(&token).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expiry_is_ttl_days_out() {
        let tokens = TokenService::new("test-secret", 7);
        let token = tokens.issue(&user()).unwrap();
        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 3600);
    }

    #[test]
    fn test_expired_token_rejected() {
        // Negative TTL produces an exp in the past, well outside leeway.
        let tokens = TokenService::new("test-secret", -2);
        let token = tokens.issue(&user()).unwrap();
        assert!(tokens.verify(&token).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let signer = TokenService::new("secret-a", DEFAULT_TOKEN_TTL_DAYS);
        let verifier = TokenService::new("secret-b", DEFAULT_TOKEN_TTL_DAYS);
        let token = signer.issue(&user()).unwrap();
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let tokens = TokenService::new("test-secret", DEFAULT_TOKEN_TTL_DAYS);
        let mut token = tokens.issue(&user()).unwrap();
        token.pop();
        token.push('x');
        assert!(tokens.verify(&token).is_err());
    }
}
