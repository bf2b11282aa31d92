// src/utils/jwt.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{config::Config, error::AppError};

/// What a token may be used for.
/// Verification tokens are mailed out and must never open the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    Access,
    Verification,
}

/// JWT Claims structure.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - Stores the User ID (as string).
    pub sub: String,
    pub email: String,
    /// Verification status at the time the token was issued.
    pub is_verified: bool,
    pub purpose: TokenPurpose,
    pub iat: usize,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64, AppError> {
        self.sub
            .parse::<i64>()
            .map_err(|_| AppError::AuthError("Invalid token subject".to_string()))
    }
}

/// Signs a new JWT for the user.
pub fn sign_jwt(
    user_id: i64,
    email: &str,
    is_verified: bool,
    purpose: TokenPurpose,
    secret: &str,
    expiration_seconds: u64,
) -> Result<String, AppError> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .as_secs() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_owned(),
        is_verified,
        purpose,
        iat: now,
        exp: now + expiration_seconds as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies and decodes a JWT string issued for `purpose`.
///
/// Returns the `Claims` if valid, otherwise returns an `AppError::AuthError`.
pub fn verify_jwt(token: &str, secret: &str, purpose: TokenPurpose) -> Result<Claims, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::AuthError("Invalid token".to_string()))?;

    if token_data.claims.purpose != purpose {
        return Err(AppError::AuthError("Invalid token".to_string()));
    }

    Ok(token_data.claims)
}

/// Axum Middleware: Authentication.
///
/// Intercepts requests, validates the 'Authorization: Bearer <token>' header.
/// Only access tokens of verified accounts pass; their `Claims` are injected
/// into the request extensions for handlers to use.
pub async fn auth_middleware(
    State(config): State<Config>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let token = match auth_header.and_then(|h| h.strip_prefix("Bearer ")) {
        Some(token) => token,
        None => return Err(AppError::AuthError("No token provided".to_string())),
    };

    let claims = verify_jwt(token, &config.jwt_secret, TokenPurpose::Access)?;

    if !claims.is_verified {
        return Err(AppError::AuthError("Account is not verified".to_string()));
    }

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit_test_secret";

    #[test]
    fn access_token_round_trip() {
        let token = sign_jwt(42, "a@b.io", true, TokenPurpose::Access, SECRET, 60).unwrap();
        let claims = verify_jwt(&token, SECRET, TokenPurpose::Access).unwrap();

        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.email, "a@b.io");
        assert!(claims.is_verified);
    }

    #[test]
    fn verification_token_cannot_be_used_for_access() {
        let token =
            sign_jwt(7, "a@b.io", false, TokenPurpose::Verification, SECRET, 60).unwrap();

        assert!(matches!(
            verify_jwt(&token, SECRET, TokenPurpose::Access),
            Err(AppError::AuthError(_))
        ));
        assert!(verify_jwt(&token, SECRET, TokenPurpose::Verification).is_ok());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = sign_jwt(1, "a@b.io", true, TokenPurpose::Access, SECRET, 60).unwrap();
        assert!(verify_jwt(&token, "other", TokenPurpose::Access).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let claims = Claims {
            sub: "1".to_string(),
            email: "a@b.io".to_string(),
            is_verified: true,
            purpose: TokenPurpose::Access,
            iat: 1_000,
            exp: 2_000,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(verify_jwt(&token, SECRET, TokenPurpose::Access).is_err());
    }

    #[test]
    fn non_numeric_subject_is_an_auth_error() {
        let claims = Claims {
            sub: "admin".to_string(),
            email: String::new(),
            is_verified: true,
            purpose: TokenPurpose::Access,
            iat: 0,
            exp: 0,
        };
        assert!(matches!(claims.user_id(), Err(AppError::AuthError(_))));
    }
}
