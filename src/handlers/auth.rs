// src/handlers/auth.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::{LoginRequest, RegisterRequest, VerificationParams},
    repository,
    utils::{
        hash::{hash_password, verify_password},
        jwt::{Claims, TokenPurpose, sign_jwt, verify_jwt},
        mail::{Mailer, dispatch_verification, verification_link},
    },
};

/// Registers a new user.
///
/// Hashes the password using Argon2 before storing it, then mails a
/// verification link without waiting for delivery.
/// Returns 201 Created and the user object (excluding password).
pub async fn register(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    State(mailer): State<Arc<dyn Mailer>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let hashed_password = hash_password(&payload.password)?;
    let user =
        repository::user::create(&pool, &payload.email, &payload.username, &hashed_password)
            .await?;

    let token = sign_jwt(
        user.id,
        &user.email,
        false,
        TokenPurpose::Verification,
        &config.jwt_secret,
        config.verification_expiration,
    )?;
    let link = verification_link(&config, &token)?;
    dispatch_verification(mailer, user.email.clone(), link);

    tracing::info!(user_id = user.id, "Registered new account");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Authenticates a user and returns an access token.
///
/// The token carries the verification status; unverified accounts can log in
/// but the protected API rejects their token until they verify.
pub async fn login(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let invalid = || AppError::AuthError("Invalid email or password".to_string());

    let user = repository::user::find_by_email(&pool, &payload.email)
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&payload.password, &user.password)? {
        return Err(invalid());
    }

    let token = sign_jwt(
        user.id,
        &user.email,
        user.is_verified,
        TokenPurpose::Access,
        &config.jwt_secret,
        config.jwt_expiration,
    )?;

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
        "is_verified": user.is_verified
    })))
}

/// Target of the mailed verification link.
pub async fn verify(
    State(pool): State<PgPool>,
    State(config): State<Config>,
    Query(params): Query<VerificationParams>,
) -> Result<impl IntoResponse, AppError> {
    let claims = verify_jwt(&params.token, &config.jwt_secret, TokenPurpose::Verification)?;
    let user_id = claims.user_id()?;

    repository::user::mark_verified(&pool, user_id).await?;

    tracing::info!(user_id, "Account verified");
    Ok(Json(json!({ "message": "Account verified" })))
}

/// Deletes the caller's own account.
/// Their quizzes and submissions stay, with the owner reference cleared.
pub async fn delete_account(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    repository::user::delete(&pool, user_id).await?;

    tracing::info!(user_id, "Account deleted");
    Ok(StatusCode::NO_CONTENT)
}
