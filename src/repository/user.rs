// src/repository/user.rs

use sqlx::PgPool;

use crate::{error::AppError, models::user::User};

const USER_COLUMNS: &str = "id, email, username, password, is_verified, created_at";

/// Inserts a new, unverified account.
pub async fn create(
    pool: &PgPool,
    email: &str,
    username: &str,
    password_hash: &str,
) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (email, username, password) VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
    ))
    .bind(email)
    .bind(username)
    .bind(password_hash)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return AppError::Conflict("E-mail or username already registered".to_string());
            }
        }
        tracing::error!("Failed to register user: {:?}", e);
        AppError::from(e)
    })
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn mark_verified(pool: &PgPool, user_id: i64) -> Result<(), AppError> {
    let result = sqlx::query("UPDATE users SET is_verified = TRUE WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    Ok(())
}

/// Quizzes and submissions of the account keep existing with a `NULL` owner.
pub async fn delete(pool: &PgPool, user_id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    Ok(())
}
