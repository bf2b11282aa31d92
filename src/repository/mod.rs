// src/repository/mod.rs

//! PostgreSQL access. Every function takes the pool (or a connection inside a
//! transaction) explicitly; there is no global handle.

pub mod answer;
pub mod question;
pub mod quiz;
pub mod submission;
pub mod user;

use crate::error::AppError;

/// A write referencing a user row that no longer exists means the token
/// outlived its account.
pub(crate) fn account_gone(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_foreign_key_violation() {
            return AppError::AuthError("Account no longer exists".to_string());
        }
    }
    AppError::from(e)
}
