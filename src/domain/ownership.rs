// src/domain/ownership.rs

//! Ownership gate: only a quiz's creator may change the quiz, its questions,
//! their answers, or the submissions made against it.

use sqlx::{PgExecutor, PgPool};

use crate::{error::AppError, repository};

/// `Ok(false)` when the quiz exists but belongs to someone else (or to a
/// deleted account); `Err(NotFound)` when there is no such quiz.
pub async fn is_owner<'e, E>(executor: E, user_id: i64, quiz_id: i64) -> Result<bool, AppError>
where
    E: PgExecutor<'e>,
{
    let creator_id = sqlx::query_scalar::<_, Option<i64>>(
        "SELECT creator_id FROM quizzes WHERE id = $1",
    )
    .bind(quiz_id)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

    Ok(creator_id == Some(user_id))
}

/// Gate for quiz-subtree mutations. Lookup failures fail closed.
pub async fn ensure_owner(pool: &PgPool, user_id: i64, quiz_id: i64) -> Result<(), AppError> {
    match is_owner(pool, user_id, quiz_id).await {
        Ok(true) => Ok(()),
        Ok(false) => {
            tracing::info!(user_id, quiz_id, "Rejected mutation by non-owner");
            Err(forbidden())
        }
        Err(AppError::NotFound(msg)) => Err(AppError::NotFound(msg)),
        Err(e) => {
            tracing::error!(user_id, quiz_id, "Ownership lookup failed: {}", e);
            Err(forbidden())
        }
    }
}

/// Gate for submission mutations, derived through the submission's quiz.
/// Returns the quiz id on success.
pub async fn ensure_submission_owner(
    pool: &PgPool,
    user_id: i64,
    submission_id: i64,
) -> Result<i64, AppError> {
    let quiz_id = match repository::submission::quiz_id_of(pool, submission_id).await {
        Ok(quiz_id) => quiz_id,
        Err(AppError::NotFound(msg)) => return Err(AppError::NotFound(msg)),
        Err(e) => {
            tracing::error!(user_id, submission_id, "Submission lookup failed: {}", e);
            return Err(forbidden());
        }
    };

    ensure_owner(pool, user_id, quiz_id).await?;
    Ok(quiz_id)
}

fn forbidden() -> AppError {
    AppError::Forbidden("Only the quiz creator may modify this resource".to_string())
}
