// src/repository/answer.rs

//! Transactional side of the answer invariants.
//!
//! Each mutation locks the parent question row (`FOR UPDATE`) first, so
//! concurrent mutations of the same question run one after another and the
//! counts read afterwards cannot go stale. A rejected check returns early and
//! the dropped transaction rolls back, leaving the question untouched.

use sqlx::{PgConnection, PgPool};

use crate::{
    domain::answer_rules::{self, AnswerTally},
    error::AppError,
    models::question::{Answer, NewAnswer},
    repository::question,
};

/// Answers of one question, `NotFound` unless it lives in `quiz_id`.
pub async fn list(pool: &PgPool, quiz_id: i64, question_id: i64) -> Result<Vec<Answer>, AppError> {
    Ok(question::find_with_answers(pool, quiz_id, question_id)
        .await?
        .answers)
}

/// Appends `batch`, keeping the question within five answers and one correct.
/// Returns every answer of the question afterwards.
pub async fn add(
    pool: &PgPool,
    quiz_id: i64,
    question_id: i64,
    batch: &[NewAnswer],
) -> Result<Vec<Answer>, AppError> {
    let mut tx = pool.begin().await?;

    lock_question(&mut tx, quiz_id, question_id).await?;
    let current = tally(&mut tx, question_id).await?;

    if let Err(violation) = answer_rules::check_addition(current, batch) {
        tracing::debug!(question_id, ?current, "Rejected answer batch: {}", violation);
        return Err(violation.into());
    }

    question::insert_answers(&mut tx, question_id, batch).await?;
    let answers = question::answers_of(&mut tx, question_id).await?;

    tx.commit().await?;
    Ok(answers)
}

/// Replaces text and correctness of one answer. Rolls back unless the
/// question still has exactly one correct answer afterwards.
pub async fn update(
    pool: &PgPool,
    quiz_id: i64,
    question_id: i64,
    answer_id: i64,
    text: &str,
    is_correct: bool,
) -> Result<Vec<Answer>, AppError> {
    let mut tx = pool.begin().await?;

    lock_question(&mut tx, quiz_id, question_id).await?;

    let result = sqlx::query(
        "UPDATE answers SET text = $1, is_correct = $2 WHERE id = $3 AND question_id = $4",
    )
    .bind(text)
    .bind(is_correct)
    .bind(answer_id)
    .bind(question_id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(answer_not_found());
    }

    let after = tally(&mut tx, question_id).await?;
    if let Err(violation) = answer_rules::check_after_update(after) {
        tracing::debug!(question_id, answer_id, "Rejected answer update: {}", violation);
        return Err(violation.into());
    }

    let answers = question::answers_of(&mut tx, question_id).await?;

    tx.commit().await?;
    Ok(answers)
}

/// Removes one answer unless that would leave the question too small or
/// without its correct answer.
pub async fn delete(
    pool: &PgPool,
    quiz_id: i64,
    question_id: i64,
    answer_id: i64,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    lock_question(&mut tx, quiz_id, question_id).await?;

    let result = sqlx::query("DELETE FROM answers WHERE id = $1 AND question_id = $2")
        .bind(answer_id)
        .bind(question_id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(answer_not_found());
    }

    let after = tally(&mut tx, question_id).await?;
    if let Err(violation) = answer_rules::check_after_delete(after) {
        tracing::debug!(question_id, answer_id, "Rejected answer delete: {}", violation);
        return Err(violation.into());
    }

    tx.commit().await?;
    Ok(())
}

async fn lock_question(
    conn: &mut PgConnection,
    quiz_id: i64,
    question_id: i64,
) -> Result<(), AppError> {
    sqlx::query_scalar::<_, i64>(
        "SELECT id FROM questions WHERE id = $1 AND quiz_id = $2 FOR UPDATE",
    )
    .bind(question_id)
    .bind(quiz_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::NotFound("Question not found".to_string()))?;

    Ok(())
}

async fn tally(conn: &mut PgConnection, question_id: i64) -> Result<AnswerTally, AppError> {
    let tally = sqlx::query_as::<_, AnswerTally>(
        r#"
        SELECT
            COUNT(*) AS total,
            COUNT(*) FILTER (WHERE is_correct) AS correct
        FROM answers
        WHERE question_id = $1
        "#,
    )
    .bind(question_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(tally)
}

fn answer_not_found() -> AppError {
    AppError::NotFound("Answer not found".to_string())
}
