// src/repository/quiz.rs

use sqlx::PgPool;

use crate::{
    error::AppError,
    models::{question::QuestionWithAnswers, quiz::Quiz},
    repository::{self, question},
};

pub async fn list(pool: &PgPool) -> Result<Vec<Quiz>, AppError> {
    let quizzes = sqlx::query_as::<_, Quiz>(
        "SELECT id, title, creator_id, created_at FROM quizzes ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(quizzes)
}

pub async fn find_by_id(pool: &PgPool, quiz_id: i64) -> Result<Quiz, AppError> {
    sqlx::query_as::<_, Quiz>("SELECT id, title, creator_id, created_at FROM quizzes WHERE id = $1")
        .bind(quiz_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))
}

/// The quiz with its questions and their answers preloaded.
pub async fn find_with_questions(
    pool: &PgPool,
    quiz_id: i64,
) -> Result<(Quiz, Vec<QuestionWithAnswers>), AppError> {
    let quiz = find_by_id(pool, quiz_id).await?;
    let questions = question::list_with_answers(pool, quiz_id).await?;

    Ok((quiz, questions))
}

pub async fn create(pool: &PgPool, creator_id: i64, title: &str) -> Result<Quiz, AppError> {
    let quiz = sqlx::query_as::<_, Quiz>(
        r#"
        INSERT INTO quizzes (title, creator_id)
        VALUES ($1, $2)
        RETURNING id, title, creator_id, created_at
        "#,
    )
    .bind(title)
    .bind(creator_id)
    .fetch_one(pool)
    .await
    .map_err(repository::account_gone)?;

    Ok(quiz)
}

/// `NotFound` when no row matched.
pub async fn update_title(pool: &PgPool, quiz_id: i64, title: &str) -> Result<Quiz, AppError> {
    sqlx::query_as::<_, Quiz>(
        r#"
        UPDATE quizzes SET title = $1
        WHERE id = $2
        RETURNING id, title, creator_id, created_at
        "#,
    )
    .bind(title)
    .bind(quiz_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))
}

/// Questions, answers and submissions go with it (ON DELETE CASCADE).
pub async fn delete(pool: &PgPool, quiz_id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM quizzes WHERE id = $1")
        .bind(quiz_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Quiz not found".to_string()));
    }
    Ok(())
}
