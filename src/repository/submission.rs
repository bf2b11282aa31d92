// src/repository/submission.rs

use std::collections::HashMap;

use sqlx::{PgConnection, PgExecutor, PgPool, Postgres, QueryBuilder};

use crate::{
    domain::grading::{self, AnswerKey, AnswerKeyRow},
    error::AppError,
    models::submission::{Submission, SubmissionAnswer, SubmissionDetail},
    repository,
};

const SUBMISSION_COLUMNS: &str = "id, quiz_id, user_id, score, created_at, updated_at";

/// Grades `chosen` (question id -> answer id) against the quiz and stores the
/// submission together with one audit row per question.
///
/// Grading reads the answer key inside the same transaction that writes the
/// result; nothing is persisted unless every question was answered and both
/// inserts succeed.
pub async fn create_graded(
    pool: &PgPool,
    quiz_id: i64,
    user_id: i64,
    chosen: &HashMap<i64, i64>,
) -> Result<SubmissionDetail, AppError> {
    let mut tx = pool.begin().await?;

    // Share lock: the quiz cannot be deleted while it is being graded.
    sqlx::query_scalar::<_, i64>("SELECT id FROM quizzes WHERE id = $1 FOR SHARE")
        .bind(quiz_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

    let key = load_answer_key(&mut tx, quiz_id).await?;
    let graded = grading::grade(&key, chosen)?;

    let submission = sqlx::query_as::<_, Submission>(&format!(
        "INSERT INTO submissions (quiz_id, user_id, score) VALUES ($1, $2, $3) RETURNING {SUBMISSION_COLUMNS}"
    ))
    .bind(quiz_id)
    .bind(user_id)
    .bind(graded.score)
    .fetch_one(&mut *tx)
    .await
    .map_err(repository::account_gone)?;

    insert_audit_rows(&mut tx, submission.id, &graded.answers).await?;

    tx.commit().await?;

    tracing::info!(
        submission_id = submission.id,
        quiz_id,
        user_id,
        score = graded.score,
        "Graded submission {}/{} correct",
        graded.correct_count,
        key.len()
    );

    Ok(SubmissionDetail {
        submission,
        answers: graded.answers,
    })
}

/// The quiz a submission belongs to.
pub async fn quiz_id_of<'e, E>(executor: E, submission_id: i64) -> Result<i64, AppError>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar::<_, i64>("SELECT quiz_id FROM submissions WHERE id = $1")
        .bind(submission_id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(not_found)
}

/// `(quiz_id, user_id)` of a submission, enough to decide who may read it.
pub async fn participants(
    pool: &PgPool,
    submission_id: i64,
) -> Result<(i64, Option<i64>), AppError> {
    sqlx::query_as::<_, (i64, Option<i64>)>(
        "SELECT quiz_id, user_id FROM submissions WHERE id = $1",
    )
    .bind(submission_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(not_found)
}

pub async fn find_detail(pool: &PgPool, submission_id: i64) -> Result<SubmissionDetail, AppError> {
    let submission = sqlx::query_as::<_, Submission>(&format!(
        "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE id = $1"
    ))
    .bind(submission_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(not_found)?;

    let answers = sqlx::query_as::<_, SubmissionAnswer>(
        r#"
        SELECT question_id, user_answer_id, correct_answer_id, is_correct
        FROM submission_answers
        WHERE submission_id = $1
        ORDER BY question_id
        "#,
    )
    .bind(submission_id)
    .fetch_all(pool)
    .await?;

    Ok(SubmissionDetail { submission, answers })
}

pub async fn list_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<Submission>, AppError> {
    let submissions = sqlx::query_as::<_, Submission>(&format!(
        "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE user_id = $1 ORDER BY id"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(submissions)
}

pub async fn list_for_quiz(pool: &PgPool, quiz_id: i64) -> Result<Vec<Submission>, AppError> {
    let submissions = sqlx::query_as::<_, Submission>(&format!(
        "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE quiz_id = $1 ORDER BY id"
    ))
    .bind(quiz_id)
    .fetch_all(pool)
    .await?;

    Ok(submissions)
}

/// Manual correction by the quiz creator. The audit rows are left as graded.
pub async fn update_score(
    pool: &PgPool,
    submission_id: i64,
    score: f64,
) -> Result<Submission, AppError> {
    sqlx::query_as::<_, Submission>(&format!(
        "UPDATE submissions SET score = $1, updated_at = NOW() WHERE id = $2 RETURNING {SUBMISSION_COLUMNS}"
    ))
    .bind(score)
    .bind(submission_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(not_found)
}

pub async fn delete(pool: &PgPool, submission_id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM submissions WHERE id = $1")
        .bind(submission_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(not_found());
    }
    Ok(())
}

async fn load_answer_key(conn: &mut PgConnection, quiz_id: i64) -> Result<AnswerKey, AppError> {
    let rows = sqlx::query_as::<_, AnswerKeyRow>(
        r#"
        SELECT q.id AS question_id, a.id AS correct_answer_id
        FROM questions q
        LEFT JOIN answers a ON a.question_id = q.id AND a.is_correct
        WHERE q.quiz_id = $1
        ORDER BY q.id, a.id
        "#,
    )
    .bind(quiz_id)
    .fetch_all(&mut *conn)
    .await?;

    AnswerKey::from_rows(rows)
}

async fn insert_audit_rows(
    conn: &mut PgConnection,
    submission_id: i64,
    answers: &[SubmissionAnswer],
) -> Result<(), AppError> {
    let mut builder = QueryBuilder::<Postgres>::new(
        "INSERT INTO submission_answers (submission_id, question_id, user_answer_id, correct_answer_id, is_correct) ",
    );
    builder.push_values(answers, |mut row, answer| {
        row.push_bind(submission_id)
            .push_bind(answer.question_id)
            .push_bind(answer.user_answer_id)
            .push_bind(answer.correct_answer_id)
            .push_bind(answer.is_correct);
    });

    builder.build().execute(&mut *conn).await?;
    Ok(())
}

fn not_found() -> AppError {
    AppError::NotFound("Submission not found".to_string())
}
