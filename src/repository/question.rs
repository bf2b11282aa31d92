// src/repository/question.rs

use std::collections::HashMap;

use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use crate::{
    error::AppError,
    models::question::{Answer, NewAnswer, Question, QuestionWithAnswers},
};

/// All questions of a quiz with their answers, ordered by id.
pub async fn list_with_answers(
    pool: &PgPool,
    quiz_id: i64,
) -> Result<Vec<QuestionWithAnswers>, AppError> {
    let questions = sqlx::query_as::<_, Question>(
        "SELECT id, quiz_id, text FROM questions WHERE quiz_id = $1 ORDER BY id",
    )
    .bind(quiz_id)
    .fetch_all(pool)
    .await?;

    let ids: Vec<i64> = questions.iter().map(|q| q.id).collect();
    let answers = sqlx::query_as::<_, Answer>(
        r#"
        SELECT id, question_id, text, is_correct
        FROM answers
        WHERE question_id = ANY($1)
        ORDER BY id
        "#,
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    Ok(attach_answers(questions, answers))
}

/// `NotFound` unless the question exists inside `quiz_id`.
pub async fn find_with_answers(
    pool: &PgPool,
    quiz_id: i64,
    question_id: i64,
) -> Result<QuestionWithAnswers, AppError> {
    let question = sqlx::query_as::<_, Question>(
        "SELECT id, quiz_id, text FROM questions WHERE id = $1 AND quiz_id = $2",
    )
    .bind(question_id)
    .bind(quiz_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(not_found)?;

    let mut conn = pool.acquire().await?;
    let answers = answers_of(&mut conn, question.id).await?;

    Ok(QuestionWithAnswers { question, answers })
}

/// Inserts the question and its answers in one transaction.
/// Callers check the answer set with `answer_rules::check_new_question` first.
pub async fn create_with_answers(
    pool: &PgPool,
    quiz_id: i64,
    text: &str,
    answers: &[NewAnswer],
) -> Result<QuestionWithAnswers, AppError> {
    let mut tx = pool.begin().await?;

    let question = sqlx::query_as::<_, Question>(
        "INSERT INTO questions (quiz_id, text) VALUES ($1, $2) RETURNING id, quiz_id, text",
    )
    .bind(quiz_id)
    .bind(text)
    .fetch_one(&mut *tx)
    .await?;

    let answers = insert_answers(&mut tx, question.id, answers).await?;

    tx.commit().await?;

    Ok(QuestionWithAnswers { question, answers })
}

/// `NotFound` when no row matched.
pub async fn update_text(
    pool: &PgPool,
    quiz_id: i64,
    question_id: i64,
    text: &str,
) -> Result<Question, AppError> {
    sqlx::query_as::<_, Question>(
        r#"
        UPDATE questions SET text = $1
        WHERE id = $2 AND quiz_id = $3
        RETURNING id, quiz_id, text
        "#,
    )
    .bind(text)
    .bind(question_id)
    .bind(quiz_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(not_found)
}

/// Answers go with it (ON DELETE CASCADE).
pub async fn delete(pool: &PgPool, quiz_id: i64, question_id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM questions WHERE id = $1 AND quiz_id = $2")
        .bind(question_id)
        .bind(quiz_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(not_found());
    }
    Ok(())
}

pub(crate) async fn answers_of(
    conn: &mut PgConnection,
    question_id: i64,
) -> Result<Vec<Answer>, AppError> {
    let answers = sqlx::query_as::<_, Answer>(
        "SELECT id, question_id, text, is_correct FROM answers WHERE question_id = $1 ORDER BY id",
    )
    .bind(question_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(answers)
}

pub(crate) async fn insert_answers(
    conn: &mut PgConnection,
    question_id: i64,
    answers: &[NewAnswer],
) -> Result<Vec<Answer>, AppError> {
    let mut builder =
        QueryBuilder::<Postgres>::new("INSERT INTO answers (question_id, text, is_correct) ");
    builder.push_values(answers, |mut row, answer| {
        row.push_bind(question_id)
            .push_bind(answer.text.clone())
            .push_bind(answer.is_correct);
    });
    builder.push(" RETURNING id, question_id, text, is_correct");

    let inserted = builder
        .build_query_as::<Answer>()
        .fetch_all(&mut *conn)
        .await?;

    Ok(inserted)
}

fn attach_answers(questions: Vec<Question>, answers: Vec<Answer>) -> Vec<QuestionWithAnswers> {
    let mut by_question: HashMap<i64, Vec<Answer>> = HashMap::new();
    for answer in answers {
        by_question.entry(answer.question_id).or_default().push(answer);
    }

    questions
        .into_iter()
        .map(|question| {
            let answers = by_question.remove(&question.id).unwrap_or_default();
            QuestionWithAnswers { question, answers }
        })
        .collect()
}

fn not_found() -> AppError {
    AppError::NotFound("Question not found".to_string())
}
