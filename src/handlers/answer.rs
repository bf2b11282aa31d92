// src/handlers/answer.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    domain::ownership::{ensure_owner, is_owner},
    error::AppError,
    handlers::sanitized,
    models::question::{AddAnswersRequest, Answer, AnswerView, NewAnswer, UpdateAnswerRequest},
    repository,
    utils::jwt::Claims,
};

fn revealed(answers: Vec<Answer>) -> Vec<AnswerView> {
    answers.into_iter().map(|a| AnswerView::new(a, true)).collect()
}

pub async fn list_answers(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path((quiz_id, question_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let reveal = is_owner(&pool, claims.user_id()?, quiz_id).await?;

    let answers: Vec<AnswerView> = repository::answer::list(&pool, quiz_id, question_id)
        .await?
        .into_iter()
        .map(|a| AnswerView::new(a, reveal))
        .collect();

    Ok(Json(answers))
}

/// Appends answers to a question. Returns the question's full answer list.
pub async fn add_answers(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path((quiz_id, question_id)): Path<(i64, i64)>,
    Json(payload): Json<AddAnswersRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let batch = payload
        .answers
        .iter()
        .map(|a| {
            Ok(NewAnswer {
                text: sanitized(&a.text, "Answer text")?,
                is_correct: a.is_correct,
            })
        })
        .collect::<Result<Vec<_>, AppError>>()?;
    let user_id = claims.user_id()?;

    ensure_owner(&pool, user_id, quiz_id).await?;
    let answers = repository::answer::add(&pool, quiz_id, question_id, &batch).await?;

    Ok((StatusCode::CREATED, Json(revealed(answers))))
}

/// Replaces an answer's text and correctness. Returns the question's full answer list.
pub async fn update_answer(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path((quiz_id, question_id, answer_id)): Path<(i64, i64, i64)>,
    Json(payload): Json<UpdateAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let text = sanitized(&payload.text, "Answer text")?;
    let user_id = claims.user_id()?;

    ensure_owner(&pool, user_id, quiz_id).await?;
    let answers = repository::answer::update(
        &pool,
        quiz_id,
        question_id,
        answer_id,
        &text,
        payload.is_correct,
    )
    .await?;

    Ok(Json(revealed(answers)))
}

pub async fn delete_answer(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path((quiz_id, question_id, answer_id)): Path<(i64, i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    ensure_owner(&pool, user_id, quiz_id).await?;
    repository::answer::delete(&pool, quiz_id, question_id, answer_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
