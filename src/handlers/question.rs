// src/handlers/question.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    domain::{
        answer_rules,
        ownership::{ensure_owner, is_owner},
    },
    error::AppError,
    handlers::sanitized,
    models::question::{CreateQuestionRequest, NewAnswer, QuestionView, UpdateQuestionRequest},
    repository,
    utils::jwt::Claims,
};

/// Lists the questions of a quiz with their answers.
pub async fn list_questions(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let reveal = is_owner(&pool, claims.user_id()?, quiz_id).await?;

    let questions: Vec<QuestionView> = repository::question::list_with_answers(&pool, quiz_id)
        .await?
        .into_iter()
        .map(|q| q.into_view(reveal))
        .collect();

    Ok(Json(questions))
}

pub async fn get_question(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path((quiz_id, question_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let reveal = is_owner(&pool, claims.user_id()?, quiz_id).await?;
    let question = repository::question::find_with_answers(&pool, quiz_id, question_id).await?;

    Ok(Json(question.into_view(reveal)))
}

/// Creates a question with its 3 to 5 answers, exactly one of them correct.
pub async fn create_question(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<i64>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let text = sanitized(&payload.text, "Question text")?;
    let answers = payload
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
    answer_rules::check_new_question(&answers)?;

    let question =
        repository::question::create_with_answers(&pool, quiz_id, &text, &answers).await?;

    tracing::info!(quiz_id, question_id = question.question.id, "Question created");
    Ok((StatusCode::CREATED, Json(question.into_view(true))))
}

/// Changes a question's text. Answers are untouched.
pub async fn update_question(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path((quiz_id, question_id)): Path<(i64, i64)>,
    Json(payload): Json<UpdateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let text = sanitized(&payload.text, "Question text")?;
    let user_id = claims.user_id()?;

    ensure_owner(&pool, user_id, quiz_id).await?;
    let question = repository::question::update_text(&pool, quiz_id, question_id, &text).await?;

    Ok(Json(question))
}

pub async fn delete_question(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path((quiz_id, question_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    ensure_owner(&pool, user_id, quiz_id).await?;
    repository::question::delete(&pool, quiz_id, question_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
