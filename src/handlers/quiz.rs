// src/handlers/quiz.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    domain::ownership::ensure_owner,
    error::AppError,
    handlers::sanitized,
    models::quiz::{CreateQuizRequest, QuizDetail, UpdateQuizRequest},
    repository,
    utils::jwt::Claims,
};

/// Lists all quizzes (without questions).
pub async fn list_quizzes(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let quizzes = repository::quiz::list(&pool).await?;
    Ok(Json(quizzes))
}

/// Creates a quiz owned by the caller.
pub async fn create_quiz(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let title = sanitized(&payload.title, "Title")?;
    let user_id = claims.user_id()?;

    let quiz = repository::quiz::create(&pool, user_id, &title).await?;

    tracing::info!(quiz_id = quiz.id, user_id, "Quiz created");
    Ok((StatusCode::CREATED, Json(quiz)))
}

/// Returns a quiz with its questions and answers.
/// Correct answers are only revealed to the creator.
pub async fn get_quiz(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let (quiz, questions) = repository::quiz::find_with_questions(&pool, quiz_id).await?;
    let reveal = quiz.is_created_by(user_id);

    let questions = questions.into_iter().map(|q| q.into_view(reveal)).collect();

    Ok(Json(QuizDetail { quiz, questions }))
}

/// Renames a quiz. Creator only.
pub async fn update_quiz(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<i64>,
    Json(payload): Json<UpdateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let title = sanitized(&payload.title, "Title")?;
    let user_id = claims.user_id()?;

    ensure_owner(&pool, user_id, quiz_id).await?;
    let quiz = repository::quiz::update_title(&pool, quiz_id, &title).await?;

    Ok(Json(quiz))
}

/// Deletes a quiz with everything under it. Creator only.
pub async fn delete_quiz(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    ensure_owner(&pool, user_id, quiz_id).await?;
    repository::quiz::delete(&pool, quiz_id).await?;

    tracing::info!(quiz_id, user_id, "Quiz deleted");
    Ok(StatusCode::NO_CONTENT)
}
