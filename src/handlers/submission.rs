// src/handlers/submission.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    domain::ownership::{ensure_owner, ensure_submission_owner},
    error::AppError,
    models::submission::{SubmitRequest, UpdateScoreRequest},
    repository,
    utils::jwt::Claims,
};

/// Submits answers for every question of a quiz and returns the graded result.
pub async fn submit(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<i64>,
    Json(payload): Json<SubmitRequest>,
) -> Result<impl IntoResponse, AppError> {
    let chosen = payload.answer_map()?;
    let user_id = claims.user_id()?;

    let detail = repository::submission::create_graded(&pool, quiz_id, user_id, &chosen).await?;

    Ok((StatusCode::CREATED, Json(detail)))
}

/// Submissions made against a quiz. Creator only.
pub async fn list_for_quiz(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    ensure_owner(&pool, claims.user_id()?, quiz_id).await?;

    let submissions = repository::submission::list_for_quiz(&pool, quiz_id).await?;
    Ok(Json(submissions))
}

/// The caller's own submissions.
pub async fn list_mine(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let submissions = repository::submission::list_for_user(&pool, claims.user_id()?).await?;
    Ok(Json(submissions))
}

/// Submission with its per-question audit. Visible to the submitter and the quiz creator.
pub async fn get_submission(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(submission_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let (quiz_id, submitter) = repository::submission::participants(&pool, submission_id).await?;

    if submitter != Some(user_id) {
        ensure_owner(&pool, user_id, quiz_id).await?;
    }

    let detail = repository::submission::find_detail(&pool, submission_id).await?;
    Ok(Json(detail))
}

/// Overrides the score without re-grading. Quiz creator only.
pub async fn update_score(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(submission_id): Path<i64>,
    Json(payload): Json<UpdateScoreRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let user_id = claims.user_id()?;

    ensure_submission_owner(&pool, user_id, submission_id).await?;
    let submission =
        repository::submission::update_score(&pool, submission_id, payload.score).await?;

    tracing::info!(submission_id, user_id, score = payload.score, "Score overridden");
    Ok(Json(submission))
}

/// Quiz creator only.
pub async fn delete_submission(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(submission_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    ensure_submission_owner(&pool, user_id, submission_id).await?;
    repository::submission::delete(&pool, submission_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
