// src/models/submission.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::error::AppError;

/// Represents the 'submissions' table in the database.
/// One graded attempt at a quiz.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub quiz_id: i64,

    /// `None` once the submitting account has been deleted.
    pub user_id: Option<i64>,

    /// Percentage in `0.0..=100.0`.
    pub score: f64,

    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Represents the 'submission_answers' table: the per-question grading audit.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct SubmissionAnswer {
    pub question_id: i64,
    pub user_answer_id: i64,
    pub correct_answer_id: i64,
    pub is_correct: bool,
}

/// A submission with its audit rows.
#[derive(Debug, Serialize)]
pub struct SubmissionDetail {
    #[serde(flatten)]
    pub submission: Submission,
    pub answers: Vec<SubmissionAnswer>,
}

/// One chosen answer in a submission request.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SubmittedAnswer {
    pub question_id: i64,
    pub answer_id: i64,
}

/// DTO for submitting a quiz attempt.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub answers: Vec<SubmittedAnswer>,
}

impl SubmitRequest {
    /// Question id -> chosen answer id. A question may only be answered once.
    pub fn answer_map(&self) -> Result<HashMap<i64, i64>, AppError> {
        let mut map = HashMap::with_capacity(self.answers.len());
        for answer in &self.answers {
            if map.insert(answer.question_id, answer.answer_id).is_some() {
                return Err(AppError::BadRequest(format!(
                    "Question {} answered more than once",
                    answer.question_id
                )));
            }
        }
        Ok(map)
    }
}

/// DTO for the creator's manual score correction.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateScoreRequest {
    #[validate(range(min = 0.0, max = 100.0, message = "Score must be between 0 and 100."))]
    pub score: f64,
}
