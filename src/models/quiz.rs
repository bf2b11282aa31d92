// src/models/quiz.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::question::QuestionView;

/// Represents the 'quizzes' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Quiz {
    pub id: i64,
    pub title: String,

    /// `None` once the creator's account has been deleted.
    pub creator_id: Option<i64>,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Quiz {
    pub fn is_created_by(&self, user_id: i64) -> bool {
        self.creator_id == Some(user_id)
    }
}

/// A quiz with its questions and their answers preloaded.
#[derive(Debug, Serialize)]
pub struct QuizDetail {
    #[serde(flatten)]
    pub quiz: Quiz,
    pub questions: Vec<QuestionView>,
}

/// DTO for creating a quiz.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1 to 255 characters."))]
    pub title: String,
}

/// DTO for renaming a quiz.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateQuizRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1 to 255 characters."))]
    pub title: String,
}
