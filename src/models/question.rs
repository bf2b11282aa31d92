// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::Validate;

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub quiz_id: i64,

    /// The prompt shown to quiz takers.
    pub text: String,
}

/// Represents the 'answers' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Answer {
    pub id: i64,
    pub question_id: i64,
    pub text: String,
    pub is_correct: bool,
}

/// A question together with all of its answers.
#[derive(Debug, Clone)]
pub struct QuestionWithAnswers {
    pub question: Question,
    pub answers: Vec<Answer>,
}

impl QuestionWithAnswers {
    /// `reveal` decides whether the correct answer is exposed.
    pub fn into_view(self, reveal: bool) -> QuestionView {
        QuestionView {
            id: self.question.id,
            quiz_id: self.question.quiz_id,
            text: self.question.text,
            answers: self
                .answers
                .into_iter()
                .map(|a| AnswerView::new(a, reveal))
                .collect(),
        }
    }
}

/// DTO for sending a question to the client.
#[derive(Debug, Serialize)]
pub struct QuestionView {
    pub id: i64,
    pub quiz_id: i64,
    pub text: String,
    pub answers: Vec<AnswerView>,
}

/// DTO for sending an answer to the client.
/// `is_correct` is only present for the quiz creator.
#[derive(Debug, Serialize)]
pub struct AnswerView {
    pub id: i64,
    pub question_id: i64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
}

impl AnswerView {
    pub fn new(answer: Answer, reveal: bool) -> Self {
        Self {
            id: answer.id,
            question_id: answer.question_id,
            text: answer.text,
            is_correct: reveal.then_some(answer.is_correct),
        }
    }
}

/// One answer candidate in a create/add request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewAnswer {
    #[validate(length(min = 1, max = 500, message = "Answer text must be 1 to 500 characters."))]
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

/// DTO for creating a question together with its answers.
/// Answer count and correctness are checked by `domain::answer_rules`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 1000, message = "Question text must be 1 to 1000 characters."))]
    pub text: String,
    #[validate(nested)]
    pub answers: Vec<NewAnswer>,
}

/// DTO for changing a question's text.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateQuestionRequest {
    #[validate(length(min = 1, max = 1000, message = "Question text must be 1 to 1000 characters."))]
    pub text: String,
}

/// DTO for appending answers to an existing question.
#[derive(Debug, Deserialize, Validate)]
pub struct AddAnswersRequest {
    #[validate(length(min = 1, message = "At least one answer is required."), nested)]
    pub answers: Vec<NewAnswer>,
}

/// DTO for replacing an answer's text and correctness.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAnswerRequest {
    #[validate(length(min = 1, max = 500, message = "Answer text must be 1 to 500 characters."))]
    pub text: String,
    pub is_correct: bool,
}
