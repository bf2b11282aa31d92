// src/domain/grading.rs

use std::collections::{BTreeMap, HashMap};

use crate::{error::AppError, models::submission::SubmissionAnswer};

/// One row of the answer-key query: a question and its correct answer, if any.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct AnswerKeyRow {
    pub question_id: i64,
    pub correct_answer_id: Option<i64>,
}

/// Correct answer id per question of a quiz, ordered by question id.
#[derive(Debug, Clone, Default)]
pub struct AnswerKey {
    entries: BTreeMap<i64, i64>,
}

impl AnswerKey {
    /// Builds the key, refusing stored data that breaks the single-correct rule.
    pub fn from_rows(rows: Vec<AnswerKeyRow>) -> Result<Self, AppError> {
        let mut entries = BTreeMap::new();
        for row in rows {
            let correct = row.correct_answer_id.ok_or_else(|| {
                AppError::InternalServerError(format!(
                    "question {} has no correct answer",
                    row.question_id
                ))
            })?;
            if entries.insert(row.question_id, correct).is_some() {
                return Err(AppError::InternalServerError(format!(
                    "question {} has more than one correct answer",
                    row.question_id
                )));
            }
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of grading, ready to persist.
#[derive(Debug, Clone)]
pub struct GradedSubmission {
    /// Percentage in `0.0..=100.0`.
    pub score: f64,
    pub correct_count: usize,
    /// One entry per question of the quiz, ordered by question id.
    pub answers: Vec<SubmissionAnswer>,
}

/// Grades `chosen` (question id -> answer id) against `key`.
///
/// Every question of the key must be answered; answers to questions that are
/// not part of the key are ignored.
pub fn grade(key: &AnswerKey, chosen: &HashMap<i64, i64>) -> Result<GradedSubmission, AppError> {
    if key.is_empty() {
        return Err(AppError::EmptyQuiz);
    }

    let missing: Vec<i64> = key
        .entries
        .keys()
        .filter(|question_id| !chosen.contains_key(question_id))
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(AppError::IncompleteSubmission(missing));
    }

    let answers: Vec<SubmissionAnswer> = key
        .entries
        .iter()
        .map(|(&question_id, &correct_answer_id)| {
            let user_answer_id = chosen[&question_id];
            SubmissionAnswer {
                question_id,
                user_answer_id,
                correct_answer_id,
                is_correct: user_answer_id == correct_answer_id,
            }
        })
        .collect();

    let correct_count = answers.iter().filter(|a| a.is_correct).count();
    let score = correct_count as f64 / key.len() as f64 * 100.0;

    Ok(GradedSubmission {
        score,
        correct_count,
        answers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(pairs: &[(i64, i64)]) -> AnswerKey {
        AnswerKey::from_rows(
            pairs
                .iter()
                .map(|&(question_id, correct)| AnswerKeyRow {
                    question_id,
                    correct_answer_id: Some(correct),
                })
                .collect(),
        )
        .unwrap()
    }

    fn chosen(pairs: &[(i64, i64)]) -> HashMap<i64, i64> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn three_of_four_scores_seventy_five() {
        let key = key(&[(1, 10), (2, 20), (3, 30), (4, 40)]);
        let graded = grade(&key, &chosen(&[(1, 10), (2, 20), (3, 30), (4, 41)])).unwrap();

        assert_eq!(graded.score, 75.0);
        assert_eq!(graded.correct_count, 3);
        assert_eq!(graded.answers.len(), 4);
        assert_eq!(
            graded.answers[3],
            SubmissionAnswer {
                question_id: 4,
                user_answer_id: 41,
                correct_answer_id: 40,
                is_correct: false,
            }
        );
    }

    #[test]
    fn score_is_k_over_n_for_every_k() {
        let key = key(&[(1, 10), (2, 20), (3, 30), (4, 40), (5, 50)]);
        for k in 0..=5 {
            let picks: Vec<(i64, i64)> = (1..=5)
                .map(|q| (q, if q <= k { q * 10 } else { 0 }))
                .collect();
            let graded = grade(&key, &chosen(&picks)).unwrap();
            assert_eq!(graded.correct_count, k as usize);
            assert!((graded.score - k as f64 / 5.0 * 100.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn missing_questions_are_reported_sorted() {
        let key = key(&[(3, 30), (1, 10), (2, 20)]);
        match grade(&key, &chosen(&[(2, 20)])) {
            Err(AppError::IncompleteSubmission(missing)) => assert_eq!(missing, vec![1, 3]),
            other => panic!("expected IncompleteSubmission, got {:?}", other),
        }
    }

    #[test]
    fn empty_quiz_is_rejected() {
        assert!(matches!(
            grade(&AnswerKey::default(), &HashMap::new()),
            Err(AppError::EmptyQuiz)
        ));
    }

    #[test]
    fn answers_outside_the_quiz_are_ignored() {
        let key = key(&[(1, 10)]);
        let graded = grade(&key, &chosen(&[(1, 10), (99, 990)])).unwrap();
        assert_eq!(graded.score, 100.0);
        assert_eq!(graded.answers.len(), 1);
    }

    #[test]
    fn key_rejects_question_without_correct_answer() {
        let rows = vec![AnswerKeyRow {
            question_id: 1,
            correct_answer_id: None,
        }];
        assert!(matches!(
            AnswerKey::from_rows(rows),
            Err(AppError::InternalServerError(_))
        ));
    }

    #[test]
    fn key_rejects_duplicate_correct_answers() {
        let rows = vec![
            AnswerKeyRow {
                question_id: 1,
                correct_answer_id: Some(10),
            },
            AnswerKeyRow {
                question_id: 1,
                correct_answer_id: Some(11),
            },
        ];
        assert!(AnswerKey::from_rows(rows).is_err());
    }
}
