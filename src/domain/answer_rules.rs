// src/domain/answer_rules.rs

//! Answer-set invariants of a question:
//! between `MIN_ANSWERS` and `MAX_ANSWERS` answers, exactly one of them correct.
//!
//! The checks are pure; `repository::answer` runs them against counts read
//! inside the same transaction that performs the write.

use crate::{
    error::{AppError, InvariantViolation},
    models::question::NewAnswer,
};

pub const MAX_ANSWERS: usize = 5;
pub const MIN_ANSWERS: usize = 2;

/// New questions start with one answer above the floor.
pub const MIN_ANSWERS_ON_CREATE: usize = 3;

/// Deleting is refused once the remaining total would be at or below this.
pub const MIN_ANSWERS_AFTER_DELETE: usize = MIN_ANSWERS;

/// Answer totals of one question as read from storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct AnswerTally {
    pub total: i64,
    pub correct: i64,
}

fn correct_in(batch: &[NewAnswer]) -> i64 {
    batch.iter().filter(|a| a.is_correct).count() as i64
}

/// Shape check for a brand new question, run before anything is written.
pub fn check_new_question(answers: &[NewAnswer]) -> Result<(), AppError> {
    if answers.len() < MIN_ANSWERS_ON_CREATE || answers.len() > MAX_ANSWERS {
        return Err(AppError::BadRequest(format!(
            "A question needs between {} and {} answers, got {}",
            MIN_ANSWERS_ON_CREATE,
            MAX_ANSWERS,
            answers.len()
        )));
    }

    let correct = correct_in(answers);
    if correct != 1 {
        return Err(InvariantViolation::InvalidCorrectCount { found: correct }.into());
    }

    Ok(())
}

/// Adding `batch` to a question currently holding `current`.
pub fn check_addition(current: AnswerTally, batch: &[NewAnswer]) -> Result<(), InvariantViolation> {
    if current.total + batch.len() as i64 > MAX_ANSWERS as i64 {
        return Err(InvariantViolation::TooManyAnswers { max: MAX_ANSWERS });
    }

    let correct = current.correct + correct_in(batch);
    if correct != 1 {
        return Err(InvariantViolation::InvalidCorrectCount { found: correct });
    }

    Ok(())
}

/// Re-check after an answer's text/correctness changed.
pub fn check_after_update(after: AnswerTally) -> Result<(), InvariantViolation> {
    if after.correct != 1 {
        return Err(InvariantViolation::InvalidCorrectCount { found: after.correct });
    }
    Ok(())
}

/// Re-check after one answer was removed.
pub fn check_after_delete(after: AnswerTally) -> Result<(), InvariantViolation> {
    if after.total <= MIN_ANSWERS_AFTER_DELETE as i64 {
        return Err(InvariantViolation::TooFewAnswers {
            floor: MIN_ANSWERS_AFTER_DELETE,
        });
    }
    if after.correct != 1 {
        return Err(InvariantViolation::InvalidCorrectCount { found: after.correct });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn answers(flags: &[bool]) -> Vec<NewAnswer> {
        flags
            .iter()
            .enumerate()
            .map(|(i, &is_correct)| NewAnswer {
                text: format!("option {}", i),
                is_correct,
            })
            .collect()
    }

    fn tally(total: i64, correct: i64) -> AnswerTally {
        AnswerTally { total, correct }
    }

    #[test]
    fn new_question_needs_three_to_five_answers() {
        assert!(matches!(
            check_new_question(&answers(&[true, false])),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            check_new_question(&answers(&[true, false, false, false, false, false])),
            Err(AppError::BadRequest(_))
        ));
        assert!(check_new_question(&answers(&[true, false, false])).is_ok());
        assert!(check_new_question(&answers(&[false, false, true, false, false])).is_ok());
    }

    #[test]
    fn new_question_needs_exactly_one_correct() {
        assert!(matches!(
            check_new_question(&answers(&[false, false, false])),
            Err(AppError::Invariant(InvariantViolation::InvalidCorrectCount { found: 0 }))
        ));
        assert!(matches!(
            check_new_question(&answers(&[true, true, false])),
            Err(AppError::Invariant(InvariantViolation::InvalidCorrectCount { found: 2 }))
        ));
    }

    #[test]
    fn adding_two_wrong_answers_to_three_fills_question() {
        assert_eq!(check_addition(tally(3, 1), &answers(&[false, false])), Ok(()));
    }

    #[test]
    fn sixth_answer_is_too_many() {
        assert_eq!(
            check_addition(tally(5, 1), &answers(&[false])),
            Err(InvariantViolation::TooManyAnswers { max: 5 })
        );
        assert_eq!(
            check_addition(tally(4, 1), &answers(&[false, false])),
            Err(InvariantViolation::TooManyAnswers { max: 5 })
        );
    }

    #[test]
    fn added_batch_cannot_introduce_a_second_correct_answer() {
        assert_eq!(
            check_addition(tally(3, 1), &answers(&[true])),
            Err(InvariantViolation::InvalidCorrectCount { found: 2 })
        );
    }

    #[test]
    fn added_batch_may_supply_a_missing_correct_answer() {
        assert_eq!(check_addition(tally(3, 0), &answers(&[true])), Ok(()));
    }

    #[test]
    fn update_must_leave_exactly_one_correct() {
        assert_eq!(check_after_update(tally(3, 1)), Ok(()));
        assert_eq!(
            check_after_update(tally(3, 0)),
            Err(InvariantViolation::InvalidCorrectCount { found: 0 })
        );
        assert_eq!(
            check_after_update(tally(3, 2)),
            Err(InvariantViolation::InvalidCorrectCount { found: 2 })
        );
    }

    #[test]
    fn delete_down_to_two_is_refused() {
        assert_eq!(
            check_after_delete(tally(2, 1)),
            Err(InvariantViolation::TooFewAnswers { floor: 2 })
        );
        assert_eq!(check_after_delete(tally(3, 1)), Ok(()));
    }

    #[test]
    fn deleting_the_correct_answer_is_refused() {
        assert_eq!(
            check_after_delete(tally(3, 0)),
            Err(InvariantViolation::InvalidCorrectCount { found: 0 })
        );
    }

    #[derive(Debug, Clone)]
    enum Mutation {
        Add(Vec<bool>),
        Update(usize, bool),
        Delete(usize),
    }

    fn mutation() -> impl Strategy<Value = Mutation> {
        prop_oneof![
            prop::collection::vec(any::<bool>(), 1..=3).prop_map(Mutation::Add),
            (any::<usize>(), any::<bool>()).prop_map(|(at, flag)| Mutation::Update(at, flag)),
            any::<usize>().prop_map(Mutation::Delete),
        ]
    }

    fn tally_of(flags: &[bool]) -> AnswerTally {
        tally(
            flags.len() as i64,
            flags.iter().filter(|&&c| c).count() as i64,
        )
    }

    proptest! {
        #[test]
        fn mutation_sequences_keep_the_answer_set_valid(
            size in MIN_ANSWERS_ON_CREATE..=MAX_ANSWERS,
            correct_at in 0..MAX_ANSWERS,
            mutations in prop::collection::vec(mutation(), 1..64),
        ) {
            let mut flags: Vec<bool> = (0..size).map(|i| i == correct_at % size).collect();
            prop_assert!(check_new_question(&answers(&flags)).is_ok());

            for m in mutations {
                let before = flags.clone();
                let mut next = flags.clone();
                let verdict = match &m {
                    Mutation::Add(batch) => {
                        next.extend(batch.iter().copied());
                        check_addition(tally_of(&flags), &answers(batch))
                    }
                    Mutation::Update(at, flag) => {
                        let at = at % next.len();
                        next[at] = *flag;
                        check_after_update(tally_of(&next))
                    }
                    Mutation::Delete(at) => {
                        let at = at % next.len();
                        next.remove(at);
                        check_after_delete(tally_of(&next))
                    }
                };

                let after = tally_of(&next);
                let acceptable = after.correct == 1
                    && after.total <= MAX_ANSWERS as i64
                    && after.total > MIN_ANSWERS_AFTER_DELETE as i64;
                prop_assert_eq!(verdict.is_ok(), acceptable, "{:?} on {:?}", m, before);

                if verdict.is_ok() {
                    flags = next;
                }
                if verdict.is_err() {
                    prop_assert_eq!(&flags, &before);
                }

                let state = tally_of(&flags);
                prop_assert!(state.total >= MIN_ANSWERS as i64);
                prop_assert!(state.total <= MAX_ANSWERS as i64);
                prop_assert_eq!(state.correct, 1);
            }
        }
    }
}
