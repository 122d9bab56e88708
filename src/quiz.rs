//! Quiz session state machine.
//!
//! A session is either answering (with a current question index) or
//! complete (with a computed result). Submission requires every question
//! answered and cannot fire twice without an intervening retake.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::DEFAULT_PASSING_SCORE;
use crate::models::QuizQuestion;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum QuizError {
    #[error("question index {0} is out of range")]
    QuestionOutOfRange(usize),

    #[error("option index {0} is out of range")]
    OptionOutOfRange(usize),

    #[error("cannot submit: {answered} of {total} questions answered")]
    Incomplete { answered: usize, total: usize },

    #[error("quiz already submitted; retake first")]
    AlreadySubmitted,

    #[error("quiz has no questions")]
    Empty,
}

/// Outcome for one question after submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOutcome {
    pub question: String,
    pub user_answer: usize,
    pub correct_answer: usize,
    pub is_correct: bool,
    pub explanation: String,
}

/// Scored result of a submitted quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub outcomes: Vec<QuestionOutcome>,
    /// Count of correctly answered questions.
    pub score: usize,
    pub total: usize,
    /// `round(100 * score / total)`.
    pub percentage: u8,
    pub passed: bool,
}

/// One employee's pass through a quiz. Ephemeral: dropped or reset on
/// retake, never persisted directly (see `QuizResultRecord`).
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    passing_score: u8,
    current: usize,
    answers: HashMap<usize, usize>,
    result: Option<QuizResult>,
}

impl QuizSession {
    pub fn new(questions: Vec<QuizQuestion>, passing_score: u8) -> Self {
        Self {
            questions,
            passing_score,
            current: 0,
            answers: HashMap::new(),
            result: None,
        }
    }

    pub fn with_default_passing_score(questions: Vec<QuizQuestion>) -> Self {
        Self::new(questions, DEFAULT_PASSING_SCORE)
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.current)
    }

    pub fn is_complete(&self) -> bool {
        self.result.is_some()
    }

    pub fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }

    pub fn answer_for(&self, index: usize) -> Option<usize> {
        self.answers.get(&index).copied()
    }

    /// Advance to the next question; clamped at the last one.
    pub fn next(&mut self) {
        if self.result.is_none() && self.current + 1 < self.questions.len() {
            self.current += 1;
        }
    }

    /// Go back one question; clamped at the first.
    pub fn previous(&mut self) {
        if self.result.is_none() && self.current > 0 {
            self.current -= 1;
        }
    }

    /// Record or overwrite an answer. Does not move the current question.
    pub fn select_answer(&mut self, question: usize, option: usize) -> Result<(), QuizError> {
        if self.result.is_some() {
            return Err(QuizError::AlreadySubmitted);
        }
        let q = self
            .questions
            .get(question)
            .ok_or(QuizError::QuestionOutOfRange(question))?;
        if option >= q.options.len() {
            return Err(QuizError::OptionOutOfRange(option));
        }
        self.answers.insert(question, option);
        Ok(())
    }

    /// True once every question has a recorded answer.
    pub fn all_answered(&self) -> bool {
        (0..self.questions.len()).all(|i| self.answers.contains_key(&i))
    }

    /// Progress by answered questions, 0.0-100.0.
    pub fn answered_progress(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        self.answers.len() as f64 / self.questions.len() as f64 * 100.0
    }

    /// Progress by navigation position, 0.0-100.0.
    pub fn position_progress(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        (self.current + 1) as f64 / self.questions.len() as f64 * 100.0
    }

    /// Score the session and transition to complete.
    ///
    /// Rejected without a state change when any question is unanswered or
    /// the session was already submitted.
    pub fn submit(&mut self) -> Result<&QuizResult, QuizError> {
        if self.result.is_some() {
            return Err(QuizError::AlreadySubmitted);
        }
        if self.questions.is_empty() {
            return Err(QuizError::Empty);
        }
        if !self.all_answered() {
            return Err(QuizError::Incomplete {
                answered: self.answers.len(),
                total: self.questions.len(),
            });
        }

        let outcomes: Vec<QuestionOutcome> = self
            .questions
            .iter()
            .enumerate()
            .map(|(i, q)| {
                let user_answer = self.answers[&i];
                QuestionOutcome {
                    question: q.question.clone(),
                    user_answer,
                    correct_answer: q.correct,
                    is_correct: user_answer == q.correct,
                    explanation: q.explanation.clone(),
                }
            })
            .collect();

        let score = outcomes.iter().filter(|o| o.is_correct).count();
        let total = outcomes.len();
        let percentage = (score as f64 * 100.0 / total as f64).round() as u8;
        let passed = percentage >= self.passing_score;

        Ok(self.result.insert(QuizResult {
            outcomes,
            score,
            total,
            percentage,
            passed,
        }))
    }

    /// Back to the first question with a clean slate. A following submit
    /// scores independently of the prior attempt.
    pub fn retake(&mut self) {
        self.current = 0;
        self.answers.clear();
        self.result = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct: usize) -> QuizQuestion {
        QuizQuestion {
            question: format!("which option is {correct}?"),
            options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            correct,
            explanation: "see manual".into(),
            kind: "recall".into(),
            source: None,
        }
    }

    fn five_question_session() -> QuizSession {
        QuizSession::new(vec![question(0); 5], 80)
    }

    #[test]
    fn four_of_five_correct_passes_at_80() {
        let mut session = five_question_session();
        for i in 0..4 {
            session.select_answer(i, 0).unwrap();
        }
        session.select_answer(4, 1).unwrap();

        let result = session.submit().unwrap();
        assert_eq!(result.score, 4);
        assert_eq!(result.percentage, 80);
        assert!(result.passed);
    }

    #[test]
    fn three_of_five_correct_fails_at_80() {
        let mut session = five_question_session();
        for i in 0..3 {
            session.select_answer(i, 0).unwrap();
        }
        session.select_answer(3, 1).unwrap();
        session.select_answer(4, 1).unwrap();

        let result = session.submit().unwrap();
        assert_eq!(result.percentage, 60);
        assert!(!result.passed);
    }

    #[test]
    fn submit_rejected_while_unanswered() {
        let mut session = five_question_session();
        session.select_answer(0, 0).unwrap();

        match session.submit() {
            Err(QuizError::Incomplete { answered, total }) => {
                assert_eq!(answered, 1);
                assert_eq!(total, 5);
            }
            other => panic!("expected Incomplete, got {other:?}"),
        }
        assert!(!session.is_complete(), "no state transition on rejection");
    }

    #[test]
    fn submit_twice_requires_retake() {
        let mut session = QuizSession::new(vec![question(2)], 80);
        session.select_answer(0, 2).unwrap();
        session.submit().unwrap();

        assert_eq!(session.submit().unwrap_err(), QuizError::AlreadySubmitted);

        session.retake();
        assert!(!session.is_complete());
        assert_eq!(session.current_index(), 0);
        assert!(session.answer_for(0).is_none());

        session.select_answer(0, 1).unwrap();
        let result = session.submit().unwrap();
        assert_eq!(result.score, 0, "second attempt scored independently");
    }

    #[test]
    fn navigation_clamps_at_both_ends() {
        let mut session = QuizSession::new(vec![question(0); 3], 80);
        session.previous();
        assert_eq!(session.current_index(), 0);

        session.next();
        session.next();
        session.next();
        session.next();
        assert_eq!(session.current_index(), 2);

        session.previous();
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn selecting_an_answer_does_not_navigate() {
        let mut session = five_question_session();
        session.select_answer(3, 2).unwrap();
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.answer_for(3), Some(2));

        session.select_answer(3, 1).unwrap();
        assert_eq!(session.answer_for(3), Some(1), "overwrite allowed");
    }

    #[test]
    fn out_of_range_selections_are_rejected() {
        let mut session = five_question_session();
        assert_eq!(
            session.select_answer(9, 0).unwrap_err(),
            QuizError::QuestionOutOfRange(9)
        );
        assert_eq!(
            session.select_answer(0, 4).unwrap_err(),
            QuizError::OptionOutOfRange(4)
        );
    }

    #[test]
    fn progress_tracks_both_framings() {
        let mut session = five_question_session();
        assert!((session.position_progress() - 20.0).abs() < 1e-9);
        assert!((session.answered_progress() - 0.0).abs() < 1e-9);

        session.select_answer(0, 0).unwrap();
        session.next();
        assert!((session.position_progress() - 40.0).abs() < 1e-9);
        assert!((session.answered_progress() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn percentage_rounds_to_nearest() {
        let mut session = QuizSession::new(vec![question(0); 3], 80);
        session.select_answer(0, 0).unwrap();
        session.select_answer(1, 0).unwrap();
        session.select_answer(2, 1).unwrap();
        let result = session.submit().unwrap();
        // 2/3 = 66.66... rounds to 67
        assert_eq!(result.percentage, 67);
    }

    #[test]
    fn empty_quiz_cannot_submit() {
        let mut session = QuizSession::new(vec![], 80);
        assert_eq!(session.submit().unwrap_err(), QuizError::Empty);
    }
}
