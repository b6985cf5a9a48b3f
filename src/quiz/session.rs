// src/quiz/session.rs

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    error::AppError,
    models::quiz::{AnswerRecord, QuizQuestion},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Empty,
    Generating,
    Ready,
    Finalized,
}

/// Score of a finalized quiz.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizOutcome {
    pub score: usize,
    pub total: usize,
    pub percentage: u32,
    pub records: Vec<AnswerRecord>,
}

/// Rounded percentage; a quiz with no questions scores 0.
pub fn percentage(score: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (score as f64 * 100.0 / total as f64).round() as u32
}

/// In-progress quiz attempt.
///
/// `Empty -> Generating -> Ready -> Finalized`; a failed generation drops back to
/// `Empty`. Finalized sessions are immutable.
#[derive(Debug, Clone)]
pub struct QuizSession {
    status: SessionStatus,
    questions: Vec<QuizQuestion>,
    selections: BTreeMap<usize, usize>,
    last_error: Option<String>,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    pub fn new() -> Self {
        Self {
            status: SessionStatus::Empty,
            questions: Vec::new(),
            selections: BTreeMap::new(),
            last_error: None,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn selections(&self) -> &BTreeMap<usize, usize> {
        &self.selections
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Enters `Generating`, discarding any previous questions and selections.
    pub fn begin_generation(&mut self) -> Result<(), AppError> {
        match self.status {
            SessionStatus::Generating => Err(AppError::Conflict(
                "Quiz generation is already in progress".to_string(),
            )),
            SessionStatus::Finalized => Err(AppError::Conflict(
                "Quiz is already finalized; start a new session".to_string(),
            )),
            SessionStatus::Empty | SessionStatus::Ready => {
                self.status = SessionStatus::Generating;
                self.questions.clear();
                self.selections.clear();
                self.last_error = None;
                Ok(())
            }
        }
    }

    /// Applies the outcome of a generation started with `begin_generation`.
    /// On failure the session returns to `Empty` and the error is passed back.
    pub fn complete_generation(
        &mut self,
        outcome: Result<Vec<QuizQuestion>, AppError>,
    ) -> Result<(), AppError> {
        if self.status != SessionStatus::Generating {
            return Err(AppError::Conflict("No quiz generation is in progress".to_string()));
        }

        match outcome {
            Ok(questions) => {
                self.questions = questions;
                self.status = SessionStatus::Ready;
                Ok(())
            }
            Err(err) => {
                self.status = SessionStatus::Empty;
                self.last_error = Some(err.public_message());
                Err(err)
            }
        }
    }

    /// Records (or replaces) the chosen option for one question.
    pub fn select(&mut self, question_index: usize, option_index: usize) -> Result<(), AppError> {
        if self.status != SessionStatus::Ready {
            return Err(AppError::Conflict(format!(
                "Answers can only be selected while the quiz is ready (current state: {:?})",
                self.status
            )));
        }

        let question = self.questions.get(question_index).ok_or_else(|| {
            AppError::Validation(format!(
                "Question index {} is out of range (quiz has {} questions)",
                question_index,
                self.questions.len()
            ))
        })?;

        if option_index >= question.options.len() {
            return Err(AppError::Validation(format!(
                "Option index {} is out of range (question has {} options)",
                option_index,
                question.options.len()
            )));
        }

        self.selections.insert(question_index, option_index);
        Ok(())
    }

    /// Scores the quiz and moves to `Finalized`.
    /// Rejected, with the state untouched, unless every question has a selection.
    pub fn finalize(&mut self) -> Result<QuizOutcome, AppError> {
        if self.status != SessionStatus::Ready {
            return Err(AppError::Conflict(format!(
                "Only a ready quiz can be finalized (current state: {:?})",
                self.status
            )));
        }

        let total = self.questions.len();
        let answered = (0..total).filter(|i| self.selections.contains_key(i)).count();
        if answered < total {
            return Err(AppError::IncompleteAnswers { answered, total });
        }

        let records: Vec<AnswerRecord> = self
            .questions
            .iter()
            .enumerate()
            .map(|(idx, q)| {
                let chosen = self.selections[&idx];
                AnswerRecord {
                    question: q.question.clone(),
                    user_answer: q.options[chosen].clone(),
                    correct_answer: q.options[q.correct_answer].clone(),
                    correct: chosen == q.correct_answer,
                }
            })
            .collect();

        let score = records.iter().filter(|r| r.correct).count();
        self.status = SessionStatus::Finalized;

        Ok(QuizOutcome {
            score,
            total,
            percentage: percentage(score, total),
            records,
        })
    }
}
