// src/models/quiz.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use uuid::Uuid;
use validator::Validate;

use crate::{error::AppError, quiz::session::percentage};

/// One generated multiple-choice item.
/// Invariant: `correct_answer < options.len()` and `options.len() >= 2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,

    /// Options in display order.
    pub options: Vec<String>,

    /// Index into `options`.
    pub correct_answer: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// DTO for sending a question to the client while the quiz is in progress
/// (excludes answer and explanation).
#[derive(Debug, Clone, Serialize)]
pub struct PublicQuestion {
    pub question: String,
    pub options: Vec<String>,
}

impl From<&QuizQuestion> for PublicQuestion {
    fn from(q: &QuizQuestion) -> Self {
        Self {
            question: q.question.clone(),
            options: q.options.clone(),
        }
    }
}

/// Per-question record stored in the `questions` column of `quiz_results`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub question: String,
    pub user_answer: String,
    pub correct_answer: String,
    pub correct: bool,
}

/// Whether a history entry is a taken quiz or a reminder for one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizStatus {
    #[default]
    Completed,
    Scheduled,
}

impl QuizStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuizStatus::Completed => "completed",
            QuizStatus::Scheduled => "scheduled",
        }
    }
}

/// Decodes the `status` column.
impl TryFrom<String> for QuizStatus {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "completed" => Ok(QuizStatus::Completed),
            "scheduled" => Ok(QuizStatus::Scheduled),
            other => Err(AppError::Persistence(format!(
                "unknown quiz status {:?}",
                other
            ))),
        }
    }
}

/// Represents the 'quiz_results' table, joined with the owning class name.
/// Append-only: rows are never updated after insert.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuizResult {
    pub id: Uuid,
    pub class_id: Uuid,

    /// `None` when the class row no longer exists.
    pub class_name: Option<String>,

    pub score: i32,
    pub total_questions: i32,

    /// Stored as a JSON array; decoded into typed records at the boundary.
    pub questions: Json<Vec<AnswerRecord>>,

    #[sqlx(try_from = "String")]
    pub status: QuizStatus,

    /// Only set for scheduled entries.
    pub scheduled_date: Option<chrono::DateTime<chrono::Utc>>,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl QuizResult {
    pub fn display_class_name(&self) -> &str {
        self.class_name.as_deref().unwrap_or("Unknown Class")
    }
}

/// History entry as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResultResponse {
    pub id: Uuid,
    pub class_id: Uuid,
    pub class_name: String,
    pub score: i32,
    pub total_questions: i32,
    pub percentage: u32,
    pub questions: Vec<AnswerRecord>,
    pub status: QuizStatus,
    pub scheduled_date: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<QuizResult> for QuizResultResponse {
    fn from(result: QuizResult) -> Self {
        let percentage = percentage(
            result.score.max(0) as usize,
            result.total_questions.max(0) as usize,
        );
        Self {
            class_name: result.display_class_name().to_string(),
            id: result.id,
            class_id: result.class_id,
            score: result.score,
            total_questions: result.total_questions,
            percentage,
            questions: result.questions.0,
            status: result.status,
            scheduled_date: result.scheduled_date,
            created_at: result.created_at,
        }
    }
}

/// Response for a finalized quiz session.
#[derive(Debug, Serialize, Deserialize)]
pub struct FinalizeResponse {
    pub score: usize,
    pub total: usize,
    pub percentage: u32,
    pub records: Vec<AnswerRecord>,

    /// Full questions, now including answers and explanations.
    pub questions: Vec<QuizQuestion>,

    /// False when the result could not be stored; the score above is still valid.
    pub saved: bool,
    pub result_id: Option<Uuid>,
}

/// A history entry ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuizResult {
    pub class_id: Uuid,
    pub score: i32,
    pub total_questions: i32,
    pub questions: Vec<AnswerRecord>,
    pub status: QuizStatus,
    pub scheduled_date: Option<chrono::DateTime<chrono::Utc>>,
}

impl NewQuizResult {
    /// A graded quiz.
    pub fn completed(class_id: Uuid, score: i32, questions: Vec<AnswerRecord>) -> Self {
        Self {
            class_id,
            score,
            total_questions: questions.len() as i32,
            questions,
            status: QuizStatus::Completed,
            scheduled_date: None,
        }
    }

    /// A reminder to take a quiz for the class at `date`. Carries no questions yet.
    pub fn scheduled(class_id: Uuid, date: chrono::DateTime<chrono::Utc>) -> Self {
        Self {
            class_id,
            score: 0,
            total_questions: 0,
            questions: Vec::new(),
            status: QuizStatus::Scheduled,
            scheduled_date: Some(date),
        }
    }
}

/// Query string of the history endpoints, e.g. `?status=scheduled`.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub status: Option<QuizStatus>,
}

/// DTO for setting a quiz reminder on a class.
#[derive(Debug, Deserialize)]
pub struct ScheduleQuizRequest {
    pub scheduled_date: chrono::DateTime<chrono::Utc>,
}

/// DTO for the stateless generation endpoint.
#[derive(Debug, Deserialize)]
pub struct GenerateQuizRequest {
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateQuizResponse {
    pub questions: Vec<QuizQuestion>,
}

/// DTO for clients that graded a quiz themselves and only want it stored.
#[derive(Debug, Deserialize, Validate)]
pub struct SaveQuizResultRequest {
    #[validate(range(min = 0))]
    pub score: i32,
    #[validate(range(min = 1, max = 100))]
    pub total_questions: i32,
    #[validate(length(min = 1, max = 100))]
    pub questions: Vec<AnswerRecord>,
}

impl SaveQuizResultRequest {
    /// Checks that the reported score agrees with the records.
    pub fn check_consistency(&self) -> Result<(), String> {
        if self.questions.len() != self.total_questions as usize {
            return Err(format!(
                "total_questions is {} but {} records were sent",
                self.total_questions,
                self.questions.len()
            ));
        }
        let correct = self.questions.iter().filter(|r| r.correct).count();
        if correct != self.score as usize {
            return Err(format!(
                "score is {} but {} records are marked correct",
                self.score, correct
            ));
        }
        Ok(())
    }
}

/// DTO for recording an answer selection in a quiz session.
#[derive(Debug, Deserialize)]
pub struct SelectAnswerRequest {
    pub question_index: usize,
    pub option_index: usize,
}
