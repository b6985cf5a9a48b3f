// src/quiz/generator.rs

use std::sync::Arc;
use std::time::Duration;

use crate::{
    completion::{CompletionClient, CompletionRequest},
    config::Config,
    error::AppError,
    models::quiz::QuizQuestion,
    quiz::{parser::parse_questions, prompt},
    utils::deadline::{upstream_timeout, within},
};

/// Turns note text into validated quiz questions: prompt, completion, parse.
#[derive(Clone)]
pub struct QuizGenerator {
    client: Arc<dyn CompletionClient>,
    question_count: usize,
    max_notes_chars: usize,
    timeout: Duration,
}

impl QuizGenerator {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        question_count: usize,
        max_notes_chars: usize,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            question_count,
            max_notes_chars,
            timeout,
        }
    }

    pub fn from_config(client: Arc<dyn CompletionClient>, config: &Config) -> Self {
        Self::new(
            client,
            config.quiz_question_count,
            config.max_notes_chars,
            config.completion_timeout,
        )
    }

    pub async fn generate(&self, notes: &str) -> Result<Vec<QuizQuestion>, AppError> {
        if notes.trim().is_empty() {
            return Err(AppError::Validation(
                "Please add some notes first before generating a quiz.".to_string(),
            ));
        }

        let request = CompletionRequest::json(
            prompt::build_quiz_prompt(notes, self.question_count, self.max_notes_chars),
            Some(prompt::quiz_response_schema()),
        );

        let raw = within(self.timeout, self.client.complete(request), upstream_timeout).await?;
        let questions = parse_questions(&raw)?;

        tracing::info!(
            requested = self.question_count,
            generated = questions.len(),
            "Quiz generated"
        );
        Ok(questions)
    }
}
