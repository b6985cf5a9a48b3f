// src/completion/mod.rs

pub mod gemini;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AppError;

pub use gemini::GeminiClient;

/// How the model is asked to shape its output.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseFormat {
    /// Free text.
    Text,
    /// Strict JSON output, optionally constrained by a response schema.
    Json { schema: Option<Value> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub format: ResponseFormat,
}

impl CompletionRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            format: ResponseFormat::Text,
        }
    }

    pub fn json(prompt: impl Into<String>, schema: Option<Value>) -> Self {
        Self {
            prompt: prompt.into(),
            format: ResponseFormat::Json { schema },
        }
    }
}

/// A single text-generation call against a hosted model.
///
/// Output is stochastic; calls are safe to retry.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, AppError>;
}

pub(crate) fn ensure_prompt(prompt: &str) -> Result<(), AppError> {
    if prompt.trim().is_empty() {
        return Err(AppError::Validation("Prompt must not be empty".to_string()));
    }
    Ok(())
}
