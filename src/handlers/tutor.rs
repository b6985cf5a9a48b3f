// src/handlers/tutor.rs

use axum::{Json, extract::State, response::IntoResponse};
use validator::Validate;

use crate::{
    completion::CompletionRequest,
    error::AppError,
    models::tutor::{TutorRequest, TutorResponse},
    quiz::prompt::build_tutor_prompt,
    state::AppState,
    utils::deadline::{upstream_timeout, within},
};

/// One tutor chat turn. The client sends the prior turns with every request.
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<TutorRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let message = req
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or(AppError::Validation("Message is required".to_string()))?;

    tracing::info!(
        message_chars = message.chars().count(),
        history = req.conversation_history.len(),
        "Tutor request received"
    );

    let prompt = build_tutor_prompt(&req.conversation_history, message);
    let response = within(
        state.config.completion_timeout,
        state.completion.complete(CompletionRequest::text(prompt)),
        upstream_timeout,
    )
    .await?;

    Ok(Json(TutorResponse {
        response: response.trim().to_string(),
    }))
}
