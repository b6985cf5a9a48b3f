// src/models/tutor.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// DTO for a tutor chat turn.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TutorRequest {
    #[serde(default)]
    #[validate(length(max = 10000, message = "Message must be at most 10000 characters."))]
    pub message: Option<String>,

    #[serde(default)]
    #[validate(length(max = 100, message = "Conversation history is limited to 100 messages."))]
    pub conversation_history: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TutorResponse {
    pub response: String,
}
