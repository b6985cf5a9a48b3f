// src/quiz/prompt.rs

use serde_json::{Value, json};

use crate::{
    models::tutor::{ChatMessage, ChatRole},
    utils::text::truncate_chars,
};

const TUTOR_INSTRUCTIONS: &str = "You are a helpful, patient, and knowledgeable AI tutor. Your role is to:
- Explain concepts clearly and simply
- Break down complex topics into understandable parts
- Provide examples and analogies when helpful
- Ask clarifying questions if needed
- Encourage learning and critical thinking
- Be supportive and encouraging

";

/// Joins note bodies with blank lines, skipping empty ones.
pub fn join_notes<'a>(notes: impl IntoIterator<Item = &'a str>) -> String {
    notes
        .into_iter()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Builds the instruction asking for `count` multiple-choice questions as JSON.
/// Notes beyond `max_chars` characters are cut off.
pub fn build_quiz_prompt(notes: &str, count: usize, max_chars: usize) -> String {
    let context = truncate_chars(notes.trim(), max_chars);
    if context.len() < notes.trim().len() {
        tracing::debug!(max_chars, "Notes truncated for quiz prompt");
    }

    format!(
        "You are a teacher writing a practice quiz for a student.\n\
         Based only on the study notes below, write exactly {count} multiple-choice questions.\n\
         Each question must have 4 options with exactly one correct option.\n\
         Respond with a JSON array only, no prose. Each element must have the form:\n\
         {{\"question\": string, \"options\": [string, string, string, string], \
         \"correct_answer\": <0-based index of the correct option>, \"explanation\": string}}\n\n\
         Study notes:\n\"\"\"\n{context}\n\"\"\""
    )
}

/// Response schema for structured quiz output.
pub fn quiz_response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "question": { "type": "STRING" },
                "options": { "type": "ARRAY", "items": { "type": "STRING" } },
                "correct_answer": { "type": "INTEGER" },
                "explanation": { "type": "STRING" }
            },
            "required": ["question", "options", "correct_answer"]
        }
    })
}

/// Builds the rolling tutor transcript, ending on an open `Tutor:` turn.
pub fn build_tutor_prompt(history: &[ChatMessage], message: &str) -> String {
    let mut prompt = String::from(TUTOR_INSTRUCTIONS);

    if !history.is_empty() {
        prompt.push_str("Previous conversation:\n");
        for msg in history {
            let speaker = match msg.role {
                ChatRole::User => "Student",
                ChatRole::Assistant => "Tutor",
            };
            prompt.push_str(&format!("{}: {}\n", speaker, msg.content));
        }
        prompt.push('\n');
    }

    prompt.push_str(&format!("Student: {}\nTutor:", message));
    prompt
}
