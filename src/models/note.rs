// src/models/note.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Represents the 'notes' table in the database.
/// Free-text study material attached to a class.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub class_id: Uuid,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for creating or replacing the content of a note.
#[derive(Debug, Deserialize, Validate)]
pub struct NoteContentRequest {
    #[validate(length(
        min = 1,
        max = 100000,
        message = "Note content must be between 1 and 100000 characters."
    ))]
    pub content: String,
}
