// src/models/class.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Represents the 'classes' table in the database.
/// A class (e.g. a course) groups notes and quiz results.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Class {
    pub id: Uuid,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for creating a new class.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateClassRequest {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Class name length must be between 1 and 200 characters."
    ))]
    pub name: String,
}
